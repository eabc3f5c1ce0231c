//! # Error Types
//!
//! Domain-specific error types for rxledger-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rxledger-core errors (this file)                                      │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  rxledger-recon errors (separate crate)                                │
//! │  └── ReconError       - Reconciliation workflow failures               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ReconError → host application     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (line id, record id, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The originating sale could not be found.
    ///
    /// ## When This Occurs
    /// - Sale id doesn't exist in the local mirror
    /// - Reference-number search matched nothing
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// The originating purchase could not be found.
    #[error("Purchase not found: {0}")]
    PurchaseNotFound(String),

    /// A return line references a line id that is not on the originating
    /// record.
    #[error("Line {line_id} is not part of record {record_id}")]
    UnknownLine { line_id: String, record_id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A return was submitted with no line selected.
    ///
    /// ## When This Occurs
    /// - The user pressed "process return" with every quantity at zero
    ///
    /// This is the one blocking error of the return workflows: it is raised
    /// before any collaborator call, so rejecting it has no side effects.
    #[error("at least one item must have a return quantity greater than zero")]
    NothingSelected,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
