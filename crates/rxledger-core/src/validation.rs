//! # Validation Module
//!
//! Input validation utilities for the back-office core.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend forms                                               │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Business rule validation before any side effect                   │
//! │  └── The only blocking errors of the return workflows                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Host application storage constraints                         │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::refund::ReturnSelection;
use crate::types::InvoiceLine;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a reference-number search query.
pub const MAX_REFERENCE_QUERY_LEN: usize = 100;

// =============================================================================
// Return Validators
// =============================================================================

/// Validates that a return selection has at least one line with a positive
/// quantity.
///
/// This is the gate at the top of both return workflows: an empty selection
/// is rejected synchronously, before any collaborator call, so it has no
/// side effects.
pub fn validate_return_selection(selection: &ReturnSelection) -> ValidationResult<()> {
    if !selection.has_selection() {
        return Err(ValidationError::NothingSelected);
    }

    Ok(())
}

/// Validates a reference-number search query.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_reference_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.is_empty() {
        return Err(ValidationError::Required {
            field: "reference".to_string(),
        });
    }

    if query.len() > MAX_REFERENCE_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "reference".to_string(),
            max: MAX_REFERENCE_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Invoice Validators
// =============================================================================

/// Validates an invoice line before it enters the calculator.
///
/// ## Rules
/// - Name must not be empty
/// - Quantity must be non-negative (zero is a line being edited, allowed)
/// - Discount must not exceed 100%
///
/// The calculator itself never panics on values outside these bounds; this
/// validation exists so the authoring screen can reject them early.
pub fn validate_invoice_line(line: &InvoiceLine) -> ValidationResult<()> {
    if line.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if line.quantity < 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if line.discount.bps() > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Rules
/// - Must be a valid UUID format
/// - 36 characters with hyphens: xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx
///
/// ## Example
/// ```rust
/// use rxledger_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
