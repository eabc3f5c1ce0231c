//! # Reconciliation Error Types
//!
//! Error types for the returns reconciliation layer.
//!
//! ## Propagation Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WHAT SURFACES, WHAT IS ABSORBED                                        │
//! │                                                                         │
//! │  Surfaced to the caller (blocking):                                    │
//! │  ├── Validation   - empty selection, rejected before any side effect   │
//! │  └── Persistence  - the return record could not be written             │
//! │                                                                         │
//! │  Absorbed and logged (never re-thrown):                                │
//! │  ├── Gateway      - server call failed → fallback path                 │
//! │  ├── Inventory    - one line's stock adjustment failed                 │
//! │  └── Cache        - cached sale/balance adjustment failed              │
//! │                                                                         │
//! │  A return can therefore complete "processed" with some downstream      │
//! │  adjustment logged as failed. That is the availability trade-off the   │
//! │  back office runs on.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rxledger_core::ValidationError;
use thiserror::Error;

// =============================================================================
// Recon Error
// =============================================================================

/// Errors raised by the reconciliation workflows and collaborator contracts.
#[derive(Debug, Error)]
pub enum ReconError {
    /// Input validation failed. Raised before any collaborator call.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The server-side return call failed.
    ///
    /// The workflows catch this variant and route into the local fallback
    /// path; it only reaches a caller when a collaborator implementation
    /// surfaces it outside a workflow.
    #[error("Return gateway call failed: {reason}")]
    Gateway { reason: String },

    /// Fetching the inventory snapshot or adjusting a stock record failed.
    #[error("Inventory operation failed for {stock_record_id}: {reason}")]
    Inventory {
        stock_record_id: String,
        reason: String,
    },

    /// The return record could not be persisted. This is the one hard
    /// post-validation failure of a workflow run.
    #[error("Failed to persist return record: {reason}")]
    Persistence { reason: String },

    /// A cached sale/purchase or customer balance could not be adjusted.
    #[error("Cache adjustment failed: {reason}")]
    Cache { reason: String },

    /// A record needed by the workflow does not exist.
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with ReconError.
pub type ReconResult<T> = Result<T, ReconError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ReconError::Inventory {
            stock_record_id: "stk-9".to_string(),
            reason: "store offline".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Inventory operation failed for stk-9: store offline"
        );

        let err = ReconError::NotFound {
            what: "Sale",
            id: "sale-1".to_string(),
        };
        assert_eq!(err.to_string(), "Sale not found: sale-1");
    }

    #[test]
    fn test_validation_error_converts() {
        let err: ReconError = ValidationError::NothingSelected.into();
        assert!(matches!(err, ReconError::Validation(_)));
    }
}
