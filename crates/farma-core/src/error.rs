//! # Error Types
//!
//! Domain-specific error types for farma-core.
//!
//! ## Error Flow
//! ```text
//! ValidationError ─┐
//!                  ├──► CaixaError (farma-caixa) ──► admin UI
//! LedgerError ─────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (session id, amount, field)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Ledger Error
// =============================================================================

/// Errors raised by the MoneyLedger.
///
/// The ledger performs no I/O, so this is the only failure it can produce:
/// a movement that violates the positive-amount invariant. A well-behaved
/// store never hands the ledger such a movement; seeing this error means the
/// write-time validation was bypassed.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A movement amount is zero or negative.
    #[error("invalid movement {movement_id}: amount must be positive, got {amount_cents}")]
    InvalidMovement {
        movement_id: String,
        amount_cents: i64,
    },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements. Used for early
/// validation before anything touches the store.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive, got {value}")]
    MustBePositive { field: &'static str, value: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative, got {value}")]
    MustNotBeNegative { field: &'static str, value: i64 },
}

/// Convenience alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LedgerError::InvalidMovement {
            movement_id: "m-1".to_string(),
            amount_cents: -10,
        };
        assert_eq!(
            err.to_string(),
            "invalid movement m-1: amount must be positive, got -10"
        );

        let err = ValidationError::MustNotBeNegative {
            field: "opening_amount",
            value: -1,
        };
        assert_eq!(err.to_string(), "opening_amount must not be negative, got -1");
    }
}
