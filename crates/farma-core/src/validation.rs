//! # Validation Module
//!
//! Input validation for the cash-register operations.
//!
//! ## Validation Strategy
//! ```text
//! Layer 1: Admin UI (TypeScript)        basic format checks, fast feedback
//! Layer 2: CashSessionManager (Rust)    THIS MODULE, typed errors
//! Layer 3: Store (SQLite)               CHECK / UNIQUE / FK constraints
//! ```
//!
//! Multiple layers catch different failures; this module is the one that
//! turns bad input into a typed error before anything touches the store.

use crate::error::{ValidationError, ValidationResult};
use crate::types::MovementKind;
use crate::{MAX_DESCRIPTION_LEN, MAX_NOTES_LEN};

/// Validates a till identifier. Must be non-empty.
pub fn validate_till_id(till_id: &str) -> ValidationResult<()> {
    if till_id.trim().is_empty() {
        return Err(ValidationError::Required { field: "till_id" });
    }
    Ok(())
}

/// Validates an operator identifier. Must be non-empty.
pub fn validate_operator_id(operator_id: &str) -> ValidationResult<()> {
    if operator_id.trim().is_empty() {
        return Err(ValidationError::Required { field: "operator_id" });
    }
    Ok(())
}

/// Validates an opening float amount.
///
/// Zero is allowed (a drawer can legitimately open empty); negative is not.
pub fn validate_opening_amount(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "opening_amount",
            value: cents,
        });
    }
    Ok(())
}

/// Validates a movement amount. Must be strictly positive; the sign of a
/// movement is carried by its kind, never by the amount.
pub fn validate_movement_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount",
            value: cents,
        });
    }
    Ok(())
}

/// Validates a movement description against the kind's requirements.
///
/// Withdrawals and deposits are manual drawer adjustments and must say why;
/// for other kinds the description is optional.
pub fn validate_movement_description(
    kind: MovementKind,
    description: Option<&str>,
) -> ValidationResult<()> {
    let trimmed = description.map(str::trim).filter(|d| !d.is_empty());

    if kind.requires_description() && trimmed.is_none() {
        return Err(ValidationError::Required { field: "description" });
    }

    if let Some(d) = trimmed {
        if d.len() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::TooLong {
                field: "description",
                max: MAX_DESCRIPTION_LEN,
            });
        }
    }

    Ok(())
}

/// Validates optional free-text session notes.
pub fn validate_notes(notes: Option<&str>) -> ValidationResult<()> {
    if let Some(n) = notes {
        if n.len() > MAX_NOTES_LEN {
            return Err(ValidationError::TooLong {
                field: "notes",
                max: MAX_NOTES_LEN,
            });
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_till_id() {
        assert!(validate_till_id("till-1").is_ok());
        assert!(validate_till_id("").is_err());
        assert!(validate_till_id("   ").is_err());
    }

    #[test]
    fn test_validate_opening_amount() {
        assert!(validate_opening_amount(0).is_ok());
        assert!(validate_opening_amount(20_000).is_ok());
        assert!(validate_opening_amount(-1).is_err());
    }

    #[test]
    fn test_validate_movement_amount() {
        assert!(validate_movement_amount(1).is_ok());
        assert!(validate_movement_amount(0).is_err());
        assert!(validate_movement_amount(-1_000).is_err());
    }

    #[test]
    fn test_description_required_for_manual_adjustments() {
        assert!(validate_movement_description(MovementKind::Withdrawal, None).is_err());
        assert!(validate_movement_description(MovementKind::Withdrawal, Some("  ")).is_err());
        assert!(
            validate_movement_description(MovementKind::Withdrawal, Some("bank drop")).is_ok()
        );

        assert!(validate_movement_description(MovementKind::SaleSettlement, None).is_ok());
        assert!(validate_movement_description(MovementKind::Reversal, None).is_ok());
    }

    #[test]
    fn test_description_length_cap() {
        let long = "x".repeat(MAX_DESCRIPTION_LEN + 1);
        assert!(validate_movement_description(MovementKind::Deposit, Some(&long)).is_err());
    }

    #[test]
    fn test_validate_notes() {
        assert!(validate_notes(None).is_ok());
        assert!(validate_notes(Some("drawer was short yesterday")).is_ok());
        let long = "x".repeat(MAX_NOTES_LEN + 1);
        assert!(validate_notes(Some(&long)).is_err());
    }
}
