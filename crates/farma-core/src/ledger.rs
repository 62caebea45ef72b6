//! # MoneyLedger
//!
//! Pure, deterministic computation of a session's expected balance from its
//! opening float and its ordered movement list.
//!
//! ## Single Source of Truth
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The legacy system recomputed totals ad hoc in several places (UI       │
//! │  state, service layer, stored columns) with drift between them. Here    │
//! │  there is exactly ONE arithmetic path:                                  │
//! │                                                                         │
//! │    movements ──► subtotals() ──► compute_expected_balance()             │
//! │                                                                         │
//! │  Everything that needs an expected balance (close reconciliation, live  │
//! │  drawer display, audit report) calls these functions against the        │
//! │  movement log. Nothing caches a running total.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sign Semantics (fixed by kind, never inferred)
//! ```text
//! expected = opening
//!          + Σ Deposit
//!          + Σ SaleSettlement   (cash settled into the drawer)
//!          − Σ Withdrawal
//!          − Σ Reversal         (cash refunded out of the drawer)
//! ```
//!
//! All arithmetic is integer cents. Two computations over the same movement
//! list are bit-for-bit identical regardless of reader or platform.

use crate::error::LedgerError;
use crate::money::Money;
use crate::types::{CashMovement, MovementKind};

/// Per-kind subtotals over a movement list. Each total is a non-negative sum
/// of that kind's (positive) amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerSubtotals {
    /// Total of `Withdrawal` movements (sangrias).
    pub withdrawals: Money,
    /// Total of `Deposit` movements (suprimentos).
    pub deposits: Money,
    /// Total of `SaleSettlement` movements.
    pub settlements: Money,
    /// Total of `Reversal` movements (estornos).
    pub reversals: Money,
}

impl LedgerSubtotals {
    /// Net effect of the movements on the drawer, excluding the opening
    /// float: inflows minus outflows.
    #[inline]
    pub fn net(&self) -> Money {
        self.deposits + self.settlements - self.withdrawals - self.reversals
    }
}

/// Sums movement amounts by kind.
///
/// Fails with [`LedgerError::InvalidMovement`] on the first movement whose
/// amount is not strictly positive. The write path validates amounts before
/// persisting, so this firing indicates corrupted or hand-edited data; the
/// ledger refuses to produce a balance from it rather than guessing.
pub fn subtotals(movements: &[CashMovement]) -> Result<LedgerSubtotals, LedgerError> {
    let mut totals = LedgerSubtotals::default();

    for movement in movements {
        if movement.amount_cents <= 0 {
            return Err(LedgerError::InvalidMovement {
                movement_id: movement.id.clone(),
                amount_cents: movement.amount_cents,
            });
        }

        let amount = movement.amount();
        match movement.kind {
            MovementKind::Withdrawal => totals.withdrawals += amount,
            MovementKind::Deposit => totals.deposits += amount,
            MovementKind::SaleSettlement => totals.settlements += amount,
            MovementKind::Reversal => totals.reversals += amount,
        }
    }

    Ok(totals)
}

/// Computes the expected drawer balance for a session.
///
/// Defined in terms of [`subtotals`] so the breakdown shown to the operator
/// and the balance it reconciles against can never diverge.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use farma_core::ledger::compute_expected_balance;
/// use farma_core::money::Money;
/// use farma_core::types::{CashMovement, MovementKind};
///
/// let movement = |kind, cents| CashMovement {
///     seq: 0,
///     id: "m".into(),
///     session_id: "s".into(),
///     kind,
///     amount_cents: cents,
///     description: Some("shift change".into()),
///     external_ref: None,
///     created_at: Utc::now(),
///     created_by: "op-1".into(),
/// };
///
/// let movements = vec![
///     movement(MovementKind::Deposit, 5_000),
///     movement(MovementKind::Withdrawal, 3_000),
/// ];
///
/// let expected = compute_expected_balance(Money::from_cents(20_000), &movements).unwrap();
/// assert_eq!(expected.cents(), 22_000); // 200 + 50 - 30
/// ```
pub fn compute_expected_balance(
    opening: Money,
    movements: &[CashMovement],
) -> Result<Money, LedgerError> {
    let totals = subtotals(movements)?;
    Ok(opening + totals.net())
}

// =============================================================================
// Unit Tests
// =============================================================================
