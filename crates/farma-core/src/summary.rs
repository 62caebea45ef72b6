//! # Sales Summary
//!
//! Pure aggregation of completed sales into per-payment-method totals.
//!
//! This is display/reconciliation context only: the summary tells the
//! operator how much was sold by cash, card and pix during the session, but
//! the drawer reconciliation itself depends exclusively on the movement log
//! (see [`crate::ledger`]). Keeping the two apart means a broken sales feed
//! can never block or skew a session close.

use std::collections::BTreeMap;

use crate::types::{SaleRecord, SalesSummary};

/// Groups completed sale records by payment method.
///
/// Idempotent and side-effect-free. The feed delivers records already
/// filtered by session and completed status; this function only sums.
pub fn summarize_sales(session_id: &str, sales: &[SaleRecord]) -> SalesSummary {
    let mut by_method: BTreeMap<_, i64> = BTreeMap::new();
    let mut total_cents = 0i64;

    for sale in sales {
        *by_method.entry(sale.method).or_default() += sale.amount_cents;
        total_cents += sale.amount_cents;
    }

    SalesSummary {
        session_id: session_id.to_string(),
        total_cents,
        by_method,
        count: sales.len() as u64,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
