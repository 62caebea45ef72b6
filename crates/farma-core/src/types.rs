//! # Domain Types
//!
//! Core domain types for the cash-register session ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐    │
//! │  │   CashSession    │   │   CashMovement   │   │   SalesSummary   │    │
//! │  │  ──────────────  │   │  ──────────────  │   │  ──────────────  │    │
//! │  │  id (UUID)       │   │  seq (ordering)  │   │  total_cents     │    │
//! │  │  till_id         │   │  session_id (FK) │   │  by_method       │    │
//! │  │  status          │   │  kind            │   │  count           │    │
//! │  │  opening_cents   │   │  amount_cents    │   │  (derived, not   │    │
//! │  │  closing_* ...   │   │  created_by      │   │   persisted)     │    │
//! │  └──────────────────┘   └──────────────────┘   └──────────────────┘    │
//! │                                                                         │
//! │  SessionStatus: Open | Closed (terminal)                                │
//! │  MovementKind:  Withdrawal | Deposit | SaleSettlement | Reversal        │
//! │  PaymentMethod: Cash | Card | Pix | Other                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sessions are identified by a UUID assigned at open time. Movements carry a
//! store-assigned `seq` in addition to their UUID: `seq` is the total order
//! the ledger replays, monotonic within the store with insertion tie-break.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Session Status
// =============================================================================

/// Lifecycle state of a till session.
///
/// `Closed` is terminal: there is no reopening, and no movement may be
/// written against a closed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Till is open and accepting movements.
    Open,
    /// Till has been reconciled and closed (terminal).
    Closed,
}

// =============================================================================
// Cash Session
// =============================================================================

/// A till-opening period.
///
/// ## Invariants
/// - At most one session per till is `Open` at any time (enforced by the
///   store's partial unique constraint).
/// - `opening_cents` and identity are immutable once created.
/// - The `closing_*` fields are written exactly once, atomically with the
///   `Open → Closed` transition, and `closing_expected_cents` is always a
///   ledger computation, never user-supplied.
/// - Sessions are never deleted; the row is the audit record.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CashSession {
    /// Unique identifier (UUID v4), assigned at open.
    pub id: String,

    /// Which register this session belongs to.
    pub till_id: String,

    /// Current lifecycle state.
    pub status: SessionStatus,

    /// When the till was opened.
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,

    /// When the till was closed. `None` while open.
    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,

    /// Operator id who opened the till.
    pub opened_by: String,

    /// Operator id who closed the till.
    pub closed_by: Option<String>,

    /// Float placed in the drawer at open time, in cents. Non-negative.
    pub opening_cents: i64,

    /// Cash physically counted by the operator at close, in cents.
    pub closing_counted_cents: Option<i64>,

    /// Ledger-computed expected balance at close, in cents.
    pub closing_expected_cents: Option<i64>,

    /// `counted − expected`, stored for audit. Negative means a shortage.
    pub variance_cents: Option<i64>,

    /// Free-text note captured at open.
    pub notes_open: Option<String>,

    /// Free-text note captured at close.
    pub notes_close: Option<String>,
}

impl CashSession {
    /// Whether the session is still accepting movements.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == SessionStatus::Open
    }

    /// Returns the opening float as Money.
    #[inline]
    pub fn opening_amount(&self) -> Money {
        Money::from_cents(self.opening_cents)
    }

    /// Returns the stored variance as Money, if the session is closed.
    #[inline]
    pub fn variance(&self) -> Option<Money> {
        self.variance_cents.map(Money::from_cents)
    }
}

// =============================================================================
// Movement Kind
// =============================================================================

/// The kind of a cash-affecting event within a session.
///
/// The sign of each kind is fixed here and in the ledger, never inferred
/// from the amount: amounts are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Cash taken out of the drawer ("sangria"). Subtracts.
    Withdrawal,
    /// Cash added to the drawer ("suprimento"). Adds.
    Deposit,
    /// Cash portion of a completed sale settled into the drawer. Adds.
    SaleSettlement,
    /// Cash refunded against an earlier sale ("estorno"). Subtracts.
    Reversal,
}

impl MovementKind {
    /// Whether this kind requires a free-text description.
    ///
    /// Manual drawer adjustments must say why; settlements and reversals
    /// carry an external sale reference instead.
    #[inline]
    pub fn requires_description(&self) -> bool {
        matches!(self, MovementKind::Withdrawal | MovementKind::Deposit)
    }

    /// Whether this kind adds cash to the drawer (vs. removing it).
    #[inline]
    pub fn is_inflow(&self) -> bool {
        matches!(self, MovementKind::Deposit | MovementKind::SaleSettlement)
    }
}

// =============================================================================
// Cash Movement
// =============================================================================

/// A single cash-affecting event within a session.
///
/// Movements are append-only and immutable: they cannot outlive their
/// session, be reassigned, or be edited after the fact. Corrections are new
/// movements (a `Reversal`), never updates.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CashMovement {
    /// Store-assigned monotonic sequence number. Total order within the
    /// store; ties in `created_at` are broken by insertion order.
    pub seq: i64,

    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning session.
    pub session_id: String,

    /// What kind of event this is; fixes the sign.
    pub kind: MovementKind,

    /// Amount in cents. Strictly positive; the sign is implied by `kind`.
    pub amount_cents: i64,

    /// Why this movement happened. Required for Withdrawal/Deposit.
    pub description: Option<String>,

    /// External sale identifier, for SaleSettlement/Reversal.
    pub external_ref: Option<String>,

    /// When the movement was recorded.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Operator id who recorded the movement.
    pub created_by: String,
}

impl CashMovement {
    /// Returns the amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// Payment method buckets for the sales summary.
///
/// The upstream sales feed folds its method synonyms (crédito/débito/cartão)
/// into these buckets before they reach this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash ("dinheiro").
    Cash,
    /// Credit or debit card.
    Card,
    /// Pix instant transfer.
    Pix,
    /// Anything else (vouchers, store credit, ...).
    Other,
}

// =============================================================================
// Sale Record (from the external sales feed)
// =============================================================================

/// One completed sale as delivered by the external sales feed.
///
/// The feed is responsible for filtering by session and completed status;
/// this core only aggregates what it is given.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleRecord {
    /// Sale amount in cents.
    pub amount_cents: i64,

    /// How the sale was paid.
    pub method: PaymentMethod,

    /// When the sale completed.
    #[ts(as = "String")]
    pub completed_at: DateTime<Utc>,
}

// =============================================================================
// Sales Summary
// =============================================================================

/// Per-session totals of completed sales, grouped by payment method.
///
/// Derived on demand for the reconciliation screen; never persisted. It does
/// not feed `compute_expected_balance`: cash from sales only affects the
/// drawer when modeled as `SaleSettlement` movements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesSummary {
    /// Session the summary was computed for.
    pub session_id: String,

    /// Sum of all completed sales, in cents.
    pub total_cents: i64,

    /// Totals per payment method, in cents. BTreeMap for stable ordering.
    pub by_method: BTreeMap<PaymentMethod, i64>,

    /// Number of completed sales.
    pub count: u64,
}

// =============================================================================
// Unit Tests
// =============================================================================
