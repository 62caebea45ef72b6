//! # farma-core: Pure Business Logic for the Cash Register
//!
//! This crate is the heart of the cash-register module. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Cash Register Architecture                           │
//! │                                                                         │
//! │  Admin UI (React, out of scope)                                         │
//! │       │                                                                 │
//! │  ┌────▼────────────────────────────────────────────────────────────┐   │
//! │  │          farma-caixa (lifecycle orchestration)                  │   │
//! │  │   CashSessionManager, SalesSummaryAggregator, contracts         │   │
//! │  └────┬────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │  ┌────▼────────────────────────────────────────────────────────────┐   │
//! │  │             ★ farma-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │   types • money • ledger • summary • validation                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └────┬────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │  ┌────▼────────────────────────────────────────────────────────────┐   │
//! │  │             farma-db (SQLite persistence layer)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CashSession, CashMovement, SalesSummary, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`ledger`] - The MoneyLedger: expected-balance computation
//! - [`summary`] - Pure per-payment-method sale aggregation
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output, every time. The expected
//!    balance of a session must be reproducible bit-for-bit from the movement
//!    log regardless of which reader computes it.
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here.
//! 3. **Integer Money**: all monetary values are cents (i64), never floats.
//! 4. **Explicit Errors**: all errors are typed, never strings or panics.

pub mod error;
pub mod ledger;
pub mod money;
pub mod summary;
pub mod types;
pub mod validation;

pub use error::{LedgerError, ValidationError};
pub use ledger::{compute_expected_balance, subtotals, LedgerSubtotals};
pub use money::Money;
pub use summary::summarize_sales;
pub use types::*;

/// Maximum length of a movement description.
///
/// Matches the column size in the store; validated up front so the caller
/// gets a typed error instead of a truncation or constraint failure.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Maximum length of free-text session notes (open and close).
pub const MAX_NOTES_LEN: usize = 1000;
