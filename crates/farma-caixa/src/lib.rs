//! # farma-caixa: Cash-Register Session Orchestration
//!
//! Lifecycle orchestration for till sessions: open, record movements,
//! close/reconcile. This crate enforces the invariants; the math lives in
//! `farma-core` and the SQL lives in `farma-db`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Admin UI (out of scope)                                                │
//! │       │ open / record / close / active / movements                      │
//! │  ┌────▼────────────────────────────────────────────────────────────┐   │
//! │  │            ★ farma-caixa (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │   CashSessionManager ──► SessionStore (trait, impl in farma-db) │   │
//! │  │          │                                                      │   │
//! │  │          └──► farma_core::ledger (pure reconciliation math)     │   │
//! │  │                                                                 │   │
//! │  │   SalesSummaryAggregator ──► SalesFeed (trait, external)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`manager`] - CashSessionManager: the session state machine
//! - [`store`] - SessionStore repository contract + StoreError
//! - [`aggregator`] - SalesSummaryAggregator (display-only sale totals)
//! - [`feed`] - SalesFeed contract for the external sales system
//! - [`error`] - The caller-facing error taxonomy

pub mod aggregator;
pub mod error;
pub mod feed;
pub mod manager;
pub mod store;

pub use aggregator::SalesSummaryAggregator;
pub use error::{CaixaError, CaixaResult};
pub use feed::{FeedError, SalesFeed};
pub use manager::CashSessionManager;
pub use store::{SessionClose, SessionStore, StoreError, StoreResult};
