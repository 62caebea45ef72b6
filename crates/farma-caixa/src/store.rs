//! # SessionStore Contract
//!
//! The repository contract the CashSessionManager persists through. The
//! production implementation is `farma_db::SqliteSessionStore`; tests use an
//! in-memory store.
//!
//! ## What the store must guarantee
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. ONE OPEN SESSION PER TILL                                           │
//! │     insert_session fails with Conflict when the till already has an     │
//! │     Open session, enforced by a storage-level uniqueness constraint,    │
//! │     NOT by a read-then-write check (which would race).                  │
//! │                                                                         │
//! │  2. TOTAL MOVEMENT ORDER                                                │
//! │     append_movement assigns a monotonic `seq`; list_movements returns   │
//! │     movements in `seq` order, so every reader replays the same log.     │
//! │                                                                         │
//! │  3. CLOSE/APPEND FENCING                                                │
//! │     append_movement only writes while the session is Open (atomic       │
//! │     check-and-insert). close_session only applies while the session is  │
//! │     Open AND no movement landed past `fence_seq`. Together: a racing    │
//! │     movement is either included in the reconciliation (close retries)   │
//! │     or rejected, never silently dropped.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use farma_core::types::{CashMovement, CashSession};

/// Failures surfaced by a SessionStore implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A storage-level uniqueness/concurrency constraint rejected the write.
    #[error("store conflict on {constraint}")]
    Conflict { constraint: String },

    /// The store cannot be reached (connection loss, pool exhausted,
    /// caller-imposed timeout).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Any other storage failure.
    #[error("store failure: {0}")]
    Internal(String),
}

/// Convenience alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;

/// The closing fields persisted atomically with the `Open → Closed`
/// transition. Grouped so an implementation cannot write them piecemeal.
#[derive(Debug, Clone)]
pub struct SessionClose {
    pub closed_at: DateTime<Utc>,
    pub closed_by: String,
    pub closing_counted_cents: i64,
    pub closing_expected_cents: i64,
    pub variance_cents: i64,
    pub notes_close: Option<String>,
}

/// Durable storage for sessions and their movement logs.
///
/// All methods are I/O-bound and may suspend. Implementations must treat
/// each method as one atomic read-modify-write; the manager never needs a
/// cross-call transaction.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persists a new Open session.
    ///
    /// Fails with [`StoreError::Conflict`] when the till already has an Open
    /// session (partial uniqueness over `till_id` where status = Open).
    async fn insert_session(&self, session: &CashSession) -> StoreResult<()>;

    /// Fetches a session by id.
    async fn get_session(&self, session_id: &str) -> StoreResult<Option<CashSession>>;

    /// Fetches the Open session for a till, if any.
    async fn find_open_session(&self, till_id: &str) -> StoreResult<Option<CashSession>>;

    /// Appends a movement iff its session is currently Open, atomically.
    ///
    /// Returns the store-assigned `seq` on success, or `None` when the
    /// session is not Open (closed or absent); the caller distinguishes the
    /// two with [`SessionStore::get_session`]. The movement's own `seq`
    /// field is ignored on input.
    async fn append_movement(&self, movement: &CashMovement) -> StoreResult<Option<i64>>;

    /// All movements of a session in `seq` (creation) order.
    async fn list_movements(&self, session_id: &str) -> StoreResult<Vec<CashMovement>>;

    /// Applies the close iff the session is Open and its highest movement
    /// `seq` still equals `fence_seq` (0 when no movements were observed).
    ///
    /// Returns whether the close was applied. `false` means the session is
    /// no longer Open or a movement landed after the close decision; the
    /// caller classifies which.
    async fn close_session(
        &self,
        session_id: &str,
        fence_seq: i64,
        close: &SessionClose,
    ) -> StoreResult<bool>;

    /// Paged session history, newest first. For the audit screen.
    async fn list_sessions(&self, limit: u32, offset: u32) -> StoreResult<Vec<CashSession>>;
}
