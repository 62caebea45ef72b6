//! # CashSessionManager
//!
//! Lifecycle orchestration and invariant enforcement for till sessions.
//!
//! ## State Machine (per till)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │            open_session                close_session                    │
//! │   Initial ──────────────►  Open  ─────────────────────►  Closed        │
//! │                            │  ▲                          (terminal)     │
//! │                            │  │ record_movement                         │
//! │                            └──┘ (self-loop, append-only)               │
//! │                                                                         │
//! │   open_session   fails SessionAlreadyOpen while another session is     │
//! │                  Open for the till, StoreConflict if it loses the race │
//! │   record_movement fails SessionNotOpen once the session is Closed      │
//! │   close_session  fails SessionNotOpen on a second close; the first     │
//! │                  close's variance is never overwritten                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reconciliation
//! Close loads the full movement log, computes the expected balance with
//! `farma_core::ledger`, and persists counted/expected/variance atomically
//! with the status flip. The computation is never retried automatically: a
//! variance is a valid, expected outcome and is always surfaced, never
//! swallowed or defaulted to zero.

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use farma_core::ledger::compute_expected_balance;
use farma_core::money::Money;
use farma_core::types::{CashMovement, CashSession, MovementKind, SessionStatus};
use farma_core::validation::{
    validate_movement_amount, validate_movement_description, validate_notes,
    validate_opening_amount, validate_operator_id, validate_till_id,
};

use crate::error::{CaixaError, CaixaResult};
use crate::store::{SessionClose, SessionStore, StoreError};

/// Orchestrates the session lifecycle atop a [`SessionStore`].
///
/// Holds no state of its own: the store is the single source of truth, and
/// "the current session" is always the explicit
/// [`active_session`](Self::active_session) query, never a cached global.
#[derive(Debug, Clone)]
pub struct CashSessionManager<S> {
    store: S,
}

impl<S: SessionStore> CashSessionManager<S> {
    /// Creates a manager over the given store.
    pub fn new(store: S) -> Self {
        CashSessionManager { store }
    }

    /// Opens a new session for a till.
    ///
    /// ## Failures
    /// - `InvalidAmount`: opening float is negative
    /// - `SessionAlreadyOpen`: the till already has an Open session
    /// - `StoreConflict`: a concurrent opener won the race between the
    ///   pre-check and the insert; the caller may retry once
    pub async fn open_session(
        &self,
        till_id: &str,
        opening_cents: i64,
        opened_by: &str,
        notes: Option<String>,
    ) -> CaixaResult<CashSession> {
        validate_till_id(till_id)?;
        validate_operator_id(opened_by)?;
        validate_notes(notes.as_deref())?;

        if validate_opening_amount(opening_cents).is_err() {
            return Err(CaixaError::InvalidAmount {
                reference: format!("till {till_id} opening amount"),
                amount_cents: opening_cents,
            });
        }

        // Pre-check for the friendly error. The store's uniqueness
        // constraint is what actually guarantees the invariant.
        if self.store.find_open_session(till_id).await?.is_some() {
            return Err(CaixaError::SessionAlreadyOpen {
                till_id: till_id.to_string(),
            });
        }

        let session = CashSession {
            id: Uuid::new_v4().to_string(),
            till_id: till_id.to_string(),
            status: SessionStatus::Open,
            opened_at: Utc::now(),
            closed_at: None,
            opened_by: opened_by.to_string(),
            closed_by: None,
            opening_cents,
            closing_counted_cents: None,
            closing_expected_cents: None,
            variance_cents: None,
            notes_open: normalize(notes),
            notes_close: None,
        };

        match self.store.insert_session(&session).await {
            Ok(()) => {
                info!(
                    session_id = %session.id,
                    till_id = %till_id,
                    opening = %Money::from_cents(opening_cents),
                    "Session opened"
                );
                Ok(session)
            }
            // Lost the open race: another session got in after the pre-check.
            Err(StoreError::Conflict { .. }) => Err(CaixaError::StoreConflict {
                operation: "open_session",
                context: format!("till {till_id}"),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Appends one movement to an Open session and returns it with its
    /// store-assigned sequence number.
    ///
    /// ## Failures
    /// - `InvalidMovement`: amount not positive, or a Withdrawal/Deposit
    ///   without a description; nothing is persisted
    /// - `SessionNotOpen`: the session is Closed
    /// - `SessionNotFound`: no such session
    pub async fn record_movement(
        &self,
        session_id: &str,
        kind: MovementKind,
        amount_cents: i64,
        description: Option<String>,
        created_by: &str,
        external_ref: Option<String>,
    ) -> CaixaResult<CashMovement> {
        validate_operator_id(created_by)?;

        if let Err(e) = validate_movement_amount(amount_cents) {
            return Err(CaixaError::InvalidMovement {
                session_id: session_id.to_string(),
                reason: e.to_string(),
            });
        }
        if let Err(e) = validate_movement_description(kind, description.as_deref()) {
            return Err(CaixaError::InvalidMovement {
                session_id: session_id.to_string(),
                reason: e.to_string(),
            });
        }

        let movement = CashMovement {
            seq: 0, // assigned by the store
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            kind,
            amount_cents,
            description: normalize(description),
            external_ref: normalize(external_ref),
            created_at: Utc::now(),
            created_by: created_by.to_string(),
        };

        match self.store.append_movement(&movement).await? {
            Some(seq) => {
                debug!(
                    session_id = %session_id,
                    movement_id = %movement.id,
                    seq,
                    kind = ?kind,
                    amount = %movement.amount(),
                    "Movement recorded"
                );
                Ok(CashMovement { seq, ..movement })
            }
            // The atomic check-and-insert refused the write: the session is
            // not Open. Classify.
            None => Err(self.not_open_or_missing(session_id).await?),
        }
    }

    /// Closes an Open session, reconciling counted against expected cash.
    ///
    /// Persists `closing_counted_cents`, `closing_expected_cents`,
    /// `variance_cents`, `closed_at`, `closed_by` and `status = Closed` in
    /// one atomic store write, fenced on the last observed movement. A
    /// shortage or overage is a valid outcome: the session closes and the
    /// variance is stored for audit.
    ///
    /// ## Failures
    /// - `InvalidAmount`: counted amount is negative
    /// - `SessionNotOpen`: already closed (the first close's record stands)
    /// - `SessionNotFound`: no such session
    /// - `StoreConflict`: a movement landed after the close decision; a
    ///   retry reconciles with it included
    pub async fn close_session(
        &self,
        session_id: &str,
        counted_cents: i64,
        closed_by: &str,
        notes: Option<String>,
    ) -> CaixaResult<CashSession> {
        validate_operator_id(closed_by)?;
        validate_notes(notes.as_deref())?;

        if counted_cents < 0 {
            return Err(CaixaError::InvalidAmount {
                reference: format!("session {session_id} counted amount"),
                amount_cents: counted_cents,
            });
        }

        let session = self
            .store
            .get_session(session_id)
            .await?
            .ok_or_else(|| CaixaError::SessionNotFound {
                session_id: session_id.to_string(),
            })?;
        if !session.is_open() {
            return Err(CaixaError::SessionNotOpen {
                session_id: session_id.to_string(),
            });
        }

        let movements = self.store.list_movements(session_id).await?;
        let fence_seq = movements.last().map(|m| m.seq).unwrap_or(0);

        let expected = compute_expected_balance(session.opening_amount(), &movements)
            .map_err(|e| CaixaError::InvalidMovement {
                session_id: session_id.to_string(),
                reason: e.to_string(),
            })?;

        let counted = Money::from_cents(counted_cents);
        let variance = counted - expected;

        let close = SessionClose {
            closed_at: Utc::now(),
            closed_by: closed_by.to_string(),
            closing_counted_cents: counted.cents(),
            closing_expected_cents: expected.cents(),
            variance_cents: variance.cents(),
            notes_close: normalize(notes),
        };

        let applied = self
            .store
            .close_session(session_id, fence_seq, &close)
            .await?;
        if !applied {
            // Either another closer won, or a movement slipped past our
            // fence. The latter makes a retry reconcile with it included.
            return Err(self.close_conflict(session_id).await?);
        }

        if variance.is_zero() {
            info!(
                session_id = %session_id,
                expected = %expected,
                counted = %counted,
                "Session closed, drawer balanced"
            );
        } else {
            warn!(
                session_id = %session_id,
                expected = %expected,
                counted = %counted,
                variance = %variance,
                "Session closed with variance"
            );
        }

        Ok(CashSession {
            status: SessionStatus::Closed,
            closed_at: Some(close.closed_at),
            closed_by: Some(close.closed_by.clone()),
            closing_counted_cents: Some(close.closing_counted_cents),
            closing_expected_cents: Some(close.closing_expected_cents),
            variance_cents: Some(close.variance_cents),
            notes_close: close.notes_close.clone(),
            ..session
        })
    }

    /// The Open session for a till, if any. Always a store query; the core
    /// caches no "current session" state.
    pub async fn active_session(&self, till_id: &str) -> CaixaResult<Option<CashSession>> {
        validate_till_id(till_id)?;
        Ok(self.store.find_open_session(till_id).await?)
    }

    /// All movements of a session in creation order.
    pub async fn list_movements(&self, session_id: &str) -> CaixaResult<Vec<CashMovement>> {
        if self.store.get_session(session_id).await?.is_none() {
            return Err(CaixaError::SessionNotFound {
                session_id: session_id.to_string(),
            });
        }
        Ok(self.store.list_movements(session_id).await?)
    }

    /// Paged session history, newest first. For the audit screen.
    pub async fn session_history(&self, limit: u32, offset: u32) -> CaixaResult<Vec<CashSession>> {
        Ok(self.store.list_sessions(limit, offset).await?)
    }

    /// Classifies a refused movement append.
    async fn not_open_or_missing(&self, session_id: &str) -> CaixaResult<CaixaError> {
        Ok(match self.store.get_session(session_id).await? {
            None => CaixaError::SessionNotFound {
                session_id: session_id.to_string(),
            },
            Some(s) if !s.is_open() => CaixaError::SessionNotOpen {
                session_id: session_id.to_string(),
            },
            // Open again already? Can only be a re-observation glitch.
            Some(_) => CaixaError::StoreConflict {
                operation: "record_movement",
                context: format!("session {session_id}"),
            },
        })
    }

    /// Classifies a refused close.
    async fn close_conflict(&self, session_id: &str) -> CaixaResult<CaixaError> {
        Ok(match self.store.get_session(session_id).await? {
            None => CaixaError::SessionNotFound {
                session_id: session_id.to_string(),
            },
            Some(s) if !s.is_open() => CaixaError::SessionNotOpen {
                session_id: session_id.to_string(),
            },
            // Still open: the movement log advanced past our fence.
            Some(_) => CaixaError::StoreConflict {
                operation: "close_session",
                context: format!("session {session_id}: movements advanced past fence"),
            },
        })
    }
}

/// Trims optional free text, dropping it entirely when blank.
fn normalize(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

// =============================================================================
// Unit Tests
// =============================================================================
