//! # Error Taxonomy
//!
//! Caller-facing errors for the cash-register operations.
//!
//! ## Propagation Policy
//! Every precondition violation is returned as a typed error, never silently
//! ignored. Nothing is retried internally: `StoreConflict` on `open_session`
//! means another opener won the race and the caller may retry once (the
//! retry re-evaluates "already open" correctly); `StoreConflict` on
//! `close_session` means a movement landed after the close decision and a
//! retry reconciles with it included. A nonzero variance is NOT an error.
//!
//! Every variant carries enough context (till/session id, amount) for the
//! admin UI to render an actionable message.

use thiserror::Error;

use farma_core::error::ValidationError;
use crate::store::StoreError;

/// Errors returned by [`crate::manager::CashSessionManager`] and
/// [`crate::aggregator::SalesSummaryAggregator`].
#[derive(Debug, Error)]
pub enum CaixaError {
    /// A monetary amount outside its allowed range (negative opening float,
    /// negative counted amount).
    #[error("invalid amount for {reference}: {amount_cents} cents")]
    InvalidAmount {
        reference: String,
        amount_cents: i64,
    },

    /// A movement that cannot be recorded: non-positive amount, or a missing
    /// required description. Nothing is persisted.
    #[error("invalid movement for session {session_id}: {reason}")]
    InvalidMovement { session_id: String, reason: String },

    /// An Open session already exists for this till.
    #[error("till {till_id} already has an open session")]
    SessionAlreadyOpen { till_id: String },

    /// The session exists but is Closed (or the operation requires Open).
    #[error("session {session_id} is not open")]
    SessionNotOpen { session_id: String },

    /// No session with this id.
    #[error("session {session_id} not found")]
    SessionNotFound { session_id: String },

    /// An optimistic-concurrency violation surfaced from the store: another
    /// writer won a race this operation depended on. Safe for the caller to
    /// retry once.
    #[error("store conflict during {operation} ({context})")]
    StoreConflict {
        operation: &'static str,
        context: String,
    },

    /// The external sales feed cannot be reached. Never blocks session
    /// close; only the sales summary degrades.
    #[error("sales feed unavailable for session {session_id}: {message}")]
    UpstreamUnavailable {
        session_id: String,
        message: String,
    },

    /// Malformed caller input (empty ids, oversized notes).
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Any other store failure (connection loss, timeout).
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience alias for manager/aggregator results.
pub type CaixaResult<T> = Result<T, CaixaError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = CaixaError::SessionAlreadyOpen {
            till_id: "till-1".to_string(),
        };
        assert_eq!(err.to_string(), "till till-1 already has an open session");

        let err = CaixaError::InvalidMovement {
            session_id: "s-1".to_string(),
            reason: "amount must be positive, got 0".to_string(),
        };
        assert!(err.to_string().contains("s-1"));
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_validation_converts() {
        let err: CaixaError = ValidationError::Required { field: "till_id" }.into();
        assert!(matches!(err, CaixaError::Validation(_)));
    }
}
