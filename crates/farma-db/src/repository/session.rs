//! # Session Store
//!
//! SQLite implementation of the `SessionStore` contract.
//!
//! ## Where the invariants live
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ONE OPEN SESSION PER TILL                                              │
//! │    idx_cash_sessions_one_open: UNIQUE (till_id) WHERE status = 'open'   │
//! │    The second of two racing INSERTs gets a UNIQUE violation; a          │
//! │    read-then-write check alone could let both through.                  │
//! │                                                                         │
//! │  APPEND ONLY WHILE OPEN                                                 │
//! │    INSERT ... SELECT ... WHERE EXISTS (session is open): the check      │
//! │    and the insert are one statement, so a concurrent close cannot       │
//! │    slip between them.                                                   │
//! │                                                                         │
//! │  CLOSE FENCED ON THE MOVEMENT LOG                                       │
//! │    UPDATE ... WHERE status = 'open' AND MAX(seq) = fence: a movement    │
//! │    that landed after the caller's read makes the close a no-op, so      │
//! │    the caller recomputes with it included.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use farma_caixa::store::{SessionClose, SessionStore, StoreError, StoreResult};
use farma_core::types::{CashMovement, CashSession};

use crate::error::DbError;

/// Columns of `cash_sessions`, in `CashSession` field order.
const SESSION_COLUMNS: &str = "id, till_id, status, opened_at, closed_at, opened_by, closed_by, \
     opening_cents, closing_counted_cents, closing_expected_cents, variance_cents, \
     notes_open, notes_close";

/// Columns of `cash_movements`, in `CashMovement` field order.
const MOVEMENT_COLUMNS: &str =
    "seq, id, session_id, kind, amount_cents, description, external_ref, created_at, created_by";

/// SessionStore over a SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    /// Creates a store over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteSessionStore { pool }
    }
}

/// Projects sqlx failures through [`DbError`] into the contract's error type.
fn store_err(err: sqlx::Error) -> StoreError {
    DbError::from(err).into()
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn insert_session(&self, session: &CashSession) -> StoreResult<()> {
        debug!(id = %session.id, till_id = %session.till_id, "Inserting session");

        sqlx::query(
            r#"
            INSERT INTO cash_sessions (
                id, till_id, status, opened_at, closed_at, opened_by, closed_by,
                opening_cents, closing_counted_cents, closing_expected_cents,
                variance_cents, notes_open, notes_close
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&session.id)
        .bind(&session.till_id)
        .bind(session.status)
        .bind(session.opened_at)
        .bind(session.closed_at)
        .bind(&session.opened_by)
        .bind(&session.closed_by)
        .bind(session.opening_cents)
        .bind(session.closing_counted_cents)
        .bind(session.closing_expected_cents)
        .bind(session.variance_cents)
        .bind(&session.notes_open)
        .bind(&session.notes_close)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> StoreResult<Option<CashSession>> {
        let session = sqlx::query_as::<_, CashSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM cash_sessions WHERE id = ?1"
        ))
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(session)
    }

    async fn find_open_session(&self, till_id: &str) -> StoreResult<Option<CashSession>> {
        // The partial unique index guarantees at most one row matches.
        let session = sqlx::query_as::<_, CashSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM cash_sessions WHERE till_id = ?1 AND status = 'open'"
        ))
        .bind(till_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(session)
    }

    async fn append_movement(&self, movement: &CashMovement) -> StoreResult<Option<i64>> {
        // Open-check and insert in one statement: a close committing between
        // a separate check and insert could otherwise lose this movement.
        let result = sqlx::query(
            r#"
            INSERT INTO cash_movements (
                id, session_id, kind, amount_cents, description, external_ref,
                created_at, created_by
            )
            SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8
            WHERE EXISTS (
                SELECT 1 FROM cash_sessions WHERE id = ?2 AND status = 'open'
            )
            "#,
        )
        .bind(&movement.id)
        .bind(&movement.session_id)
        .bind(movement.kind)
        .bind(movement.amount_cents)
        .bind(&movement.description)
        .bind(&movement.external_ref)
        .bind(movement.created_at)
        .bind(&movement.created_by)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let seq = result.last_insert_rowid();
        debug!(
            session_id = %movement.session_id,
            movement_id = %movement.id,
            seq,
            "Movement appended"
        );
        Ok(Some(seq))
    }

    async fn list_movements(&self, session_id: &str) -> StoreResult<Vec<CashMovement>> {
        let movements = sqlx::query_as::<_, CashMovement>(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM cash_movements WHERE session_id = ?1 ORDER BY seq"
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(movements)
    }

    async fn close_session(
        &self,
        session_id: &str,
        fence_seq: i64,
        close: &SessionClose,
    ) -> StoreResult<bool> {
        // Single atomic write: status flip, closing fields, and the fence
        // check all in one UPDATE. rows_affected = 0 means either the
        // session is no longer open or the movement log advanced.
        let result = sqlx::query(
            r#"
            UPDATE cash_sessions SET
                status = 'closed',
                closed_at = ?1,
                closed_by = ?2,
                closing_counted_cents = ?3,
                closing_expected_cents = ?4,
                variance_cents = ?5,
                notes_close = ?6
            WHERE id = ?7
              AND status = 'open'
              AND COALESCE(
                    (SELECT MAX(seq) FROM cash_movements WHERE session_id = ?7),
                    0
                  ) = ?8
            "#,
        )
        .bind(close.closed_at)
        .bind(&close.closed_by)
        .bind(close.closing_counted_cents)
        .bind(close.closing_expected_cents)
        .bind(close.variance_cents)
        .bind(&close.notes_close)
        .bind(session_id)
        .bind(fence_seq)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        let applied = result.rows_affected() > 0;
        debug!(session_id = %session_id, fence_seq, applied, "Close attempted");
        Ok(applied)
    }

    async fn list_sessions(&self, limit: u32, offset: u32) -> StoreResult<Vec<CashSession>> {
        let sessions = sqlx::query_as::<_, CashSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM cash_sessions \
             ORDER BY opened_at DESC, id LIMIT ?1 OFFSET ?2"
        ))
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(sessions)
    }
}
