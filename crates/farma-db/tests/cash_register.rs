//! Integration tests for the cash-register store over a real SQLite database.
//!
//! These run the full stack (manager, store trait, SQL, schema constraints)
//! against an in-memory database, so the partial unique index, the
//! append-while-open guard, and the close fence are exercised as SQLite
//! enforces them, not as the in-memory test store simulates them.

use chrono::Utc;

use farma_caixa::store::{SessionClose, SessionStore, StoreError};
use farma_caixa::{CaixaError, CashSessionManager};
use farma_core::types::{CashMovement, CashSession, MovementKind, SessionStatus};
use farma_db::{Database, DbConfig, SqliteSessionStore};

async fn open_db() -> Database {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    Database::new(DbConfig::in_memory()).await.unwrap()
}

fn open_session_row(id: &str, till_id: &str) -> CashSession {
    CashSession {
        id: id.to_string(),
        till_id: till_id.to_string(),
        status: SessionStatus::Open,
        opened_at: Utc::now(),
        closed_at: None,
        opened_by: "op-1".to_string(),
        closed_by: None,
        opening_cents: 10_000,
        closing_counted_cents: None,
        closing_expected_cents: None,
        variance_cents: None,
        notes_open: None,
        notes_close: None,
    }
}

#[tokio::test]
async fn test_lifecycle_balanced_close() {
    let db = open_db().await;
    let mgr = CashSessionManager::new(db.sessions());

    // Open 200.00, deposit 50.00, withdraw 30.00, count 220.00.
    let s = mgr
        .open_session("till-1", 20_000, "op-1", Some("morning shift".into()))
        .await
        .unwrap();
    assert!(s.is_open());

    mgr.record_movement(
        &s.id,
        MovementKind::Deposit,
        5_000,
        Some("change from safe".into()),
        "op-1",
        None,
    )
    .await
    .unwrap();
    mgr.record_movement(
        &s.id,
        MovementKind::Withdrawal,
        3_000,
        Some("bank drop".into()),
        "op-1",
        None,
    )
    .await
    .unwrap();

    let closed = mgr
        .close_session(&s.id, 22_000, "op-1", None)
        .await
        .unwrap();
    assert_eq!(closed.status, SessionStatus::Closed);
    assert_eq!(closed.closing_expected_cents, Some(22_000));
    assert_eq!(closed.variance_cents, Some(0));

    // The persisted row matches what the manager returned.
    let stored = db.sessions().get_session(&s.id).await.unwrap().unwrap();
    assert_eq!(stored.status, SessionStatus::Closed);
    assert_eq!(stored.closing_counted_cents, Some(22_000));
    assert_eq!(stored.closed_by.as_deref(), Some("op-1"));
    assert_eq!(stored.notes_open.as_deref(), Some("morning shift"));
}

#[tokio::test]
async fn test_close_with_shortage_is_recorded() {
    let db = open_db().await;
    let mgr = CashSessionManager::new(db.sessions());

    let s = mgr
        .open_session("till-1", 20_000, "op-1", None)
        .await
        .unwrap();
    mgr.record_movement(
        &s.id,
        MovementKind::SaleSettlement,
        5_000,
        None,
        "op-1",
        Some("sale-42".into()),
    )
    .await
    .unwrap();

    // Counted 240.00 against expected 250.00.
    let closed = mgr
        .close_session(&s.id, 24_000, "op-1", Some("drawer short".into()))
        .await
        .unwrap();
    assert_eq!(closed.status, SessionStatus::Closed);
    assert_eq!(closed.closing_expected_cents, Some(25_000));
    assert_eq!(closed.variance_cents, Some(-1_000));
}

#[tokio::test]
async fn test_open_uniqueness_enforced_by_index() {
    let db = open_db().await;
    let store = db.sessions();

    store
        .insert_session(&open_session_row("s-1", "till-1"))
        .await
        .unwrap();

    // Second open row for the same till hits the partial unique index
    // directly, without any manager pre-check in the way.
    let err = store
        .insert_session(&open_session_row("s-2", "till-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict { .. }));

    // A different till is unaffected.
    store
        .insert_session(&open_session_row("s-3", "till-2"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reopen_after_close_allowed() {
    let db = open_db().await;
    let mgr = CashSessionManager::new(db.sessions());

    let first = mgr.open_session("till-1", 0, "op-1", None).await.unwrap();
    mgr.close_session(&first.id, 0, "op-1", None).await.unwrap();

    // The index only covers rows WHERE status = 'open', so closed rows
    // never block a new session.
    let second = mgr
        .open_session("till-1", 5_000, "op-2", None)
        .await
        .unwrap();
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn test_append_refused_once_closed() {
    let db = open_db().await;
    let store = db.sessions();
    let mgr = CashSessionManager::new(store.clone());

    let s = mgr.open_session("till-1", 0, "op-1", None).await.unwrap();
    mgr.close_session(&s.id, 0, "op-1", None).await.unwrap();

    // Store level: the conditional insert refuses the write outright.
    let late = CashMovement {
        seq: 0,
        id: "late-1".to_string(),
        session_id: s.id.clone(),
        kind: MovementKind::Deposit,
        amount_cents: 100,
        description: Some("late".to_string()),
        external_ref: None,
        created_at: Utc::now(),
        created_by: "op-1".to_string(),
    };
    assert!(store.append_movement(&late).await.unwrap().is_none());

    // Manager level: classified as SessionNotOpen.
    let err = mgr
        .record_movement(&s.id, MovementKind::Deposit, 100, Some("late".into()), "op-1", None)
        .await
        .unwrap_err();
    assert!(matches!(err, CaixaError::SessionNotOpen { .. }));

    assert!(store.list_movements(&s.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_append_to_unknown_session() {
    let db = open_db().await;
    let mgr = CashSessionManager::new(db.sessions());

    let err = mgr
        .record_movement("no-such-id", MovementKind::Deposit, 100, Some("x".into()), "op-1", None)
        .await
        .unwrap_err();
    assert!(matches!(err, CaixaError::SessionNotFound { .. }));
}

#[tokio::test]
async fn test_close_fence_refuses_stale_reconciliation() {
    let db = open_db().await;
    let store = db.sessions();
    let mgr = CashSessionManager::new(store.clone());

    let s = mgr
        .open_session("till-1", 10_000, "op-1", None)
        .await
        .unwrap();
    mgr.record_movement(&s.id, MovementKind::Deposit, 1_000, Some("float".into()), "op-1", None)
        .await
        .unwrap();

    // A close computed before that movement existed carries fence_seq = 0.
    let stale = SessionClose {
        closed_at: Utc::now(),
        closed_by: "op-1".to_string(),
        closing_counted_cents: 10_000,
        closing_expected_cents: 10_000,
        variance_cents: 0,
        notes_close: None,
    };
    let applied = store.close_session(&s.id, 0, &stale).await.unwrap();
    assert!(!applied);

    // The session stayed open; a fresh close includes the movement.
    let closed = mgr
        .close_session(&s.id, 11_000, "op-1", None)
        .await
        .unwrap();
    assert_eq!(closed.closing_expected_cents, Some(11_000));
    assert_eq!(closed.variance_cents, Some(0));
}

#[tokio::test]
async fn test_movement_order_and_kind_round_trip() {
    let db = open_db().await;
    let mgr = CashSessionManager::new(db.sessions());

    let s = mgr.open_session("till-1", 0, "op-1", None).await.unwrap();

    let kinds = [
        (MovementKind::Deposit, Some("opening change"), None),
        (MovementKind::SaleSettlement, None, Some("sale-1")),
        (MovementKind::Withdrawal, Some("bank drop"), None),
        (MovementKind::Reversal, None, Some("sale-1")),
    ];
    for (kind, description, external_ref) in kinds {
        mgr.record_movement(
            &s.id,
            kind,
            1_000,
            description.map(String::from),
            "op-1",
            external_ref.map(String::from),
        )
        .await
        .unwrap();
    }

    let movements = mgr.list_movements(&s.id).await.unwrap();
    assert_eq!(movements.len(), kinds.len());
    for (movement, (kind, _, external_ref)) in movements.iter().zip(kinds) {
        assert_eq!(movement.kind, kind);
        assert_eq!(movement.external_ref.as_deref(), external_ref);
    }
    assert!(movements.windows(2).all(|w| w[0].seq < w[1].seq));
}

#[tokio::test]
async fn test_invalid_movement_persists_nothing() {
    let db = open_db().await;
    let mgr = CashSessionManager::new(db.sessions());

    let s = mgr.open_session("till-1", 0, "op-1", None).await.unwrap();

    for bad in [0, -500] {
        let err = mgr
            .record_movement(&s.id, MovementKind::Deposit, bad, Some("x".into()), "op-1", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CaixaError::InvalidMovement { .. }));
    }
    let err = mgr
        .record_movement(&s.id, MovementKind::Withdrawal, 100, None, "op-1", None)
        .await
        .unwrap_err();
    assert!(matches!(err, CaixaError::InvalidMovement { .. }));

    assert!(mgr.list_movements(&s.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_session_history_paging() {
    let db = open_db().await;
    let mgr = CashSessionManager::new(db.sessions());

    for i in 0..3i64 {
        let s = mgr
            .open_session("till-1", i * 100, "op-1", None)
            .await
            .unwrap();
        mgr.close_session(&s.id, i * 100, "op-1", None).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let page = mgr.session_history(2, 0).await.unwrap();
    assert_eq!(page.len(), 2);
    assert!(page[0].opened_at >= page[1].opened_at);
    assert_eq!(page[0].opening_cents, 200);

    let rest = mgr.session_history(2, 2).await.unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].opening_cents, 0);
}

#[tokio::test]
async fn test_active_session_survives_round_trip() {
    let db = open_db().await;
    let mgr = CashSessionManager::new(db.sessions());

    assert!(mgr.active_session("till-1").await.unwrap().is_none());

    let s = mgr
        .open_session("till-1", 7_500, "op-1", Some("  padded note  ".into()))
        .await
        .unwrap();

    let active = mgr.active_session("till-1").await.unwrap().unwrap();
    assert_eq!(active.id, s.id);
    assert_eq!(active.opening_cents, 7_500);
    // Notes are trimmed before they hit the store.
    assert_eq!(active.notes_open.as_deref(), Some("padded note"));

    mgr.close_session(&s.id, 7_500, "op-1", None).await.unwrap();
    assert!(mgr.active_session("till-1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_store_handle_is_shareable() {
    let db = open_db().await;
    let store: SqliteSessionStore = db.sessions();
    let mgr = CashSessionManager::new(store.clone());

    let s = mgr.open_session("till-1", 0, "op-1", None).await.unwrap();

    // A second handle over the same pool sees the same data.
    let other = CashSessionManager::new(db.sessions());
    assert!(other.active_session("till-1").await.unwrap().is_some());

    mgr.close_session(&s.id, 0, "op-1", None).await.unwrap();
    assert!(other.active_session("till-1").await.unwrap().is_none());
}
