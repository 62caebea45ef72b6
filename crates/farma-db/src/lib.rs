//! # farma-db: SQLite Persistence for the Cash Register
//!
//! This crate implements the `farma_caixa::SessionStore` contract over a
//! local SQLite database.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  farma-caixa (CashSessionManager)                                       │
//! │       │  SessionStore trait calls                                       │
//! │  ┌────▼────────────────────────────────────────────────────────────┐   │
//! │  │                   farma-db (THIS CRATE)                         │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────────┐   ┌────────────────────┐   ┌──────────────┐  │   │
//! │  │   │  Database   │   │ SqliteSessionStore │   │  Migrations  │  │   │
//! │  │   │  (pool.rs)  │◄──│ (repository)       │   │  (embedded)  │  │   │
//! │  │   └─────────────┘   └────────────────────┘   └──────────────┘  │   │
//! │  └────┬────────────────────────────────────────────────────────────┘   │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL mode)                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - SessionStore implementation
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use farma_caixa::CashSessionManager;
//! use farma_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/farma.db")).await?;
//! let manager = CashSessionManager::new(db.sessions());
//!
//! let session = manager.open_session("till-1", 20_000, "op-1", None).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::DbError;
pub use pool::{Database, DbConfig};
pub use repository::session::SqliteSessionStore;
