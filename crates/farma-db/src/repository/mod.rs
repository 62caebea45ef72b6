//! # Repository Module
//!
//! SQLite implementations of the storage contracts.
//!
//! ## Repository Pattern
//! ```text
//! CashSessionManager (farma-caixa)
//!       │  SessionStore trait
//!       ▼
//! SqliteSessionStore (this module)
//!       │  SQL
//!       ▼
//! SQLite database
//! ```
//!
//! The SQL, and the constraints doing the real invariant enforcement, is
//! isolated here; the manager never sees a query.

pub mod session;
