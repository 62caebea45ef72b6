//! # SalesFeed Contract
//!
//! Read-only access to the external sales system (out of scope for this
//! core). The feed delivers completed sales for a session, already filtered
//! and with payment methods folded into the canonical buckets.

use async_trait::async_trait;
use thiserror::Error;

use farma_core::types::SaleRecord;

/// Failures from the external sales feed.
///
/// There is deliberately a single variant: from this core's perspective the
/// feed either answered or it didn't. Whatever detail the transport has goes
/// into the message for the logs.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The sales system could not be reached or answered with an error.
    #[error("sales feed unavailable: {message}")]
    Unavailable { message: String },
}

/// External sales system, consumed only by the SalesSummaryAggregator.
#[async_trait]
pub trait SalesFeed: Send + Sync {
    /// Completed sales attributed to the given session.
    async fn fetch_completed_sales(&self, session_id: &str) -> Result<Vec<SaleRecord>, FeedError>;
}
