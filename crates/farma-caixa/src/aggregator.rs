//! # SalesSummaryAggregator
//!
//! Read-only projection of a session's completed sales, grouped by payment
//! method, for the reconciliation screen.
//!
//! The summary is context, not input: the drawer reconciliation depends only
//! on the movement log, so a dead sales feed degrades the display and
//! nothing else. Session close must never block on this component.

use tracing::warn;

use farma_core::summary::summarize_sales;
use farma_core::types::SalesSummary;

use crate::error::{CaixaError, CaixaResult};
use crate::feed::SalesFeed;

/// Aggregates completed sales from the external feed.
#[derive(Debug, Clone)]
pub struct SalesSummaryAggregator<F> {
    feed: F,
}

impl<F: SalesFeed> SalesSummaryAggregator<F> {
    /// Creates an aggregator over the given sales feed.
    pub fn new(feed: F) -> Self {
        SalesSummaryAggregator { feed }
    }

    /// Per-method totals of the session's completed sales.
    ///
    /// Idempotent and side-effect-free. Fails with `UpstreamUnavailable`
    /// when the feed cannot be reached.
    pub async fn summarize(&self, session_id: &str) -> CaixaResult<SalesSummary> {
        let sales = self
            .feed
            .fetch_completed_sales(session_id)
            .await
            .map_err(|e| CaixaError::UpstreamUnavailable {
                session_id: session_id.to_string(),
                message: e.to_string(),
            })?;

        Ok(summarize_sales(session_id, &sales))
    }

    /// Degrading variant for the close screen: a feed failure is logged and
    /// reported as "summary unavailable" (`None`) so the close can proceed.
    pub async fn summarize_for_close(&self, session_id: &str) -> Option<SalesSummary> {
        match self.summarize(session_id).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(
                    session_id = %session_id,
                    error = %e,
                    "Sales summary unavailable, closing without it"
                );
                None
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
