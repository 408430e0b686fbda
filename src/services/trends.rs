use std::sync::Arc;

use crate::{error::AppResult, models::TrendReport};

/// Phrases a trend or source must mention to count as fashion-related
pub const FASHION_KEYWORDS: [&str; 7] = [
    "fashion", "style", "outfit", "ootd", "wear", "clothing", "look",
];

/// Maximum number of trend phrases fed into a recommendation
pub const MAX_TRENDS: usize = 3;

/// External service that summarizes current trends for a topic
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TrendSource: Send + Sync {
    async fn lookup(&self, query: &str) -> AppResult<TrendReport>;
}

fn is_fashion_related(text: &str) -> bool {
    let text = text.to_lowercase();
    FASHION_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}

/// Drops trends and sources that are not about clothing
pub fn filter_report(mut report: TrendReport) -> TrendReport {
    report.current_trends.retain(|trend| is_fashion_related(trend));
    report.sources.retain(|source| is_fashion_related(source));
    report
}

/// Trend lookup with keyword filtering and bounded output
#[derive(Clone)]
pub struct TrendLookup {
    source: Arc<dyn TrendSource>,
}

impl TrendLookup {
    pub fn new(source: Arc<dyn TrendSource>) -> Self {
        Self { source }
    }

    /// Full filtered report, errors propagated
    pub async fn report(&self, query: &str) -> AppResult<TrendReport> {
        let report = self.source.lookup(query).await?;
        Ok(filter_report(report))
    }

    /// At most [`MAX_TRENDS`] fashion trends; any failure yields an empty list
    pub async fn lookup(&self, query: &str) -> Vec<String> {
        match self.report(query).await {
            Ok(report) => report.current_trends.into_iter().take(MAX_TRENDS).collect(),
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "Trend lookup failed, continuing without trends");
                Vec::new()
            }
        }
    }
}
