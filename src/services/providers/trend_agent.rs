//! LLM-backed trend summaries
//!
//! Asks the model for a JSON trend report matching [`TrendReport`] and decodes
//! it. Reports are cached in Redis per query when a cache is configured.

use std::sync::Arc;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::TrendReport,
    services::{
        providers::{strip_code_fences, CompletionProvider},
        trends::TrendSource,
    },
};

const TREND_CACHE_TTL: u64 = 3600; // 1 hour

#[derive(Clone)]
pub struct TrendAgent {
    provider: Arc<dyn CompletionProvider>,
    cache: Option<Cache>,
}

impl TrendAgent {
    pub fn new(provider: Arc<dyn CompletionProvider>, cache: Option<Cache>) -> Self {
        Self { provider, cache }
    }

    fn build_prompt(query: &str) -> String {
        format!(
            "You are a Trend Analyzer Agent specializing in fashion.\n\
             Summarize what is currently trending on Instagram, TikTok and fashion blogs for: \"{query}\".\n\
             - Only include results directly related to fashion, style, outfits, OOTD, or clothing trends.\n\
             - Discard unrelated results (celebrity gossip, tech, news not about clothing).\n\
             - Keep each trend to a short phrase.\n\
             Respond ONLY with a JSON object of the form:\n\
             {{\"trend_topic\": string, \"current_trends\": [string], \"insights\": string, \"sources\": [string]}}"
        )
    }

    async fn fetch_report(&self, query: &str) -> AppResult<TrendReport> {
        let output = self
            .provider
            .complete(&Self::build_prompt(query))
            .await?
            .ok_or_else(|| AppError::ExternalApi("Trend agent returned no output".to_string()))?;

        let report = parse_report(&output)?;

        tracing::info!(
            query = %query,
            trends = report.current_trends.len(),
            provider = self.provider.name(),
            "Trend report fetched"
        );

        Ok(report)
    }
}

/// Decodes a model answer into a [`TrendReport`]
pub fn parse_report(output: &str) -> AppResult<TrendReport> {
    let clean = strip_code_fences(output);
    serde_json::from_str(&clean).map_err(|e| {
        tracing::error!(error = %e, output = %output, "Failed to decode trend report");
        AppError::ExternalApi(format!("Failed to parse trend report: {}", e))
    })
}

#[async_trait::async_trait]
impl TrendSource for TrendAgent {
    async fn lookup(&self, query: &str) -> AppResult<TrendReport> {
        match &self.cache {
            Some(cache) => cached!(
                cache,
                CacheKey::Trends(query.to_string()),
                TREND_CACHE_TTL,
                self.fetch_report(query)
            ),
            None => self.fetch_report(query).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockCompletionProvider;

    #[test]
    fn test_parse_fenced_report() {
        let output = "```json\n{\n  \"trend_topic\": \"work casual\",\n  \"current_trends\": [\"Relaxed tailoring style\"],\n  \"insights\": \"Soft suiting dominates.\",\n  \"sources\": [\"https://www.elle.com/fashion/\"]\n}\n```";

        let report = parse_report(output).unwrap();
        assert_eq!(report.trend_topic, "work casual");
        assert_eq!(report.current_trends, vec!["Relaxed tailoring style".to_string()]);
        assert_eq!(report.insights, "Soft suiting dominates.");
    }

    #[test]
    fn test_parse_prose_fails() {
        assert!(parse_report("Here are some trends: blazers.").is_err());
    }

    #[test]
    fn test_prompt_mentions_query_and_schema() {
        let prompt = TrendAgent::build_prompt("party chic fashion trends");
        assert!(prompt.contains("\"party chic fashion trends\""));
        assert!(prompt.contains("\"current_trends\": [string]"));
    }

    #[tokio::test]
    async fn test_lookup_without_cache() {
        let mut provider = MockCompletionProvider::new();
        provider.expect_name().return_const("mock");
        provider.expect_complete().times(1).returning(|_| {
            Ok(Some(
                r#"{"trend_topic":"t","current_trends":["Denim on denim look"],"insights":"","sources":[]}"#
                    .to_string(),
            ))
        });

        let agent = TrendAgent::new(Arc::new(provider), None);
        let report = agent.lookup("denim").await.unwrap();
        assert_eq!(report.current_trends, vec!["Denim on denim look".to_string()]);
    }

    #[tokio::test]
    async fn test_lookup_with_unreachable_cache_uses_provider() {
        let mut provider = MockCompletionProvider::new();
        provider.expect_name().return_const("mock");
        provider.expect_complete().times(1).returning(|_| {
            Ok(Some(
                r#"{"trend_topic":"denim","current_trends":["Denim on denim look"],"insights":"","sources":[]}"#
                    .to_string(),
            ))
        });

        let client = crate::db::create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, _handle) = Cache::new(client).await;

        let agent = TrendAgent::new(Arc::new(provider), Some(cache));
        let report = agent.lookup("denim").await.unwrap();
        assert_eq!(report.current_trends, vec!["Denim on denim look".to_string()]);
    }

    #[tokio::test]
    async fn test_lookup_empty_output_is_error() {
        let mut provider = MockCompletionProvider::new();
        provider.expect_name().return_const("mock");
        provider.expect_complete().returning(|_| Ok(None));

        let agent = TrendAgent::new(Arc::new(provider), None);
        assert!(agent.lookup("denim").await.is_err());
    }
}
