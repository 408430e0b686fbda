//! Upstream data providers
//!
//! Each provider wraps exactly one external service (the Generative Language
//! API, trend summaries, store search) behind a trait so the pipeline can be
//! exercised against test doubles.

use crate::error::AppResult;

pub mod gemini;
pub mod store_search;
pub mod trend_agent;

pub use gemini::GeminiProvider;
pub use store_search::StoreSearchProvider;
pub use trend_agent::TrendAgent;

/// A single, non-retried completion request
///
/// Returns `Ok(None)` when the upstream call succeeded but produced no usable
/// candidate. Transport failures, non-success statuses and undecodable bodies
/// are errors; retrying them is the caller's concern.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Removes markdown code fences that models wrap around JSON payloads
pub fn strip_code_fences(output: &str) -> String {
    output
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
