use std::sync::Arc;
use std::time::Duration;

use crate::services::providers::CompletionProvider;

/// Returned when every attempt against the upstream failed
pub const RETRIES_EXHAUSTED: &str = "Failed to get a recommendation after several retries.";

/// Returned when the upstream succeeded but produced no usable candidate
pub const NO_RECOMMENDATION: &str = "No recommendation found.";

/// Anything that turns a prompt into text
///
/// Implementations never fail: upstream problems surface as the sentinel
/// strings [`RETRIES_EXHAUSTED`] and [`NO_RECOMMENDATION`].
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> String;
}

/// True for the soft-failure values a [`TextGenerator`] may return
pub fn is_sentinel(text: &str) -> bool {
    let text = text.trim();
    text == RETRIES_EXHAUSTED || text == NO_RECOMMENDATION
}

/// Exponential backoff settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(1))
    }
}

impl RetryPolicy {
    /// `max_attempts` counts the first attempt and is clamped to at least 1
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Policy without any sleeping between attempts
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after the `failures`-th failed attempt: `base_delay * 2^failures`
    pub fn delay_after(&self, failures: u32) -> Duration {
        let factor = 2u32.checked_pow(failures).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

/// Text-generation client with retry and sentinel semantics
#[derive(Clone)]
pub struct TextGenerationClient {
    provider: Arc<dyn CompletionProvider>,
    policy: RetryPolicy,
}

impl TextGenerationClient {
    pub fn new(provider: Arc<dyn CompletionProvider>, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }
}

#[async_trait::async_trait]
impl TextGenerator for TextGenerationClient {
    async fn generate(&self, prompt: &str) -> String {
        let max_attempts = self.policy.max_attempts();

        for attempt in 1..=max_attempts {
            match self.provider.complete(prompt).await {
                Ok(Some(text)) => return text,
                Ok(None) => {
                    tracing::warn!(
                        provider = self.provider.name(),
                        "Upstream returned no usable candidate"
                    );
                    return NO_RECOMMENDATION.to_string();
                }
                Err(e) => {
                    if attempt == max_attempts {
                        tracing::error!(
                            provider = self.provider.name(),
                            attempt,
                            error = %e,
                            "Text generation failed, giving up"
                        );
                        break;
                    }

                    let delay = self.policy.delay_after(attempt);
                    tracing::warn!(
                        provider = self.provider.name(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Text generation failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        RETRIES_EXHAUSTED.to_string()
    }
}
