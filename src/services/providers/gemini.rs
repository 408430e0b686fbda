//! Google Generative Language API provider
//!
//! Calls `POST {api_url}/v1beta/models/{model}:generateContent?key=...` with a
//! single text part and returns the first candidate's text.

use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{GenerateContentRequest, GenerateContentResponse},
    services::providers::CompletionProvider,
};

#[derive(Clone)]
pub struct GeminiProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            model,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait::async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> AppResult<Option<String>> {
        let response = self
            .http_client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        tracing::debug!(model = %self.model, response = %response_text, "Raw Gemini response");

        let parsed: GenerateContentResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                AppError::ExternalApi(format!("Failed to parse Gemini response: {}", e))
            })?;

        Ok(parsed.first_text())
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
