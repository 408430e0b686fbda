use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod preferences;
pub mod recommendation;

pub use preferences::{PreferenceRecord, PreferenceUpdate};
pub use recommendation::{Gender, OutfitRecommendation, RecommendationMode, RecommendationRequest};

/// A user's stored garments, one free-text description per item
pub type Closet = Vec<String>;

/// Summary of current trends for a topic
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendReport {
    pub trend_topic: String,
    #[serde(default)]
    pub current_trends: Vec<String>,
    #[serde(default)]
    pub insights: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default = "Utc::now")]
    pub fetched_at: DateTime<Utc>,
}

/// Shopping links found for an outfit description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProductSearchResult {
    pub full_outfit_description: String,
    pub shopping_links: Vec<String>,
}

// ============================================================================
// Generative Language API Types
// ============================================================================

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<GeminiContent>,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default)]
    pub text: String,
}

/// Response body of `generateContent`
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    pub content: Option<GeminiContent>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if the model produced one
    pub fn first_text(&self) -> Option<String> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| content.parts.first())
            .map(|part| part.text.clone())
            .filter(|text| !text.trim().is_empty())
    }
}
