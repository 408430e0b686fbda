use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Gender framing used when prompting for an outfit
///
/// Anything other than man/woman maps to `Neutral`; that is a valid choice, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Man,
    Woman,
    #[default]
    Neutral,
}

impl From<&str> for Gender {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "man" | "male" => Gender::Man,
            "woman" | "female" => Gender::Woman,
            _ => Gender::Neutral,
        }
    }
}

impl From<String> for Gender {
    fn from(value: String) -> Self {
        Gender::from(value.as_str())
    }
}

impl From<Gender> for String {
    fn from(gender: Gender) -> Self {
        gender.to_string()
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Man => write!(f, "man"),
            Gender::Woman => write!(f, "woman"),
            Gender::Neutral => write!(f, "person"),
        }
    }
}

/// Whether the outfit must come from the user's closet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationMode {
    #[default]
    Closet,
    General,
}

/// Inputs for one recommendation run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub occasion: String,
    #[serde(default, alias = "style_preference")]
    pub style: String,
    #[serde(default)]
    pub gender: Gender,
    /// Previously rejected outfit, used only as a negative prompt constraint
    #[serde(default)]
    pub disliked_outfit: Option<String>,
    #[serde(default, rename = "recommendation_type")]
    pub mode: RecommendationMode,
    /// Trend phrases supplied by the caller; looked up when absent
    #[serde(default)]
    pub trends: Option<Vec<String>>,
}

impl RecommendationRequest {
    pub fn new(
        occasion: impl Into<String>,
        style: impl Into<String>,
        gender: Gender,
        mode: RecommendationMode,
    ) -> Self {
        Self {
            occasion: occasion.into(),
            style: style.into(),
            gender,
            disliked_outfit: None,
            mode,
            trends: None,
        }
    }

    /// Disliked outfit text, ignoring blank input
    pub fn disliked(&self) -> Option<&str> {
        self.disliked_outfit
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Final result of the recommendation pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OutfitRecommendation {
    /// Final outfit description shown to the user
    pub recommendation: String,
    pub reasons: Vec<String>,
    pub trends_considered: Vec<String>,
    pub shopping_links: Vec<String>,
    /// True when the closet attempt failed and a general outfit was substituted
    pub is_fallback: bool,
}
