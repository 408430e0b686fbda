use std::sync::Arc;

use serde::Serialize;

use crate::{
    models::{PreferenceRecord, RecommendationMode},
    services::text_generation::TextGenerator,
};

pub const SKIN_TONE_REASON: &str =
    "White or bright/vibrant colors complement your skin tone beautifully.";
pub const PETITE_HEIGHT_REASON: &str = "Long dresses may be overwhelming for a petite height. Consider a slightly shorter hemline or tailoring.";
pub const COMFORT_FIT_REASON: &str =
    "Suggesting a more flowy top for comfort and a flattering fit.";
pub const NOTES_ADJUSTED_REASON: &str =
    "Style Notes Check: Adjusted the outfit to better fit your notes.";
pub const NOTES_ERROR_REASON: &str = "Error processing style notes with LLM.";

const WARM_SKIN_TONES: [&str; 3] = ["tan", "dark", "olive"];
const BRIGHT_COLORS: [&str; 3] = ["white", "bright", "coral"];
const PETITE_HEIGHT_CM: u32 = 160;
const HEAVY_WEIGHT_KG: u32 = 90;

/// Outfit text after preference checks, plus the notes explaining them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjustedOutfit {
    pub outfit: String,
    pub reasons: Vec<String>,
}

/// Answer to the notes check prompt
#[derive(Debug, Clone, PartialEq)]
enum NotesVerdict {
    Match(String),
    Adjust(String),
}

fn parse_verdict(response: &str) -> Option<NotesVerdict> {
    let (tag, payload) = response.trim().split_once('|')?;
    let payload = payload.trim();
    if payload.is_empty() {
        return None;
    }

    match tag.trim() {
        "MATCH" => Some(NotesVerdict::Match(payload.to_string())),
        "ADJUST" => Some(NotesVerdict::Adjust(payload.to_string())),
        _ => None,
    }
}

/// Rule-based notes; pure string and number predicates
pub fn rule_based_reasons(outfit: &str, preferences: &PreferenceRecord) -> Vec<String> {
    let outfit = outfit.to_lowercase();
    let mut reasons = Vec::new();

    for color in &preferences.favorite_colors {
        let color = color.trim();
        if !color.is_empty() && outfit.contains(&color.to_lowercase()) {
            reasons.push(format!("Matched your favorite color: {}", color));
        }
    }

    if let Some(skin_tone) = preferences.skin_tone.as_deref() {
        let skin_tone = skin_tone.to_lowercase();
        if WARM_SKIN_TONES.iter().any(|tone| skin_tone.contains(tone))
            && BRIGHT_COLORS.iter().any(|color| outfit.contains(color))
        {
            reasons.push(SKIN_TONE_REASON.to_string());
        }
    }

    if matches!(preferences.height, Some(height) if height > 0 && height < PETITE_HEIGHT_CM)
        && outfit.contains("long dress")
    {
        reasons.push(PETITE_HEIGHT_REASON.to_string());
    }

    if matches!(preferences.weight, Some(weight) if weight > HEAVY_WEIGHT_KG)
        && outfit.contains("tight crop top")
    {
        reasons.push(COMFORT_FIT_REASON.to_string());
    }

    reasons
}

/// Layers user preferences onto a generated outfit
#[derive(Clone)]
pub struct PreferenceAdjuster {
    generator: Arc<dyn TextGenerator>,
}

impl PreferenceAdjuster {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    fn notes_prompt(outfit: &str, notes: &str) -> String {
        format!(
            "You are a virtual stylist. I have an outfit suggestion and a user's free-text preferences.\n\
             Analyze the Proposed Outfit against the User Notes.\n\n\
             User Notes: \"{notes}\"\n\
             Proposed Outfit: \"{outfit}\"\n\n\
             Respond ONLY with:\n\
             1. MATCH|Reason if outfit is fine.\n\
             2. ADJUST|New complete outfit. You can suggest different items, but the new outfit must be a complete combination (top+bottom or dress/jumpsuit)."
        )
    }

    /// Never fails. In closet mode the outfit text is returned unchanged.
    pub async fn adjust(
        &self,
        outfit: &str,
        preferences: &PreferenceRecord,
        mode: RecommendationMode,
    ) -> AdjustedOutfit {
        let mut reasons = rule_based_reasons(outfit, preferences);

        let Some(notes) = preferences.notes() else {
            return AdjustedOutfit {
                outfit: outfit.to_string(),
                reasons,
            };
        };

        if mode == RecommendationMode::Closet {
            reasons.push(format!(
                "Notes received but not used: '{}'. Closet items are strictly enforced.",
                notes
            ));
            return AdjustedOutfit {
                outfit: outfit.to_string(),
                reasons,
            };
        }

        let response = self
            .generator
            .generate(&Self::notes_prompt(outfit, notes))
            .await;

        let outfit = match parse_verdict(&response) {
            Some(NotesVerdict::Match(reason)) => {
                reasons.push(format!("Style Notes Check: {}", reason));
                outfit.to_string()
            }
            Some(NotesVerdict::Adjust(new_outfit)) => {
                reasons.push(NOTES_ADJUSTED_REASON.to_string());
                new_outfit
            }
            None => {
                tracing::warn!(response = %response, "Unusable style notes response");
                reasons.push(NOTES_ERROR_REASON.to_string());
                outfit.to_string()
            }
        };

        AdjustedOutfit { outfit, reasons }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::text_generation::{MockTextGenerator, RETRIES_EXHAUSTED};

    const LONG_DRESS: &str = "A flowing long dress with white sandals.";

    fn with_height(height: u32) -> PreferenceRecord {
        PreferenceRecord {
            height: Some(height),
            ..Default::default()
        }
    }

    fn with_notes(notes: &str) -> PreferenceRecord {
        PreferenceRecord {
            additional_notes: Some(notes.to_string()),
            ..Default::default()
        }
    }

    fn unused_generator() -> Arc<dyn TextGenerator> {
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().times(0);
        Arc::new(generator)
    }

    fn replying(response: &'static str) -> Arc<dyn TextGenerator> {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(move |_| response.to_string());
        Arc::new(generator)
    }

    #[test]
    fn test_petite_height_caution() {
        let reasons = rule_based_reasons(LONG_DRESS, &with_height(150));
        assert!(reasons.contains(&PETITE_HEIGHT_REASON.to_string()));

        let reasons = rule_based_reasons(LONG_DRESS, &with_height(180));
        assert!(!reasons.contains(&PETITE_HEIGHT_REASON.to_string()));
    }

    #[test]
    fn test_skin_tone_and_bright_colors() {
        let preferences = PreferenceRecord {
            skin_tone: Some("Olive".to_string()),
            ..Default::default()
        };
        assert_eq!(
            rule_based_reasons("Coral blouse with beige trousers", &preferences),
            vec![SKIN_TONE_REASON.to_string()]
        );
        assert!(rule_based_reasons("Navy blouse with beige trousers", &preferences).is_empty());
    }

    #[test]
    fn test_weight_comfort_note() {
        let preferences = PreferenceRecord {
            weight: Some(95),
            ..Default::default()
        };
        assert_eq!(
            rule_based_reasons("Tight crop top and cargo pants", &preferences),
            vec![COMFORT_FIT_REASON.to_string()]
        );
    }

    #[test]
    fn test_favorite_colors_matched() {
        let preferences = PreferenceRecord {
            favorite_colors: vec!["Navy".to_string(), "green".to_string()],
            ..Default::default()
        };
        assert_eq!(
            rule_based_reasons("Navy blazer over a grey tee", &preferences),
            vec!["Matched your favorite color: Navy".to_string()]
        );
    }

    #[test]
    fn test_parse_verdict() {
        assert_eq!(
            parse_verdict("MATCH| Fits the no-heels note."),
            Some(NotesVerdict::Match("Fits the no-heels note.".to_string()))
        );
        assert_eq!(
            parse_verdict("  ADJUST|Linen shirt with chinos\n"),
            Some(NotesVerdict::Adjust("Linen shirt with chinos".to_string()))
        );
        assert_eq!(parse_verdict("MATCH|"), None);
        assert_eq!(parse_verdict("Sure! The outfit matches."), None);
        assert_eq!(parse_verdict("MAYBE|something"), None);
    }

    #[tokio::test]
    async fn test_closet_mode_never_changes_outfit() {
        let adjuster = PreferenceAdjuster::new(unused_generator());
        let result = adjuster
            .adjust(LONG_DRESS, &with_notes("I prefer bright colors"), RecommendationMode::Closet)
            .await;

        assert_eq!(result.outfit, LONG_DRESS);
        assert_eq!(
            result.reasons,
            vec!["Notes received but not used: 'I prefer bright colors'. Closet items are strictly enforced.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_general_mode_without_notes_skips_llm() {
        let adjuster = PreferenceAdjuster::new(unused_generator());
        let result = adjuster
            .adjust(LONG_DRESS, &with_height(150), RecommendationMode::General)
            .await;

        assert_eq!(result.outfit, LONG_DRESS);
        assert_eq!(result.reasons, vec![PETITE_HEIGHT_REASON.to_string()]);
    }

    #[tokio::test]
    async fn test_general_mode_match() {
        let adjuster = PreferenceAdjuster::new(replying("MATCH|Sandals keep it comfortable."));
        let result = adjuster
            .adjust(LONG_DRESS, &with_notes("no heels"), RecommendationMode::General)
            .await;

        assert_eq!(result.outfit, LONG_DRESS);
        assert_eq!(
            result.reasons,
            vec!["Style Notes Check: Sandals keep it comfortable.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_general_mode_adjust() {
        let adjuster = PreferenceAdjuster::new(replying("ADJUST|Wide-leg trousers with a silk blouse."));
        let result = adjuster
            .adjust(LONG_DRESS, &with_notes("no dresses"), RecommendationMode::General)
            .await;

        assert_eq!(result.outfit, "Wide-leg trousers with a silk blouse.");
        assert_eq!(result.reasons, vec![NOTES_ADJUSTED_REASON.to_string()]);
    }

    #[tokio::test]
    async fn test_general_mode_failure_is_a_reason() {
        let adjuster = PreferenceAdjuster::new(replying(RETRIES_EXHAUSTED));
        let result = adjuster
            .adjust(LONG_DRESS, &with_notes("no dresses"), RecommendationMode::General)
            .await;

        assert_eq!(result.outfit, LONG_DRESS);
        assert_eq!(result.reasons, vec![NOTES_ERROR_REASON.to_string()]);
    }
}
