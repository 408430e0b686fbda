use serde::{Deserialize, Serialize};

/// Stored style attributes for one user
///
/// Unknown fields are rejected when deserializing. `skin_color` is accepted as
/// an alias of `skin_tone` for clients written against the older field name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct PreferenceRecord {
    /// Favorite colors, free text
    #[serde(default)]
    pub favorite_colors: Vec<String>,
    /// Skin tone descriptor, free text
    #[serde(default, alias = "skin_color")]
    pub skin_tone: Option<String>,
    /// Height in centimetres
    #[serde(default)]
    pub height: Option<u32>,
    /// Weight in kilograms
    #[serde(default)]
    pub weight: Option<u32>,
    /// Free-text notes the user wants the stylist to consider
    #[serde(default)]
    pub additional_notes: Option<String>,
}

/// Partial write of a [`PreferenceRecord`]; absent fields keep their stored value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct PreferenceUpdate {
    #[serde(default)]
    pub favorite_colors: Option<Vec<String>>,
    #[serde(default, alias = "skin_color")]
    pub skin_tone: Option<String>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub additional_notes: Option<String>,
}

impl PreferenceRecord {
    /// Applies an update, overwriting only the fields it carries
    pub fn merge(&mut self, update: PreferenceUpdate) {
        if let Some(colors) = update.favorite_colors {
            self.favorite_colors = colors;
        }
        if update.skin_tone.is_some() {
            self.skin_tone = update.skin_tone;
        }
        if update.height.is_some() {
            self.height = update.height;
        }
        if update.weight.is_some() {
            self.weight = update.weight;
        }
        if update.additional_notes.is_some() {
            self.additional_notes = update.additional_notes;
        }
    }

    /// Notes with surrounding whitespace removed, or `None` when blank
    pub fn notes(&self) -> Option<&str> {
        self.additional_notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
    }
}
