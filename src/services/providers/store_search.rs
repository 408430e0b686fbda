//! Store search link builder
//!
//! Splits an outfit description into garments by product keyword and builds
//! one search-results link per garment on each supported store.

use reqwest::Url;

use crate::{
    error::{AppError, AppResult},
    models::ProductSearchResult,
    services::products::ProductSource,
};

/// Garment nouns recognised in outfit descriptions, singular unless the
/// garment only exists in plural form
pub const PRODUCT_KEYWORDS: &[&str] = &[
    "t-shirt", "shirt", "blouse", "top", "tee", "dress", "jeans", "trousers", "pants",
    "shorts", "chinos", "leggings", "jacket", "coat", "blazer", "vest", "skirt", "sweater",
    "hoodie", "cardigan", "jumpsuit", "sneaker", "boot", "shoe", "sandal", "heel", "loafer",
    "flats", "scarf", "scarves", "belt", "bag", "hat",
];

/// Words that end a garment's descriptive prefix
const STOP_WORDS: [&str; 24] = [
    "a", "an", "the", "and", "or", "with", "of", "in", "on", "for", "to", "this", "that",
    "your", "my", "is", "are", "paired", "pair", "over", "under", "plus", "wear", "try",
];

const MAX_DESCRIPTORS: usize = 2;

/// (store name, search page, query parameter)
const STORES: [(&str, &str, &str); 5] = [
    ("amazon", "https://www.amazon.com/s", "k"),
    ("zara", "https://www.zara.com/ww/en/search", "searchTerm"),
    ("hm", "https://www2.hm.com/en_us/search-results.html", "q"),
    ("ebay", "https://www.ebay.com/sch/i.html", "_nkw"),
    ("temu", "https://www.temu.com/search_result.html", "search_key"),
];

#[derive(Debug, Clone, Default)]
pub struct StoreSearchProvider;

impl StoreSearchProvider {
    pub fn new() -> Self {
        Self
    }

    fn search_links(garment: &str) -> AppResult<Vec<String>> {
        STORES
            .iter()
            .map(|(store, base, param)| {
                Url::parse_with_params(base, &[(*param, garment)])
                    .map(|url| url.to_string())
                    .map_err(|e| AppError::Internal(format!("Invalid {} search URL: {}", store, e)))
            })
            .collect()
    }
}

/// Matches the word itself and its `-s` / `-es` singular forms
fn is_garment(word: &str) -> bool {
    let candidates = [
        Some(word),
        word.strip_suffix('s'),
        word.strip_suffix("es"),
    ];

    candidates
        .into_iter()
        .flatten()
        .any(|candidate| PRODUCT_KEYWORDS.contains(&candidate))
}

/// Garment phrases in order of first mention, e.g. "white shirt", "blue jeans"
pub fn extract_garments(outfit_description: &str) -> Vec<String> {
    let mut garments: Vec<String> = Vec::new();
    let lowered = outfit_description.to_lowercase();

    for segment in lowered.split(|c: char| ".,;:!?()\n".contains(c)) {
        let words: Vec<&str> = segment
            .split(|c: char| !(c.is_alphanumeric() || c == '-'))
            .filter(|word| !word.is_empty())
            .collect();

        for (index, word) in words.iter().enumerate() {
            if !is_garment(word) {
                continue;
            }

            let descriptors: Vec<&str> = words[..index]
                .iter()
                .rev()
                .take_while(|w| !STOP_WORDS.contains(*w) && !is_garment(w))
                .take(MAX_DESCRIPTORS)
                .copied()
                .collect();

            let phrase = descriptors
                .into_iter()
                .rev()
                .chain(std::iter::once(*word))
                .collect::<Vec<_>>()
                .join(" ");

            if !garments.contains(&phrase) {
                garments.push(phrase);
            }
        }
    }

    garments
}

#[async_trait::async_trait]
impl ProductSource for StoreSearchProvider {
    async fn search(&self, outfit_description: &str) -> AppResult<ProductSearchResult> {
        let garments = extract_garments(outfit_description);

        let mut shopping_links = Vec::new();
        for garment in &garments {
            shopping_links.extend(Self::search_links(garment)?);
        }

        tracing::info!(
            garments = garments.len(),
            links = shopping_links.len(),
            provider = "store_search",
            "Product search completed"
        );

        Ok(ProductSearchResult {
            full_outfit_description: outfit_description.to_string(),
            shopping_links,
        })
    }
}
