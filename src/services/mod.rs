pub mod preferences;
pub mod products;
pub mod providers;
pub mod recommendations;
pub mod text_generation;
pub mod trends;

pub use preferences::PreferenceAdjuster;
pub use products::{ProductLookup, ProductSource};
pub use recommendations::RecommendationService;
pub use text_generation::{RetryPolicy, TextGenerationClient, TextGenerator};
pub use trends::{TrendLookup, TrendSource};
