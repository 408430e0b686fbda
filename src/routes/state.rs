use std::sync::Arc;

use crate::{
    config::Config,
    db::{
        create_pool, create_redis_client, Cache, CacheWriterHandle, ClosetStore,
        InMemoryClosetStore, InMemoryPreferenceStore, PgClosetStore, PgPreferenceStore,
        PreferenceStore,
    },
    services::{
        providers::{GeminiProvider, StoreSearchProvider, TrendAgent},
        PreferenceAdjuster, ProductLookup, RecommendationService, TextGenerationClient,
        TrendLookup,
    },
};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub recommendations: Arc<RecommendationService>,
    pub closets: Arc<dyn ClosetStore>,
    pub preferences: Arc<dyn PreferenceStore>,
}

impl AppState {
    pub fn new(
        recommendations: RecommendationService,
        closets: Arc<dyn ClosetStore>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            recommendations: Arc::new(recommendations),
            closets,
            preferences,
        }
    }

    /// Wires stores, cache and upstream clients from configuration
    ///
    /// The returned handle, when present, flushes pending trend cache writes on shutdown.
    pub async fn from_config(config: &Config) -> anyhow::Result<(Self, Option<CacheWriterHandle>)> {
        let (closets, preferences): (Arc<dyn ClosetStore>, Arc<dyn PreferenceStore>) =
            match &config.database_url {
                Some(url) => {
                    let pool = create_pool(url).await?;
                    tracing::info!("Using PostgreSQL stores");
                    (
                        Arc::new(PgClosetStore::new(pool.clone())),
                        Arc::new(PgPreferenceStore::new(pool)),
                    )
                }
                None => {
                    tracing::warn!("DATABASE_URL not set, closets and preferences are kept in memory");
                    (
                        Arc::new(InMemoryClosetStore::new()),
                        Arc::new(InMemoryPreferenceStore::new()),
                    )
                }
            };

        let (cache, cache_handle) = match &config.redis_url {
            Some(url) => {
                let (cache, handle) = Cache::new(create_redis_client(url)?).await;
                tracing::info!("Trend cache enabled");
                (Some(cache), Some(handle))
            }
            None => (None, None),
        };

        let outfit_model = Arc::new(GeminiProvider::new(
            config.gemini_api_key.clone(),
            config.gemini_api_url.clone(),
            config.gemini_model.clone(),
            config.llm_timeout(),
        )?);
        let trend_model = Arc::new(GeminiProvider::new(
            config.gemini_api_key.clone(),
            config.gemini_api_url.clone(),
            config.trend_model.clone(),
            config.llm_timeout(),
        )?);

        let generator = Arc::new(TextGenerationClient::new(outfit_model, config.retry_policy()));
        let recommendations = RecommendationService::new(
            generator.clone(),
            TrendLookup::new(Arc::new(TrendAgent::new(trend_model, cache))),
            PreferenceAdjuster::new(generator),
            ProductLookup::new(Arc::new(StoreSearchProvider::new())),
        );

        Ok((Self::new(recommendations, closets, preferences), cache_handle))
    }
}
