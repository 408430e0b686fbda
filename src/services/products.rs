use std::collections::HashSet;
use std::sync::Arc;

use reqwest::Url;

use crate::{error::AppResult, models::ProductSearchResult};

/// Retail domains whose links may reach the user (subdomains included)
pub const ALLOWED_RETAIL_DOMAINS: [&str; 7] = [
    "amazon.com",
    "ebay.com",
    "temu.com",
    "zara.com",
    "hm.com",
    "nolimit.lk",
    "mimosaforever.com",
];

/// External service that finds shopping links for an outfit description
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ProductSource: Send + Sync {
    async fn search(&self, outfit_description: &str) -> AppResult<ProductSearchResult>;
}

/// True when `link` is an http(s) URL on an allow-listed retail domain
pub fn is_allowed_link(link: &str) -> bool {
    let Ok(url) = Url::parse(link.trim()) else {
        return false;
    };

    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }

    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_lowercase();

    ALLOWED_RETAIL_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
}

/// Keeps allow-listed links, first occurrence wins
pub fn filter_links(links: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .map(|link| link.trim().to_string())
        .filter(|link| is_allowed_link(link))
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

/// Product lookup with domain validation
#[derive(Clone)]
pub struct ProductLookup {
    source: Arc<dyn ProductSource>,
}

impl ProductLookup {
    pub fn new(source: Arc<dyn ProductSource>) -> Self {
        Self { source }
    }

    /// Validated search result, errors propagated
    pub async fn search_result(&self, outfit_description: &str) -> AppResult<ProductSearchResult> {
        let mut result = self.source.search(outfit_description).await?;
        result.shopping_links = filter_links(result.shopping_links);
        Ok(result)
    }

    /// Shopping links for an outfit; any failure yields an empty list
    pub async fn search(&self, outfit_description: &str) -> Vec<String> {
        match self.search_result(outfit_description).await {
            Ok(result) => result.shopping_links,
            Err(e) => {
                tracing::warn!(error = %e, "Product lookup failed, continuing without links");
                Vec::new()
            }
        }
    }
}
