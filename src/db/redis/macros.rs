/// Returns a cached value when present, otherwise awaits `$block`, stores its
/// result in the background and returns it.
///
/// Evaluates to an `AppResult<T>`. Cache reads never fail, so the only error
/// is one returned by `$block`.
///
/// # Arguments
/// * `$cache`: a [`Cache`](crate::db::Cache)
/// * `$key`: the [`CacheKey`](crate::db::CacheKey) to read and write
/// * `$ttl`: time-to-live in seconds
/// * `$block`: future of an `AppResult<T>`, awaited on a miss
///
/// # Example
/// ```rust,ignore
/// async fn lookup(&self, query: &str) -> AppResult<TrendReport> {
///     cached!(
///         cache,
///         CacheKey::Trends(query.to_string()),
///         3600,
///         self.fetch_report(query)
///     )
/// }
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get_from_cache(&key).await {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&key, &value, $ttl);
            Ok(value)
        }
    }};
}
