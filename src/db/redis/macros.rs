/// Returns a cached value or computes, caches and returns it.
///
/// # Arguments
/// * `$cache`: a [`Cache`](crate::db::Cache).
/// * `$key`: the [`CacheKey`](crate::db::CacheKey) to read and write.
/// * `$ttl`: time-to-live of a freshly computed value, in seconds.
/// * `$block`: future yielding `AppResult<T>`, awaited only on a miss.
///
/// # Example
/// ```rust,ignore
/// let products = cached!(cache, key, cache.ttl(), async move {
///     compute_recommendations()
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await {
            Ok(cached)
        } else {
            match $block.await {
                Ok(value) => {
                    $cache.set_in_background(&$key, &value, $ttl);
                    Ok(value)
                }
                Err(e) => Err(e),
            }
        }
    }};
}
