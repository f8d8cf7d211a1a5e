/// Read-through caching for async computations.
///
/// Looks the key up first and returns the cached value on a hit. On a miss
/// (or when the cache itself fails) the block is awaited, a successful
/// result is handed to the background writer, and the result is returned.
/// Cache failures are logged and never surface to the caller.
///
/// # Arguments
/// * `$cache`: a value with `get_from_cache` and `set_in_background` methods.
/// * `$key`: the [`CacheKey`](crate::db::CacheKey) to read and write.
/// * `$ttl`: time-to-live for the stored value in seconds.
/// * `$block`: a future yielding `Result<T, E>`.
///
/// # Example
/// ```rust,ignore
/// let forecast = cached!(self.cache, CacheKey::Forecast(city.to_string()), 3600, async move {
///     self.request_forecast(city).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(cached)
            }
            other => {
                if let Err(e) = other {
                    tracing::warn!(key = %key, error = %e, "Cache read failed, falling through");
                }
                match $block.await {
                    Ok(value) => {
                        $cache.set_in_background(&key, &value, $ttl);
                        Ok(value)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }};
}
