use redis::aio::ConnectionManager;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::QuestionId;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Two-tier cache for computed statistics
///
/// L1 is a per-process moka cache, L2 is Redis and shared between
/// instances. Both tiers expire entries after `ttl_secs`.
pub struct CacheManager {
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
    l1_cache: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl CacheManager {
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
            l1_cache,
            ttl_secs,
        })
    }

    /// Look a value up, L1 first. `Ok(None)` on a miss in both tiers.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        if let Some(bytes) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(Some(serde_json::from_slice(&bytes)?));
        }

        let mut conn = self.redis.lock().await;
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut *conn).await?;
        drop(conn);

        match value {
            Some(json) => {
                tracing::trace!("L2 cache hit: {}", key);
                let parsed = serde_json::from_str(&json)?;
                self.l1_cache.insert(key.to_string(), json.into_bytes()).await;
                Ok(Some(parsed))
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                Ok(None)
            }
        }
    }

    /// Store a value in both tiers
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let json = serde_json::to_string(value)?;
        self.l1_cache.insert(key.to_string(), json.as_bytes().to_vec()).await;

        let mut conn = self.redis.lock().await;
        redis::cmd("SETEX")
            .arg(key)
            .arg(self.ttl_secs)
            .arg(json)
            .query_async::<()>(&mut *conn)
            .await?;

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Current statistics generation of a question, 0 before the first bump
    ///
    /// Always read from Redis so every instance sees the same counter.
    pub async fn generation(&self, question_id: QuestionId) -> Result<u64, CacheError> {
        let mut conn = self.redis.lock().await;
        let value: Option<u64> = redis::cmd("GET")
            .arg(CacheKey::stats_generation(question_id))
            .query_async(&mut *conn)
            .await?;
        Ok(value.unwrap_or(0))
    }

    /// Move a question's statistics to a new generation
    ///
    /// Entries stored under older generations are never read again and
    /// expire with their TTL.
    pub async fn bump_generation(&self, question_id: QuestionId) -> Result<u64, CacheError> {
        let mut conn = self.redis.lock().await;
        let generation: u64 = redis::cmd("INCR")
            .arg(CacheKey::stats_generation(question_id))
            .query_async(&mut *conn)
            .await?;
        tracing::debug!("Question {} stats now at generation {}", question_id, generation);
        Ok(generation)
    }

    /// Drop every key matching a Redis glob pattern
    ///
    /// L1 has no pattern support and is cleared entirely.
    pub async fn invalidate_pattern(&self, pattern: &str) -> Result<(), CacheError> {
        self.l1_cache.invalidate_all();

        let mut conn = self.redis.lock().await;
        let keys: Vec<String> = redis::cmd("KEYS").arg(pattern).query_async(&mut *conn).await?;
        if !keys.is_empty() {
            redis::cmd("DEL").arg(keys).query_async::<()>(&mut *conn).await?;
        }

        tracing::debug!("Invalidated cache pattern: {}", pattern);
        Ok(())
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Statistics of one question at one generation
    pub fn question_stats(question_id: QuestionId, generation: u64) -> String {
        format!("stats:question:{}:{}", question_id, generation)
    }

    /// Generation counter of one question's statistics
    pub fn stats_generation(question_id: QuestionId) -> String {
        format!("stats:generation:{}", question_id)
    }

    /// Pattern covering all question statistics
    pub fn all_question_stats() -> &'static str {
        "stats:question:*"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn connect() -> CacheManager {
        CacheManager::new("redis://127.0.0.1:6379", 100, 60)
            .await
            .expect("Failed to create cache")
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_cache_set_get() {
        let cache = connect().await;

        let key = CacheKey::question_stats(-1, 0);
        cache.set(&key, &vec![1u32, 2, 3]).await.unwrap();
        let cached: Option<Vec<u32>> = cache.get(&key).await.unwrap();
        assert_eq!(cached, Some(vec![1, 2, 3]));
        assert!(cache.get::<Vec<u32>>("stats:question:-1:none").await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_stats_written_before_bump_are_not_served() {
        let cache = connect().await;
        let question_id = -(chrono::Utc::now().timestamp_micros());

        // A reader computes stats from data that predates an answer
        let seen = cache.generation(question_id).await.unwrap();
        assert_eq!(seen, 0);

        // The writer commits and bumps before the reader stores its result
        assert_eq!(cache.bump_generation(question_id).await.unwrap(), 1);
        cache
            .set(&CacheKey::question_stats(question_id, seen), &vec![0u32])
            .await
            .unwrap();

        let current = cache.generation(question_id).await.unwrap();
        assert_eq!(current, 1);
        let served: Option<Vec<u32>> = cache.get(&CacheKey::question_stats(question_id, current)).await.unwrap();
        assert!(served.is_none());
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(CacheKey::question_stats(42, 3), "stats:question:42:3");
        assert_ne!(CacheKey::question_stats(42, 3), CacheKey::question_stats(42, 4));
        assert_eq!(CacheKey::stats_generation(42), "stats:generation:42");
        assert!(CacheKey::question_stats(42, 0).starts_with(&CacheKey::all_question_stats().replace('*', "")));
    }
}
