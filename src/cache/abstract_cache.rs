//! # 缓存抽象层
//!
//! 提供统一的缓存接口，支持内存缓存和Redis缓存

use crate::config::{CacheConfig, CacheType};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// 缓存项
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        Self {
            value,
            expires_at: ttl.map(|t| Instant::now() + t),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() > at)
    }
}

/// 缓存抽象trait
#[async_trait]
pub trait CacheProvider: Send + Sync {
    /// 设置缓存值
    async fn set<T>(&self, key: &str, value: T, ttl: Option<Duration>) -> Result<()>
    where
        T: Serialize + Send;

    /// 获取缓存值
    async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send;

    /// 删除缓存值
    async fn delete(&self, key: &str) -> Result<()>;

    /// 检查键是否存在
    async fn exists(&self, key: &str) -> Result<bool>;

    /// 设置过期时间
    async fn expire(&self, key: &str, ttl: Duration) -> Result<()>;

    /// 增加数字值
    async fn incr(&self, key: &str, delta: i64) -> Result<i64>;

    /// 查询剩余过期时间（秒），键不存在或无TTL时返回None
    async fn ttl(&self, key: &str) -> Result<Option<i64>>;

    /// 清空所有缓存
    async fn clear(&self) -> Result<()>;
}

/// 内存缓存实现
pub struct MemoryCache {
    data: Arc<RwLock<HashMap<String, CacheEntry>>>,
    max_entries: usize,
}

impl MemoryCache {
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
            max_entries,
        }
    }

    fn cleanup_expired(&self) {
        let mut data = self.data.write().unwrap();
        data.retain(|_, entry| !entry.is_expired());
    }

    fn ensure_capacity(&self) {
        let mut data = self.data.write().unwrap();
        if data.len() >= self.max_entries {
            // 优先移除过期项，否则移除任意一项
            let victim = data
                .iter()
                .find(|(_, entry)| entry.is_expired())
                .map(|(key, _)| key.clone())
                .or_else(|| data.keys().next().cloned());
            if let Some(key) = victim {
                data.remove(&key);
            }
        }
    }
}

#[async_trait]
impl CacheProvider for MemoryCache {
    async fn set<T>(&self, key: &str, value: T, ttl: Option<Duration>) -> Result<()>
    where
        T: Serialize + Send,
    {
        let serialized = serde_json::to_vec(&value)
            .map_err(|e| AppError::cache_with_source("序列化缓存值失败", e))?;

        self.ensure_capacity();

        let mut data = self.data.write().unwrap();
        data.insert(key.to_string(), CacheEntry::new(serialized, ttl));
        Ok(())
    }

    async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.cleanup_expired();

        let data = self.data.read().unwrap();
        match data.get(key) {
            Some(entry) if !entry.is_expired() => {
                let value = serde_json::from_slice(&entry.value)
                    .map_err(|e| AppError::cache_with_source("反序列化缓存值失败", e))?;
                Ok(Some(value))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut data = self.data.write().unwrap();
        data.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.cleanup_expired();
        let data = self.data.read().unwrap();
        Ok(data.get(key).is_some_and(|entry| !entry.is_expired()))
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<()> {
        let mut data = self.data.write().unwrap();
        if let Some(entry) = data.get_mut(key) {
            entry.expires_at = Some(Instant::now() + ttl);
        }
        Ok(())
    }

    async fn incr(&self, key: &str, delta: i64) -> Result<i64> {
        let mut data = self.data.write().unwrap();

        let (current_value, expires_at) = match data.get(key) {
            Some(entry) if !entry.is_expired() => (
                serde_json::from_slice::<i64>(&entry.value).unwrap_or(0),
                entry.expires_at,
            ),
            _ => (0, None),
        };

        let new_value = current_value + delta;
        let serialized = serde_json::to_vec(&new_value)
            .map_err(|e| AppError::cache_with_source("序列化数字值失败", e))?;

        // 保留已有的过期时间，避免计数窗口被重置
        data.insert(
            key.to_string(),
            CacheEntry {
                value: serialized,
                expires_at,
            },
        );

        Ok(new_value)
    }

    async fn ttl(&self, key: &str) -> Result<Option<i64>> {
        let data = self.data.read().unwrap();
        Ok(data.get(key).and_then(|entry| {
            entry.expires_at.map(|at| {
                let now = Instant::now();
                if at > now {
                    at.duration_since(now).as_secs() as i64
                } else {
                    0
                }
            })
        }))
    }

    async fn clear(&self) -> Result<()> {
        let mut data = self.data.write().unwrap();
        data.clear();
        Ok(())
    }
}

/// Redis缓存实现
pub struct RedisCache {
    client: redis::Client,
}

impl RedisCache {
    pub fn new(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| AppError::cache_with_source("创建Redis客户端失败", e))?;
        Ok(Self { client })
    }

    fn connection(&self) -> Result<redis::Connection> {
        self.client
            .get_connection()
            .map_err(|e| AppError::cache_with_source("获取Redis连接失败", e))
    }
}

#[async_trait]
impl CacheProvider for RedisCache {
    async fn set<T>(&self, key: &str, value: T, ttl: Option<Duration>) -> Result<()>
    where
        T: Serialize + Send,
    {
        let serialized = serde_json::to_string(&value)
            .map_err(|e| AppError::cache_with_source("序列化缓存值失败", e))?;
        let mut conn = self.connection()?;

        if let Some(ttl) = ttl {
            redis::cmd("SETEX")
                .arg(key)
                .arg(ttl.as_secs())
                .arg(&serialized)
                .execute(&mut conn);
        } else {
            redis::cmd("SET").arg(key).arg(&serialized).execute(&mut conn);
        }
        Ok(())
    }

    async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        let mut conn = self.connection()?;
        let result: Option<String> = redis::cmd("GET")
            .arg(key)
            .query(&mut conn)
            .map_err(|e| AppError::cache_with_source("Redis GET失败", e))?;

        match result {
            Some(data) => {
                let value = serde_json::from_str(&data)
                    .map_err(|e| AppError::cache_with_source("反序列化缓存值失败", e))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection()?;
        redis::cmd("DEL").arg(key).execute(&mut conn);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection()?;
        let exists: bool = redis::cmd("EXISTS")
            .arg(key)
            .query(&mut conn)
            .map_err(|e| AppError::cache_with_source("Redis EXISTS失败", e))?;
        Ok(exists)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.connection()?;
        redis::cmd("EXPIRE")
            .arg(key)
            .arg(ttl.as_secs())
            .execute(&mut conn);
        Ok(())
    }

    async fn incr(&self, key: &str, delta: i64) -> Result<i64> {
        let mut conn = self.connection()?;
        let result: i64 = redis::cmd("INCRBY")
            .arg(key)
            .arg(delta)
            .query(&mut conn)
            .map_err(|e| AppError::cache_with_source("Redis INCRBY失败", e))?;
        Ok(result)
    }

    async fn ttl(&self, key: &str) -> Result<Option<i64>> {
        let mut conn = self.connection()?;
        let ttl: i64 = redis::cmd("TTL")
            .arg(key)
            .query(&mut conn)
            .map_err(|e| AppError::cache_with_source("Redis TTL失败", e))?;
        // -2 表示键不存在，-1 表示无过期时间
        Ok(if ttl >= 0 { Some(ttl) } else { None })
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.connection()?;
        redis::cmd("FLUSHDB").execute(&mut conn);
        Ok(())
    }
}

/// 缓存提供者枚举 - 避免 trait object 兼容性问题
pub enum CacheProviderType {
    Memory(MemoryCache),
    Redis(RedisCache),
}

impl CacheProviderType {
    pub async fn set<T>(&self, key: &str, value: T, ttl: Option<Duration>) -> Result<()>
    where
        T: Serialize + Send,
    {
        match self {
            Self::Memory(cache) => cache.set(key, value, ttl).await,
            Self::Redis(cache) => cache.set(key, value, ttl).await,
        }
    }

    pub async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self {
            Self::Memory(cache) => cache.get(key).await,
            Self::Redis(cache) => cache.get(key).await,
        }
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        match self {
            Self::Memory(cache) => cache.delete(key).await,
            Self::Redis(cache) => cache.delete(key).await,
        }
    }

    pub async fn exists(&self, key: &str) -> Result<bool> {
        match self {
            Self::Memory(cache) => cache.exists(key).await,
            Self::Redis(cache) => cache.exists(key).await,
        }
    }

    pub async fn expire(&self, key: &str, ttl: Duration) -> Result<()> {
        match self {
            Self::Memory(cache) => cache.expire(key, ttl).await,
            Self::Redis(cache) => cache.expire(key, ttl).await,
        }
    }

    pub async fn incr(&self, key: &str, delta: i64) -> Result<i64> {
        match self {
            Self::Memory(cache) => cache.incr(key, delta).await,
            Self::Redis(cache) => cache.incr(key, delta).await,
        }
    }

    pub async fn ttl(&self, key: &str) -> Result<Option<i64>> {
        match self {
            Self::Memory(cache) => cache.ttl(key).await,
            Self::Redis(cache) => cache.ttl(key).await,
        }
    }

    pub async fn clear(&self) -> Result<()> {
        match self {
            Self::Memory(cache) => cache.clear().await,
            Self::Redis(cache) => cache.clear().await,
        }
    }
}

/// 统一缓存管理器
pub struct UnifiedCacheManager {
    provider: CacheProviderType,
}

impl UnifiedCacheManager {
    /// 根据配置创建缓存管理器
    pub fn new(config: &CacheConfig) -> Result<Self> {
        let provider = match config.cache_type {
            CacheType::Memory => {
                tracing::info!("使用内存缓存，最大条目数: {}", config.memory_max_entries);
                CacheProviderType::Memory(MemoryCache::new(config.memory_max_entries))
            }
            CacheType::Redis => {
                let redis = config
                    .redis
                    .as_ref()
                    .ok_or_else(|| AppError::config("缺少Redis缓存配置"))?;
                tracing::info!("使用Redis缓存，URL: {}", redis.url);
                CacheProviderType::Redis(RedisCache::new(&redis.url)?)
            }
        };

        Ok(Self { provider })
    }

    /// 纯内存缓存管理器，测试和默认部署使用
    #[must_use]
    pub fn memory_only(max_entries: usize) -> Self {
        Self {
            provider: CacheProviderType::Memory(MemoryCache::new(max_entries)),
        }
    }

    pub fn provider(&self) -> &CacheProviderType {
        &self.provider
    }

    pub async fn set<T>(&self, key: &str, value: T, ttl: Option<Duration>) -> Result<()>
    where
        T: Serialize + Send,
    {
        self.provider.set(key, value, ttl).await
    }

    pub async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.provider.get(key).await
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        self.provider.delete(key).await
    }

    pub async fn exists(&self, key: &str) -> Result<bool> {
        self.provider.exists(key).await
    }

    pub async fn expire(&self, key: &str, ttl: Duration) -> Result<()> {
        self.provider.expire(key, ttl).await
    }

    pub async fn incr(&self, key: &str, delta: i64) -> Result<i64> {
        self.provider.incr(key, delta).await
    }

    pub async fn ttl(&self, key: &str) -> Result<Option<i64>> {
        self.provider.ttl(key).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.provider.clear().await
    }
}
