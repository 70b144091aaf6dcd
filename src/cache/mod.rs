//! # 缓存模块
//!
//! 统一的缓存接口，支持内存缓存和Redis缓存

pub mod abstract_cache;
pub mod keys;

pub use abstract_cache::{
    CacheProvider, CacheProviderType, MemoryCache, RedisCache, UnifiedCacheManager,
};
pub use keys::CacheKey;
