//! # 外部图片源
//!
//! 页面装饰用的随机图片，来自 Pexels 风格的搜索接口。结果按
//! 查询词缓存，接口故障时返回空列表，页面照常渲染。

use crate::cache::{CacheKey, UnifiedCacheManager};
use crate::config::ImageFeedConfig;
use crate::error::Result;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    src: PhotoSource,
}

#[derive(Debug, Deserialize)]
struct PhotoSource {
    original: String,
}

/// 带缓存的图片查询服务
pub struct CachedImageFeed {
    client: reqwest::Client,
    cache: Arc<UnifiedCacheManager>,
    config: ImageFeedConfig,
}

impl CachedImageFeed {
    #[must_use]
    pub fn new(cache: Arc<UnifiedCacheManager>, config: ImageFeedConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            client,
            cache,
            config,
        }
    }

    /// 按查询词取一组图片URL
    ///
    /// 缓存命中直接返回；未启用或上游失败时返回空列表，不向上抛错。
    pub async fn fetch(&self, query: &str) -> Vec<String> {
        if !self.config.enabled {
            return Vec::new();
        }

        let key = CacheKey::ImageFeed {
            query: query.to_string(),
            count: self.config.per_page,
        }
        .build();

        if let Ok(Some(cached)) = self.cache.get::<Vec<String>>(&key).await {
            return cached;
        }

        match self.fetch_remote(query).await {
            Ok(urls) => {
                let ttl = Duration::from_secs(self.config.cache_ttl);
                if let Err(e) = self.cache.set(&key, &urls, Some(ttl)).await {
                    warn!("图片查询结果写入缓存失败: {}", e);
                }
                urls
            }
            Err(e) => {
                warn!("图片接口请求失败 (query='{}'): {}", query, e);
                Vec::new()
            }
        }
    }

    async fn fetch_remote(&self, query: &str) -> Result<Vec<String>> {
        let per_page = self.config.per_page.to_string();
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[("query", query), ("per_page", &per_page), ("page", "1")])
            .header("Authorization", &self.config.api_key)
            .send()
            .await?
            .error_for_status()?;

        let body: SearchResponse = response.json().await?;
        Ok(body.photos.into_iter().map(|p| p.src.original).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_feed_returns_nothing() {
        let feed = CachedImageFeed::new(
            Arc::new(UnifiedCacheManager::memory_only(16)),
            ImageFeedConfig::default(),
        );
        assert!(feed.fetch("textile industry").await.is_empty());
    }

    #[test]
    fn search_response_parses_original_urls() {
        let raw = r#"{
            "photos": [
                {"src": {"original": "https://images.example/1.jpg", "large": "x"}},
                {"src": {"original": "https://images.example/2.jpg"}}
            ],
            "total_results": 2
        }"#;
        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        let urls: Vec<String> = parsed.photos.into_iter().map(|p| p.src.original).collect();
        assert_eq!(
            urls,
            vec![
                "https://images.example/1.jpg".to_string(),
                "https://images.example/2.jpg".to_string()
            ]
        );
    }
}
