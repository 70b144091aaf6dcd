//! # 访问速率防护
//!
//! 使用缓存的 `incr` + `expire` 实现固定窗口计数，内存与 Redis
//! 后端行为一致，多实例部署时计数共享。

use crate::cache::{CacheKey, UnifiedCacheManager};
use crate::config::RateLimitConfig;
use crate::error::{AppError, Result};
use std::sync::Arc;
use std::time::Duration;

/// 防护桶：每个敏感操作一个独立的配额维度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateBucket {
    /// 登录尝试，按来源IP
    Login,
    /// 注册，按来源IP
    Signup,
    /// 联系表单提交，按来源IP
    Contact,
    /// 订单创建，按用户
    OrderCreate,
}

impl RateBucket {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Contact => "contact",
            Self::OrderCreate => "order_create",
        }
    }

    /// 计数窗口长度
    #[must_use]
    pub const fn window(self) -> Duration {
        match self {
            Self::Login | Self::Signup => Duration::from_secs(60),
            Self::Contact | Self::OrderCreate => Duration::from_secs(3600),
        }
    }

    const fn quota(self, config: &RateLimitConfig) -> i64 {
        match self {
            Self::Login => config.login_per_minute,
            Self::Signup => config.signup_per_minute,
            Self::Contact => config.contact_per_hour,
            Self::OrderCreate => config.order_create_per_hour,
        }
    }
}

/// 一次防护检查的结果
#[derive(Debug, Clone)]
pub struct RateLimitOutcome {
    pub allowed: bool,
    pub current: i64,
    pub limit: i64,
    pub retry_after_seconds: i64,
}

/// 速率防护器
pub struct RateGuard {
    cache: Arc<UnifiedCacheManager>,
    config: RateLimitConfig,
}

impl RateGuard {
    pub const fn new(cache: Arc<UnifiedCacheManager>, config: RateLimitConfig) -> Self {
        Self { cache, config }
    }

    /// 计入一次调用并判定是否放行
    ///
    /// 计数器首次创建时设置窗口TTL，窗口到期自动清零。
    pub async fn allow(&self, bucket: RateBucket, subject: &str) -> Result<RateLimitOutcome> {
        let key = CacheKey::RateLimit {
            bucket: bucket.name().to_string(),
            subject: subject.to_string(),
        }
        .build();

        let current = self.cache.incr(&key, 1).await?;
        if current == 1 {
            self.cache.expire(&key, bucket.window()).await?;
        }

        let limit = bucket.quota(&self.config);
        let retry_after_seconds = self
            .cache
            .ttl(&key)
            .await?
            .unwrap_or_else(|| bucket.window().as_secs() as i64);

        Ok(RateLimitOutcome {
            allowed: current <= limit,
            current,
            limit,
            retry_after_seconds,
        })
    }

    /// 同 `allow`，但超限时直接返回 `RateLimited` 错误
    pub async fn enforce(&self, bucket: RateBucket, subject: &str) -> Result<()> {
        let outcome = self.allow(bucket, subject).await?;
        if outcome.allowed {
            Ok(())
        } else {
            Err(AppError::rate_limited(
                format!(
                    "操作过于频繁（{}），请稍后再试",
                    bucket.name()
                ),
                outcome.retry_after_seconds,
            ))
        }
    }
}
