//! # 缓存键命名规范

use std::fmt;

/// 缓存键类型
#[derive(Debug, Clone)]
pub enum CacheKey {
    /// 速率限制计数器 - `ratelimit:{bucket}:{subject}`
    RateLimit { bucket: String, subject: String },

    /// 外部图片查询结果 - `images:{query}:{count}`
    ImageFeed { query: String, count: u32 },

    /// 已吊销的令牌 - `auth:revoked:{jti}`
    RevokedToken { jti: String },

    /// 自定义键 - `custom:{prefix}:{key}`
    Custom { prefix: String, key: String },
}

impl CacheKey {
    /// 生成缓存键字符串
    #[must_use]
    pub fn build(&self) -> String {
        match self {
            Self::RateLimit { bucket, subject } => format!("ratelimit:{bucket}:{subject}"),
            Self::ImageFeed { query, count } => format!("images:{query}:{count}"),
            Self::RevokedToken { jti } => format!("auth:revoked:{jti}"),
            Self::Custom { prefix, key } => format!("custom:{prefix}:{key}"),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.build())
    }
}
