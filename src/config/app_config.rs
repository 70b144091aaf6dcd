//! # 应用配置结构定义

use serde::{Deserialize, Serialize};

use super::DatabaseConfig;

/// 应用主配置结构
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 缓存配置
    #[serde(default)]
    pub cache: CacheConfig,
    /// 认证配置
    #[serde(default)]
    pub auth: AuthConfig,
    /// 邮件通知配置
    #[serde(default)]
    pub email: EmailConfig,
    /// 速率限制配置
    #[serde(default)]
    pub rate_limits: RateLimitConfig,
    /// 外部图片源配置
    #[serde(default)]
    pub images: ImageFeedConfig,
}

/// HTTP 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    pub bind_address: String,
    /// 监听端口
    pub port: u16,
    /// 是否启用CORS
    pub enable_cors: bool,
    /// 允许的CORS源地址
    pub cors_origins: Vec<String>,
    /// API前缀
    pub api_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
            api_prefix: "/api".to_string(),
        }
    }
}

/// 缓存类型
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheType {
    /// 内存缓存
    #[default]
    Memory,
    /// Redis缓存
    Redis,
}

/// 缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// 缓存类型
    pub cache_type: CacheType,
    /// 内存缓存最大条目数
    pub memory_max_entries: usize,
    /// 默认过期时间（秒）
    pub default_ttl: u64,
    /// Redis 缓存配置
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redis: Option<RedisConfig>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_type: CacheType::Memory,
            memory_max_entries: 10000,
            default_ttl: 300,
            redis: None,
        }
    }
}

/// Redis配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis连接URL
    pub url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379/0".to_string(),
        }
    }
}

/// 认证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT签名密钥
    pub jwt_secret: String,
    /// 访问令牌有效期（秒）
    pub jwt_expires_in: i64,
    /// 刷新令牌有效期（秒）
    pub refresh_expires_in: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expires_in: 3600,
            refresh_expires_in: 7 * 24 * 3600,
        }
    }
}

/// 邮件通知配置
///
/// 通过 HTTP 邮件服务接口投递；`enabled = false` 时使用内存收件箱。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub enabled: bool,
    /// 邮件服务HTTP接口地址
    pub endpoint: String,
    /// 接口令牌
    pub api_token: String,
    /// 发件人地址
    pub from_address: String,
    /// 站点地址（邮件正文中的链接）
    pub site_url: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            api_token: String::new(),
            from_address: "noreply@enterprise.com".to_string(),
            site_url: "http://localhost:8080".to_string(),
        }
    }
}

/// 速率限制配置
///
/// 各防护桶独立配额，窗口语义为固定窗口（计数器TTL）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// 登录：每分钟每来源IP
    pub login_per_minute: i64,
    /// 注册：每分钟每来源IP
    pub signup_per_minute: i64,
    /// 联系表单：每小时每来源IP
    pub contact_per_hour: i64,
    /// 订单创建：每小时每用户
    pub order_create_per_hour: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login_per_minute: 5,
            signup_per_minute: 3,
            contact_per_hour: 10,
            order_create_per_hour: 20,
        }
    }
}

/// 外部图片源配置（Pexels 风格接口）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageFeedConfig {
    pub enabled: bool,
    /// 搜索接口地址
    pub endpoint: String,
    /// 接口密钥
    pub api_key: String,
    /// 每次返回的图片数量
    pub per_page: u32,
    /// 查询结果缓存时间（秒）
    pub cache_ttl: u64,
}

impl Default for ImageFeedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://api.pexels.com/v1/search".to_string(),
            api_key: String::new(),
            per_page: 8,
            cache_ttl: 600,
        }
    }
}

impl AppConfig {
    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.is_empty() {
            return Err("Database URL cannot be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.auth.jwt_secret.is_empty() {
            return Err("JWT secret cannot be empty".to_string());
        }

        match self.cache.cache_type {
            CacheType::Memory => {
                if self.cache.redis.is_some() {
                    return Err("cache.redis 配置仅在 cache_type = \"redis\" 时可用".to_string());
                }
            }
            CacheType::Redis => {
                let redis = self
                    .cache
                    .redis
                    .as_ref()
                    .ok_or_else(|| "Redis cache configuration must be provided".to_string())?;
                if redis.url.is_empty() {
                    return Err("Redis URL cannot be empty".to_string());
                }
            }
        }

        if self.email.enabled && self.email.endpoint.is_empty() {
            return Err("email.endpoint must be set when email is enabled".to_string());
        }
        if self.images.enabled && self.images.api_key.is_empty() {
            return Err("images.api_key must be set when the image feed is enabled".to_string());
        }

        let limits = &self.rate_limits;
        if limits.login_per_minute <= 0
            || limits.signup_per_minute <= 0
            || limits.contact_per_hour <= 0
            || limits.order_create_per_hour <= 0
        {
            return Err("Rate limit quotas must be positive".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn redis_cache_requires_url() {
        let mut config = AppConfig::default();
        config.cache.cache_type = CacheType::Redis;
        assert!(config.validate().is_err());

        config.cache.redis = Some(RedisConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_quota_rejected() {
        let mut config = AppConfig::default();
        config.rate_limits.login_per_minute = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_from_toml() {
        let raw = r#"
            [server]
            bind_address = "127.0.0.1"
            port = 9000
            enable_cors = false
            cors_origins = []
            api_prefix = "/api"

            [database]
            url = "sqlite::memory:"
            max_connections = 5

            [rate_limits]
            login_per_minute = 5
            signup_per_minute = 3
            contact_per_hour = 10
            order_create_per_hour = 20
        "#;
        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.rate_limits.order_create_per_hour, 20);
        // 省略的字段落到默认值
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.connect_timeout, 30);
        assert!(config.validate().is_ok());
    }
}
