//! # 配置模块
//!
//! TOML 配置文件加载与校验

mod app_config;
mod database;

pub use app_config::{
    AppConfig, AuthConfig, CacheConfig, CacheType, EmailConfig, ImageFeedConfig, RateLimitConfig,
    RedisConfig, ServerConfig,
};
pub use database::{DatabaseConfig, init_database};

use crate::error::{AppError, Result};
use std::path::Path;

/// 从 TOML 文件加载配置并校验
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| AppError::Config {
        message: format!("无法读取配置文件 {}", path.display()),
        source: Some(e.into()),
    })?;

    let config: AppConfig = toml::from_str(&raw).map_err(|e| AppError::Config {
        message: format!("配置文件解析失败 {}", path.display()),
        source: Some(e.into()),
    })?;

    config.validate().map_err(AppError::config)?;
    Ok(config)
}
