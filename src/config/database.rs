//! # 数据库配置与连接

use crate::error::{AppError, Result};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error, info};

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库URL
    #[serde(default = "default_database_url")]
    pub url: String,
    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

fn default_database_url() -> String {
    "sqlite://./data/order_portal.db".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_connect_timeout() -> u64 {
    30
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl DatabaseConfig {
    /// 确保数据库路径存在（仅对SQLite文件数据库）
    pub fn ensure_database_path(&self) -> Result<()> {
        if self.is_sqlite() && !self.is_memory_database() {
            let path_str = self
                .url
                .strip_prefix("sqlite://")
                .unwrap_or(self.url.strip_prefix("sqlite:").unwrap_or(&self.url));
            let db_path = Path::new(path_str);

            if let Some(parent) = db_path.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent).map_err(|e| AppError::Config {
                        message: format!("无法创建数据库目录: {}", parent.display()),
                        source: Some(e.into()),
                    })?;
                    info!("数据库目录创建成功: {}", parent.display());
                }
            }

            if !db_path.exists() {
                debug!("数据库文件将在首次连接时创建: {}", db_path.display());
                std::fs::File::create(db_path).map_err(|e| AppError::Config {
                    message: format!("无法创建数据库文件: {}", db_path.display()),
                    source: Some(e.into()),
                })?;
            }
        }

        Ok(())
    }

    /// 检查是否为内存数据库
    pub fn is_memory_database(&self) -> bool {
        self.url.contains(":memory:")
    }

    /// 检查是否为SQLite数据库
    pub fn is_sqlite(&self) -> bool {
        self.url.starts_with("sqlite:")
    }
}

/// 初始化数据库连接并运行迁移
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    config.ensure_database_path()?;

    info!(
        "正在连接数据库: {}",
        if config.is_sqlite() {
            &config.url[..std::cmp::min(config.url.len(), 50)]
        } else {
            &config.url
        }
    );

    let db = Database::connect(&config.url).await?;
    info!("数据库连接成功");

    match ::migration::Migrator::up(&db, None).await {
        Ok(()) => info!("数据库迁移完成"),
        Err(e) => {
            error!("数据库迁移失败: {}", e);
            return Err(e.into());
        }
    }

    Ok(db)
}
