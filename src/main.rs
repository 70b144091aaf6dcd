//! # 服务入口

use order_portal::config::{AppConfig, load_config};
use order_portal::error::Result;
use order_portal::logging::init_logging;
use order_portal::management::ManagementServer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(None);

    let config_path =
        std::env::var("APP_CONFIG").unwrap_or_else(|_| "config/app.toml".to_string());

    let config = if std::path::Path::new(&config_path).exists() {
        info!("加载配置文件: {config_path}");
        load_config(&config_path)?
    } else {
        warn!("配置文件 {config_path} 不存在，使用默认配置");
        AppConfig::default()
    };

    let server = ManagementServer::new(config).await?;
    server.serve().await
}
