//! # HTTP 服务器
//!
//! 装配应用状态并启动 axum 服务。

use crate::auth::{AuthService, JwtManager, RateGuard};
use crate::cache::UnifiedCacheManager;
use crate::config::{AppConfig, init_database};
use crate::error::{AppError, Result};
use crate::images::CachedImageFeed;
use crate::management::response::success;
use crate::management::routes::create_routes;
use crate::management::services::{AuditQuery, ContactService, ServicePageService};
use crate::notifier::Notifier;
use crate::orders::OrderLifecycle;
use axum::extract::State;
use axum::response::Response;
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// 应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthService>,
    pub lifecycle: Arc<OrderLifecycle>,
    pub rate_guard: Arc<RateGuard>,
    pub contacts: Arc<ContactService>,
    pub service_page: Arc<ServicePageService>,
    pub audit: Arc<AuditQuery>,
    pub images: Arc<CachedImageFeed>,
}

impl AppState {
    /// 根据配置和已就绪的数据库连接装配全部服务
    pub fn build(config: &AppConfig, db: DatabaseConnection) -> Result<Self> {
        let cache = Arc::new(UnifiedCacheManager::new(&config.cache)?);
        let notifier = Arc::new(Notifier::from_config(&config.email));
        let jwt = JwtManager::new(&config.auth);

        let auth = Arc::new(AuthService::new(
            db.clone(),
            jwt,
            cache.clone(),
            notifier.clone(),
        ));
        let lifecycle = Arc::new(OrderLifecycle::new(db.clone(), notifier.clone()));
        let rate_guard = Arc::new(RateGuard::new(cache.clone(), config.rate_limits.clone()));
        let contacts = Arc::new(ContactService::new(db.clone(), notifier));
        let service_page = Arc::new(ServicePageService::new(db.clone()));
        let audit = Arc::new(AuditQuery::new(db.clone()));
        let images = Arc::new(CachedImageFeed::new(cache, config.images.clone()));

        Ok(Self {
            db,
            auth,
            lifecycle,
            rate_guard,
            contacts,
            service_page,
            audit,
            images,
        })
    }
}

/// 管理服务器
pub struct ManagementServer {
    config: AppConfig,
    state: AppState,
}

impl ManagementServer {
    /// 连接数据库、跑迁移并装配服务
    pub async fn new(config: AppConfig) -> Result<Self> {
        let db = init_database(&config.database).await?;
        let state = AppState::build(&config, db)?;
        Ok(Self { config, state })
    }

    /// 启动并一直服务到进程退出
    pub async fn serve(self) -> Result<()> {
        let addr = format!(
            "{}:{}",
            self.config.server.bind_address, self.config.server.port
        );
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::Io {
                message: format!("无法监听地址 {addr}"),
                source: e,
            })?;

        info!("HTTP 服务启动: http://{addr}{}", self.config.server.api_prefix);

        let router = create_routes(self.state, &self.config.server);
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .map_err(|e| AppError::Io {
            message: "HTTP 服务异常退出".to_string(),
            source: e,
        })
    }
}

/// 健康检查
pub async fn health_check(State(state): State<AppState>) -> Response {
    let database = match state.db.ping().await {
        Ok(()) => "healthy",
        Err(_) => "unreachable",
    };

    success(json!({
        "status": if database == "healthy" { "ok" } else { "degraded" },
        "database": database,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
