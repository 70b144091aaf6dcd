//! # 路由配置
//!
//! 公开路由（注册、登录、联系表单、服务页、图片）与需要认证的
//! 路由（订单、个人中心、审计、管理操作）分组挂载。

use crate::config::ServerConfig;
use crate::management::server::AppState;
use crate::management::{handlers, middleware, server};
use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{delete, get, post, put};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// 创建所有路由
pub fn create_routes(state: AppState, server_config: &ServerConfig) -> Router {
    let public = Router::new()
        .route("/health", get(server::health_check))
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .route(
            "/contacts",
            post(handlers::contacts::submit).layer(axum::middleware::from_fn_with_state(
                state.clone(),
                middleware::auth_optional,
            )),
        )
        .route("/services-page", get(handlers::services_page::get_page))
        .route("/images", get(handlers::images::fetch));

    let protected = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/profile", get(handlers::auth::get_profile))
        .route("/auth/profile", put(handlers::auth::update_profile))
        .route("/auth/password", put(handlers::auth::change_password))
        .route("/orders", post(handlers::orders::create))
        .route("/orders", get(handlers::orders::list))
        .route("/orders/search", get(handlers::orders::search))
        .route("/orders/{id}", get(handlers::orders::get_one))
        .route("/orders/{id}", delete(handlers::orders::soft_delete))
        .route("/orders/{id}/status", put(handlers::orders::update_status))
        .route("/orders/{id}/restore", post(handlers::orders::restore))
        .route("/contacts", get(handlers::contacts::list))
        .route("/contacts/{id}", delete(handlers::contacts::soft_delete))
        .route("/contacts/{id}/restore", post(handlers::contacts::restore))
        .route("/audit-logs", get(handlers::audit_logs::list))
        .route("/services-page", put(handlers::services_page::update_page))
        .route(
            "/services-page/logos",
            post(handlers::services_page::add_logo),
        )
        .route(
            "/services-page/logos/{id}",
            delete(handlers::services_page::deactivate_logo),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth,
        ));

    let api = public.merge(protected);

    let mut router = Router::new().nest(&server_config.api_prefix, api);
    if server_config.enable_cors {
        router = router.layer(cors_layer(server_config));
    }

    router.with_state(state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
