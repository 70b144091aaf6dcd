//! # 订单处理器
//!
//! 所有订单路由都在认证中间件之后。状态变更、恢复是管理员操作；
//! 查询和删除限定在请求者自己的订单（管理员不受限）。

use super::{PageQuery, parse_page, require_admin};
use crate::audit::RequestOrigin;
use crate::auth::{AuthContext, RateBucket};
use crate::error::{AppError, Result};
use crate::management::response::{Pagination, paginated, success, success_with_message};
use crate::management::server::AppState;
use crate::orders::{OrderDraft, OrderStatus};
use axum::Json;
use axum::extract::{ConnectInfo, Extension, Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub client_name: String,
    pub quantity: i32,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub attachment: Option<String>,
}

/// 创建订单
pub async fn create(
    State(state): State<AppState>,
    Extension(context): Extension<Arc<AuthContext>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Response> {
    state
        .rate_guard
        .enforce(RateBucket::OrderCreate, &context.user.id.to_string())
        .await?;

    let priority = match request.priority.as_deref() {
        Some(raw) => raw.parse()?,
        None => Default::default(),
    };

    let draft = OrderDraft {
        title: request.title,
        description: request.description,
        client_name: request.client_name,
        quantity: request.quantity,
        priority,
        attachment: request.attachment,
    };

    let order = state
        .lifecycle
        .create(
            draft,
            &context.user,
            RequestOrigin::from_request(&headers, Some(peer)),
        )
        .await?;

    Ok(success_with_message(order, "订单已创建"))
}

/// 当前用户的订单列表
pub async fn list(
    State(state): State<AppState>,
    Extension(context): Extension<Arc<AuthContext>>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let page = parse_page(query.page.as_deref());
    let result = state.lifecycle.list(context.user.id, page).await?;
    let pagination = Pagination::from(&result);
    Ok(paginated(result.items, pagination))
}

/// 搜索当前用户的订单
pub async fn search(
    State(state): State<AppState>,
    Extension(context): Extension<Arc<AuthContext>>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let page = parse_page(query.page.as_deref());
    let needle = query.q.unwrap_or_default();
    let result = state
        .lifecycle
        .search(context.user.id, &needle, page)
        .await?;
    let pagination = Pagination::from(&result);
    Ok(paginated(result.items, pagination))
}

/// 单个订单
pub async fn get_one(
    State(state): State<AppState>,
    Extension(context): Extension<Arc<AuthContext>>,
    Path(id): Path<i32>,
) -> Result<Response> {
    let order = state.lifecycle.get(id).await?;
    ensure_owner_or_admin(&context, order.user_id)?;
    Ok(success(order))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// 变更订单状态（管理员）
pub async fn update_status(
    State(state): State<AppState>,
    Extension(context): Extension<Arc<AuthContext>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Response> {
    require_admin(&context)?;
    let new_status: OrderStatus = request.status.parse()?;

    let change = state
        .lifecycle
        .update_status(
            id,
            new_status,
            &context.user,
            RequestOrigin::from_request(&headers, Some(peer)),
        )
        .await?;

    let message = if change.changed {
        format!("状态已从 {} 变更为 {}", change.previous, change.current)
    } else {
        "状态未变化".to_string()
    };
    Ok(success_with_message(change.order, &message))
}

/// 软删除订单
pub async fn soft_delete(
    State(state): State<AppState>,
    Extension(context): Extension<Arc<AuthContext>>,
    Path(id): Path<i32>,
) -> Result<Response> {
    let order = state.lifecycle.get(id).await?;
    ensure_owner_or_admin(&context, order.user_id)?;

    let deleted = state.lifecycle.soft_delete(id).await?;
    Ok(success_with_message(deleted, "订单已删除"))
}

/// 恢复已删除的订单（管理员）
pub async fn restore(
    State(state): State<AppState>,
    Extension(context): Extension<Arc<AuthContext>>,
    Path(id): Path<i32>,
) -> Result<Response> {
    require_admin(&context)?;
    let restored = state.lifecycle.restore(id).await?;
    Ok(success_with_message(restored, "订单已恢复"))
}

fn ensure_owner_or_admin(context: &AuthContext, owner_id: Option<i32>) -> Result<()> {
    if context.user.is_admin || owner_id == Some(context.user.id) {
        Ok(())
    } else {
        Err(AppError::permission("只能访问自己的订单"))
    }
}
