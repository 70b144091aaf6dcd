//! # 服务页处理器

use super::require_admin;
use crate::auth::AuthContext;
use crate::error::Result;
use crate::management::response::{success, success_with_message};
use crate::management::server::AppState;
use crate::management::services::ServicePageContent;
use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::response::Response;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct ServicePageView {
    pub page: entity::service_pages::Model,
    pub logos: Vec<entity::partner_logos::Model>,
}

/// 服务页内容（公开）
pub async fn get_page(State(state): State<AppState>) -> Result<Response> {
    let (page, logos) = state.service_page.get().await?;
    Ok(success(ServicePageView { page, logos }))
}

/// 创建或更新服务页（管理员）
pub async fn update_page(
    State(state): State<AppState>,
    Extension(context): Extension<Arc<AuthContext>>,
    Json(content): Json<ServicePageContent>,
) -> Result<Response> {
    require_admin(&context)?;
    let page = state.service_page.upsert(content).await?;
    Ok(success_with_message(page, "服务页已更新"))
}

#[derive(Debug, Deserialize)]
pub struct AddLogoRequest {
    pub name: String,
    pub image_url: String,
    #[serde(default)]
    pub display_order: i32,
}

/// 添加合作伙伴Logo（管理员）
pub async fn add_logo(
    State(state): State<AppState>,
    Extension(context): Extension<Arc<AuthContext>>,
    Json(request): Json<AddLogoRequest>,
) -> Result<Response> {
    require_admin(&context)?;
    let logo = state
        .service_page
        .add_logo(&request.name, &request.image_url, request.display_order)
        .await?;
    Ok(success_with_message(logo, "Logo已添加"))
}

/// 下架合作伙伴Logo（管理员）
pub async fn deactivate_logo(
    State(state): State<AppState>,
    Extension(context): Extension<Arc<AuthContext>>,
    Path(id): Path<i32>,
) -> Result<Response> {
    require_admin(&context)?;
    let logo = state.service_page.deactivate_logo(id).await?;
    Ok(success_with_message(logo, "Logo已下架"))
}
