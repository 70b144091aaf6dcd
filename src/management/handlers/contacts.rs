//! # 联系表单处理器

use super::{PageQuery, parse_page, require_admin};
use crate::audit::RequestOrigin;
use crate::auth::{AuthContext, RateBucket};
use crate::error::Result;
use crate::management::response::{Pagination, paginated, success_with_message};
use crate::management::server::AppState;
use crate::management::services::ContactForm;
use axum::Json;
use axum::extract::{ConnectInfo, Extension, Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use std::net::SocketAddr;
use std::sync::Arc;

/// 提交联系表单（允许匿名）
pub async fn submit(
    State(state): State<AppState>,
    context: Option<Extension<Arc<AuthContext>>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(form): Json<ContactForm>,
) -> Result<Response> {
    let origin = RequestOrigin::from_request(&headers, Some(peer));
    let subject = origin
        .ip
        .clone()
        .unwrap_or_else(|| peer.ip().to_string());
    state
        .rate_guard
        .enforce(RateBucket::Contact, &subject)
        .await?;

    let user_id = context.map(|Extension(ctx)| ctx.user.id);
    let contact = state.contacts.submit(form, user_id, origin).await?;
    Ok(success_with_message(contact, "留言已收到"))
}

/// 联系记录列表（管理员）
pub async fn list(
    State(state): State<AppState>,
    Extension(context): Extension<Arc<AuthContext>>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    require_admin(&context)?;
    let result = state
        .contacts
        .list(parse_page(query.page.as_deref()))
        .await?;
    let pagination = Pagination::from(&result);
    Ok(paginated(result.items, pagination))
}

/// 软删除联系记录（管理员）
pub async fn soft_delete(
    State(state): State<AppState>,
    Extension(context): Extension<Arc<AuthContext>>,
    Path(id): Path<i32>,
) -> Result<Response> {
    require_admin(&context)?;
    let deleted = state.contacts.soft_delete(id).await?;
    Ok(success_with_message(deleted, "联系记录已删除"))
}

/// 恢复联系记录（管理员）
pub async fn restore(
    State(state): State<AppState>,
    Extension(context): Extension<Arc<AuthContext>>,
    Path(id): Path<i32>,
) -> Result<Response> {
    require_admin(&context)?;
    let restored = state.contacts.restore(id).await?;
    Ok(success_with_message(restored, "联系记录已恢复"))
}
