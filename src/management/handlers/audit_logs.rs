//! # 审计日志处理器

use crate::auth::AuthContext;
use crate::error::Result;
use crate::management::response::{Pagination, paginated};
use crate::management::server::AppState;
use crate::management::services::AuditFilter;
use axum::extract::{Extension, Query, State};
use axum::response::Response;
use std::sync::Arc;

/// 审计日志列表
///
/// 管理员可以按任意用户筛选；普通用户只能看到自己的记录。
pub async fn list(
    State(state): State<AppState>,
    Extension(context): Extension<Arc<AuthContext>>,
    Query(mut filter): Query<AuditFilter>,
) -> Result<Response> {
    if !context.user.is_admin {
        filter.user_id = Some(context.user.id);
    }

    let result = state.audit.list(filter).await?;
    let pagination = Pagination::from(&result);
    Ok(paginated(result.items, pagination))
}
