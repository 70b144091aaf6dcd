//! # 审计日志查询
//!
//! 只读视图：审计表没有任何写回路径，这里只做筛选和分页。

use crate::audit::AuditAction;
use crate::error::Result;
use crate::orders::PagedResult;
use entity::audit_logs;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::Deserialize;

const AUDIT_PAGE_SIZE: u64 = 15;

/// 审计查询筛选条件
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditFilter {
    pub user_id: Option<i32>,
    pub action: Option<String>,
    #[serde(default)]
    pub page: Option<u64>,
}

/// 审计日志查询服务
pub struct AuditQuery {
    db: DatabaseConnection,
}

impl AuditQuery {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// 分页查询审计记录，最新在前
    pub async fn list(&self, filter: AuditFilter) -> Result<PagedResult<audit_logs::Model>> {
        let mut selector =
            audit_logs::Entity::find().order_by_desc(audit_logs::Column::CreatedAt);

        if let Some(user_id) = filter.user_id {
            selector = selector.filter(audit_logs::Column::UserId.eq(user_id));
        }
        if let Some(action) = filter.action.as_deref() {
            // 动作名先归一化，拦住自由文本筛选
            let action: AuditAction = action.parse()?;
            selector = selector.filter(audit_logs::Column::Action.eq(action.as_str()));
        }

        let paginator = selector.paginate(&self.db, AUDIT_PAGE_SIZE);
        let total_items = paginator.num_items().await?;
        let total_pages = paginator.num_pages().await?;
        if total_pages == 0 {
            return Ok(PagedResult::empty(AUDIT_PAGE_SIZE));
        }

        let page = filter.page.unwrap_or(1).clamp(1, total_pages);
        let items = paginator.fetch_page(page - 1).await?;

        Ok(PagedResult {
            items,
            page,
            page_size: AUDIT_PAGE_SIZE,
            total_items,
            total_pages,
        })
    }
}
