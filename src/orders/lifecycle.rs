//! # 订单生命周期管理
//!
//! 创建/状态变更的编排中心：校验 → 持久化 → 审计 → 通知，
//! 顺序固定。审计写入和订单写入在同一事务内，任一失败整体回滚；
//! 通知在事务提交后尽力而为地发送，失败不影响主操作。

use super::status::{OrderPriority, OrderStatus};
use crate::audit::{self, AuditAction, AuditEntry, RequestOrigin};
use crate::error::{AppError, Result};
use crate::notifier::Notifier;
use crate::store::SoftDeletable;
use crate::{ensure_validation, validation_error};
use chrono::Utc;
use entity::{orders, users};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// 订单列表固定页大小
pub const ORDERS_PAGE_SIZE: u64 = 15;

/// 新订单草稿
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub title: String,
    pub description: String,
    pub client_name: String,
    pub quantity: i32,
    pub priority: OrderPriority,
    pub attachment: Option<String>,
}

impl OrderDraft {
    /// 字段级校验
    pub fn validate(&self) -> Result<()> {
        ensure_validation!(!self.title.trim().is_empty(), "标题不能为空", "title");
        ensure_validation!(
            !self.description.trim().is_empty(),
            "描述不能为空",
            "description"
        );
        ensure_validation!(
            !self.client_name.trim().is_empty(),
            "客户名称不能为空",
            "client_name"
        );
        if self.quantity <= 0 {
            return Err(validation_error!("数量必须为正整数", "quantity"));
        }
        Ok(())
    }
}

/// `update_status` 的结果：变更前后的状态与是否真正发生了迁移
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub order: orders::Model,
    pub previous: OrderStatus,
    pub current: OrderStatus,
    pub changed: bool,
}

/// 分页查询结果
#[derive(Debug, Clone, Serialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> PagedResult<T> {
    #[must_use]
    pub fn empty(page_size: u64) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            page_size,
            total_items: 0,
            total_pages: 0,
        }
    }
}

/// 订单生命周期管理器
pub struct OrderLifecycle {
    db: DatabaseConnection,
    notifier: Arc<Notifier>,
}

impl OrderLifecycle {
    pub fn new(db: DatabaseConnection, notifier: Arc<Notifier>) -> Self {
        Self { db, notifier }
    }

    /// 创建订单
    ///
    /// 新订单总是从 Pending 开始。订单行与 `order_created` 审计行
    /// 在同一事务内写入，提交后发送下单确认邮件。
    pub async fn create(
        &self,
        draft: OrderDraft,
        owner: &users::Model,
        origin: RequestOrigin,
    ) -> Result<orders::Model> {
        draft.validate()?;

        let now = Utc::now().naive_utc();
        let txn = self.db.begin().await?;

        let order = orders::ActiveModel {
            title: Set(draft.title.trim().to_string()),
            description: Set(draft.description),
            client_name: Set(draft.client_name.trim().to_string()),
            quantity: Set(draft.quantity),
            priority: Set(draft.priority.as_str().to_string()),
            status: Set(OrderStatus::Pending.as_str().to_string()),
            attachment: Set(draft.attachment),
            user_id: Set(Some(owner.id)),
            is_deleted: Set(false),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        audit::record(
            &txn,
            AuditEntry::new(
                Some(owner.id),
                AuditAction::OrderCreated,
                format!("Order '{}' created for {}", order.title, order.client_name),
            )
            .with_origin(origin)
            .with_resource("order", order.id),
        )
        .await?;

        txn.commit().await?;

        self.notifier
            .send_order_confirmation(&order.title, &owner.email)
            .await;

        Ok(order)
    }

    /// 变更订单状态
    ///
    /// 在单个事务内重读当前状态做前后比较，杜绝两个并发变更
    /// 基于同一份旧状态各写一半的情况。目标状态与当前状态相同时
    /// 是纯粹的 no-op：不写审计、不发通知。
    pub async fn update_status(
        &self,
        order_id: i32,
        new_status: OrderStatus,
        actor: &users::Model,
        origin: RequestOrigin,
    ) -> Result<StatusChange> {
        let txn = self.db.begin().await?;

        let order = orders::Entity::find_by_id(order_id)
            .filter(orders::Column::IsDeleted.eq(false))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::not_found("order", order_id))?;

        let current: OrderStatus = order.status.parse()?;

        if current == new_status {
            txn.commit().await?;
            return Ok(StatusChange {
                order,
                previous: current,
                current,
                changed: false,
            });
        }

        if !current.can_transition_to(new_status) {
            return Err(AppError::invalid_transition(
                current.as_str(),
                new_status.as_str(),
            ));
        }

        let title = order.title.clone();
        let owner_id = order.user_id;

        let mut active: orders::ActiveModel = order.into();
        active.status = Set(new_status.as_str().to_string());
        active.updated_at = Set(Utc::now().naive_utc());
        let updated = active.update(&txn).await?;

        audit::record(
            &txn,
            AuditEntry::new(
                Some(actor.id),
                AuditAction::OrderStatusChanged,
                format!("Order '{title}' status changed from {current} to {new_status}"),
            )
            .with_origin(origin)
            .with_resource("order", updated.id),
        )
        .await?;

        txn.commit().await?;

        self.notify_owner_of_status(owner_id, &title, new_status).await;

        Ok(StatusChange {
            order: updated,
            previous: current,
            current: new_status,
            changed: true,
        })
    }

    async fn notify_owner_of_status(
        &self,
        owner_id: Option<i32>,
        title: &str,
        new_status: OrderStatus,
    ) {
        let Some(owner_id) = owner_id else { return };

        match users::Entity::find_by_id(owner_id).one(&self.db).await {
            Ok(Some(owner)) => {
                self.notifier
                    .send_order_status_update(title, new_status.as_str(), &owner.email)
                    .await;
            }
            Ok(None) => {}
            Err(e) => warn!("查询订单所有者失败，跳过状态变更通知: {}", e),
        }
    }

    /// 软删除订单
    pub async fn soft_delete(&self, order_id: i32) -> Result<orders::Model> {
        let order = orders::Entity::find_active()
            .filter(orders::Column::Id.eq(order_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("order", order_id))?;

        let now = Utc::now().naive_utc();
        let mut active: orders::ActiveModel = order.into();
        active.is_deleted = Set(true);
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        Ok(active.update(&self.db).await?)
    }

    /// 恢复已软删除的订单
    pub async fn restore(&self, order_id: i32) -> Result<orders::Model> {
        let order = orders::Entity::find_with_deleted()
            .filter(orders::Column::Id.eq(order_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("order", order_id))?;

        let mut active: orders::ActiveModel = order.into();
        active.is_deleted = Set(false);
        active.deleted_at = Set(None);
        active.updated_at = Set(Utc::now().naive_utc());
        Ok(active.update(&self.db).await?)
    }

    /// 物理删除订单，绕过软删除标记
    ///
    /// 仅供后台清理使用，删除后任何查询都不再返回该行。
    pub async fn hard_delete(&self, order_id: i32) -> Result<()> {
        let result = orders::Entity::delete_by_id(order_id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("order", order_id));
        }
        Ok(())
    }

    /// 按主键查询订单（未删除）
    pub async fn get(&self, order_id: i32) -> Result<orders::Model> {
        orders::Entity::find_active()
            .filter(orders::Column::Id.eq(order_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("order", order_id))
    }

    /// 搜索当前用户自己的订单
    ///
    /// 大小写不敏感的子串匹配，覆盖标题、客户名、描述、状态和
    /// 优先级。空查询返回空结果而不是全量列表。页码越界时收敛
    /// 到首页或末页。
    pub async fn search(
        &self,
        owner_id: i32,
        query: &str,
        page: u64,
    ) -> Result<PagedResult<orders::Model>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(PagedResult::empty(ORDERS_PAGE_SIZE));
        }

        let pattern = format!("%{needle}%");
        let matches = |column: orders::Column| {
            Expr::expr(Func::lower(Expr::col(column))).like(pattern.clone())
        };

        let selector = orders::Entity::find_active()
            .filter(orders::Column::UserId.eq(owner_id))
            .filter(
                Condition::any()
                    .add(matches(orders::Column::Title))
                    .add(matches(orders::Column::ClientName))
                    .add(matches(orders::Column::Description))
                    .add(matches(orders::Column::Status))
                    .add(matches(orders::Column::Priority)),
            )
            .order_by_desc(orders::Column::CreatedAt);

        let paginator = selector.paginate(&self.db, ORDERS_PAGE_SIZE);
        let total_items = paginator.num_items().await?;
        let total_pages = paginator.num_pages().await?;

        if total_pages == 0 {
            return Ok(PagedResult::empty(ORDERS_PAGE_SIZE));
        }

        let page = page.clamp(1, total_pages);
        let items = paginator.fetch_page(page - 1).await?;

        Ok(PagedResult {
            items,
            page,
            page_size: ORDERS_PAGE_SIZE,
            total_items,
            total_pages,
        })
    }

    /// 当前用户的全部订单，最新在前
    pub async fn list(&self, owner_id: i32, page: u64) -> Result<PagedResult<orders::Model>> {
        let selector = orders::Entity::find_active()
            .filter(orders::Column::UserId.eq(owner_id))
            .order_by_desc(orders::Column::CreatedAt);

        let paginator = selector.paginate(&self.db, ORDERS_PAGE_SIZE);
        let total_items = paginator.num_items().await?;
        let total_pages = paginator.num_pages().await?;

        if total_pages == 0 {
            return Ok(PagedResult::empty(ORDERS_PAGE_SIZE));
        }

        let page = page.clamp(1, total_pages);
        let items = paginator.fetch_page(page - 1).await?;

        Ok(PagedResult {
            items,
            page,
            page_size: ORDERS_PAGE_SIZE,
            total_items,
            total_pages,
        })
    }
}
