//! # 联系表单服务

use crate::audit::{self, AuditAction, AuditEntry, RequestOrigin};
use crate::error::{AppError, Result};
use crate::notifier::Notifier;
use crate::orders::PagedResult;
use crate::store::SoftDeletable;
use chrono::Utc;
use entity::contacts;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;

const CONTACTS_PAGE_SIZE: u64 = 15;

/// 联系表单提交内容
#[derive(Debug, Clone, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub description: String,
}

impl ContactForm {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("姓名不能为空", Some("name".into())));
        }
        if !self.email.contains('@') {
            return Err(AppError::validation("邮箱格式无效", Some("email".into())));
        }
        if self.phone.trim().is_empty() {
            return Err(AppError::validation(
                "联系电话不能为空",
                Some("phone".into()),
            ));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::validation(
                "留言内容不能为空",
                Some("description".into()),
            ));
        }
        Ok(())
    }
}

/// 联系表单服务
pub struct ContactService {
    db: DatabaseConnection,
    notifier: Arc<Notifier>,
}

impl ContactService {
    pub fn new(db: DatabaseConnection, notifier: Arc<Notifier>) -> Self {
        Self { db, notifier }
    }

    /// 提交联系表单
    ///
    /// 联系行与 `contact_submitted` 审计行同事务写入，提交后发送
    /// 确认邮件（尽力而为）。登录用户的提交会关联其账户。
    pub async fn submit(
        &self,
        form: ContactForm,
        user_id: Option<i32>,
        origin: RequestOrigin,
    ) -> Result<contacts::Model> {
        form.validate()?;

        let now = Utc::now();
        let txn = self.db.begin().await?;

        let contact = contacts::ActiveModel {
            name: Set(form.name.trim().to_string()),
            email: Set(form.email.trim().to_lowercase()),
            phone: Set(form.phone.trim().to_string()),
            description: Set(form.description),
            date: Set(now.date_naive()),
            user_id: Set(user_id),
            is_deleted: Set(false),
            deleted_at: Set(None),
            created_at: Set(now.naive_utc()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        audit::record(
            &txn,
            AuditEntry::new(
                user_id,
                AuditAction::ContactSubmitted,
                format!("Contact message from '{}'", contact.name),
            )
            .with_origin(origin)
            .with_resource("contact", contact.id),
        )
        .await?;

        txn.commit().await?;

        self.notifier
            .send_contact_confirmation(&contact.name, &contact.email)
            .await;

        Ok(contact)
    }

    /// 分页列出联系记录（管理视图），最新在前
    pub async fn list(&self, page: u64) -> Result<PagedResult<contacts::Model>> {
        let paginator = contacts::Entity::find_active()
            .order_by_desc(contacts::Column::CreatedAt)
            .paginate(&self.db, CONTACTS_PAGE_SIZE);

        let total_items = paginator.num_items().await?;
        let total_pages = paginator.num_pages().await?;
        if total_pages == 0 {
            return Ok(PagedResult::empty(CONTACTS_PAGE_SIZE));
        }

        let page = page.clamp(1, total_pages);
        let items = paginator.fetch_page(page - 1).await?;

        Ok(PagedResult {
            items,
            page,
            page_size: CONTACTS_PAGE_SIZE,
            total_items,
            total_pages,
        })
    }

    /// 软删除一条联系记录
    pub async fn soft_delete(&self, contact_id: i32) -> Result<contacts::Model> {
        let contact = contacts::Entity::find_active()
            .filter(contacts::Column::Id.eq(contact_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("contact", contact_id))?;

        let now = Utc::now().naive_utc();
        let mut active: contacts::ActiveModel = contact.into();
        active.is_deleted = Set(true);
        active.deleted_at = Set(Some(now));
        Ok(active.update(&self.db).await?)
    }

    /// 恢复已软删除的联系记录
    pub async fn restore(&self, contact_id: i32) -> Result<contacts::Model> {
        let contact = contacts::Entity::find_with_deleted()
            .filter(contacts::Column::Id.eq(contact_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("contact", contact_id))?;

        let mut active: contacts::ActiveModel = contact.into();
        active.is_deleted = Set(false);
        active.deleted_at = Set(None);
        Ok(active.update(&self.db).await?)
    }
}
