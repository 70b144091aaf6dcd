//! # 审计日志模块
//!
//! 记录谁在什么时候做了什么。审计表只追加：业务代码只能写入新行，
//! 没有更新和删除入口。写入失败按错误向上传播，由调用方决定
//! 是否因此回滚业务事务。

mod action;
mod origin;

pub use action::AuditAction;
pub use origin::RequestOrigin;

use crate::error::Result;
use chrono::Utc;
use entity::audit_logs;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};

/// 一条待写入的审计记录
#[derive(Debug, Clone)]
pub struct AuditEntry {
    /// 操作者；匿名操作（如失败的登录尝试）为 None
    pub actor: Option<i32>,
    pub action: AuditAction,
    /// 人类可读的事件描述
    pub description: String,
    pub origin: RequestOrigin,
    /// 关联的资源（类型 + 主键）
    pub resource: Option<(String, i32)>,
}

impl AuditEntry {
    pub fn new(actor: Option<i32>, action: AuditAction, description: impl Into<String>) -> Self {
        Self {
            actor,
            action,
            description: description.into(),
            origin: RequestOrigin::default(),
            resource: None,
        }
    }

    #[must_use]
    pub fn with_origin(mut self, origin: RequestOrigin) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn with_resource(mut self, resource_type: impl Into<String>, resource_id: i32) -> Self {
        self.resource = Some((resource_type.into(), resource_id));
        self
    }
}

/// 写入一条审计记录
///
/// 接受任意连接（裸连接或事务中的连接），调用方把它放进订单事务时，
/// 审计失败会连带回滚业务写入。
pub async fn record<C: ConnectionTrait>(conn: &C, entry: AuditEntry) -> Result<audit_logs::Model> {
    let (resource_type, resource_id) = match entry.resource {
        Some((rt, rid)) => (Some(rt), Some(rid)),
        None => (None, None),
    };

    let model = audit_logs::ActiveModel {
        user_id: Set(entry.actor),
        action: Set(entry.action.as_str().to_string()),
        description: Set(entry.description),
        ip_address: Set(entry.origin.ip),
        user_agent: Set(entry.origin.user_agent),
        resource_type: Set(resource_type),
        resource_id: Set(resource_id),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::users;
    use sea_orm::{Database, DatabaseConnection, EntityTrait};
    use sea_orm_migration::MigratorTrait;

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        ::migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn insert_user(db: &DatabaseConnection, username: &str) -> users::Model {
        let now = Utc::now().naive_utc();
        users::ActiveModel {
            username: Set(username.to_string()),
            email: Set(format!("{username}@example.com")),
            password_hash: Set("x".to_string()),
            is_active: Set(true),
            is_admin: Set(false),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn record_persists_anonymous_entry() {
        let db = setup_db().await;
        let origin = RequestOrigin {
            ip: Some("203.0.113.7".to_string()),
            user_agent: Some("curl/8.0".to_string()),
        };

        let entry = AuditEntry::new(None, AuditAction::Login, "Failed login for 'ghost'")
            .with_origin(origin);
        let saved = record(&db, entry).await.unwrap();

        assert_eq!(saved.user_id, None);
        assert_eq!(saved.action, "login");
        assert_eq!(saved.ip_address.as_deref(), Some("203.0.113.7"));
    }

    #[tokio::test]
    async fn record_links_resource() {
        let db = setup_db().await;
        let actor = insert_user(&db, "alice").await;
        let entry = AuditEntry::new(Some(actor.id), AuditAction::OrderCreated, "Order created")
            .with_resource("order", 42);
        let saved = record(&db, entry).await.unwrap();

        assert_eq!(saved.user_id, Some(actor.id));
        assert_eq!(saved.resource_type.as_deref(), Some("order"));
        assert_eq!(saved.resource_id, Some(42));

        let rows = entity::audit_logs::Entity::find().all(&db).await.unwrap();
        assert_eq!(rows.len(), 1);
    }
}
