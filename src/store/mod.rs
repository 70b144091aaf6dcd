//! # 软删除存储层
//!
//! 业务数据默认走软删除：删除操作只翻转 `is_deleted` 标记并记录删除时间，
//! 常规查询入口自动排除已删除行，需要回收站视图时显式使用
//! `find_with_deleted`。

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, QueryFilter, Select};

/// 支持软删除的实体
///
/// 实现者只需指出删除标记列，两个查询入口即为该实体的默认可见性边界。
pub trait SoftDeletable: EntityTrait {
    /// 软删除标记列（`is_deleted`）
    fn deleted_flag_column() -> Self::Column;

    /// 仅查询未删除的行（默认入口）
    fn find_active() -> Select<Self> {
        Self::find().filter(Self::deleted_flag_column().eq(false))
    }

    /// 查询全部行，包括已软删除的（管理/恢复场景）
    fn find_with_deleted() -> Select<Self> {
        Self::find()
    }
}

impl SoftDeletable for entity::orders::Entity {
    fn deleted_flag_column() -> Self::Column {
        entity::orders::Column::IsDeleted
    }
}

impl SoftDeletable for entity::contacts::Entity {
    fn deleted_flag_column() -> Self::Column {
        entity::contacts::Column::IsDeleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, Database, PaginatorTrait, Set};
    use sea_orm_migration::MigratorTrait;

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        ::migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn insert_order(db: &DatabaseConnection, title: &str, deleted: bool) {
        let now = Utc::now().naive_utc();
        entity::orders::ActiveModel {
            title: Set(title.to_string()),
            description: Set(String::new()),
            client_name: Set("Client".to_string()),
            quantity: Set(1),
            priority: Set("Normal".to_string()),
            status: Set("Pending".to_string()),
            is_deleted: Set(deleted),
            deleted_at: Set(deleted.then(|| now)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn find_active_excludes_soft_deleted_rows() {
        let db = setup_db().await;
        insert_order(&db, "visible", false).await;
        insert_order(&db, "hidden", true).await;

        let active = entity::orders::Entity::find_active()
            .count(&db)
            .await
            .unwrap();
        assert_eq!(active, 1);

        let all = entity::orders::Entity::find_with_deleted()
            .count(&db)
            .await
            .unwrap();
        assert_eq!(all, 2);
    }
}
