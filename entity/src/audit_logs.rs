//! # 操作审计日志实体定义
//!
//! 审计日志为追加写入表：应用层只提供插入与查询，不提供更新或删除。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 审计日志实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// 操作者，系统/匿名操作为 NULL
    pub user_id: Option<i32>,
    pub action: String,
    pub description: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    /// 关联实体类型标签，如 "Order" / "Contact"
    pub resource_type: Option<String>,
    pub resource_id: Option<i32>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
