//! # 订单实体定义
//!
//! 订单表的 Sea-ORM 实体模型。状态与优先级以字符串存储，
//! 合法取值由上层 `OrderStatus` / `OrderPriority` 枚举约束。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 订单实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub client_name: String,
    pub quantity: i32,
    /// Normal | Urgent
    pub priority: String,
    /// Pending | Processing | Shipped | Delivered | Cancelled
    pub status: String,
    /// 附件路径（预留，表单暂不上传）
    pub attachment: Option<String>,
    pub user_id: Option<i32>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime>,
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
