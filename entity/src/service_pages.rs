//! # 服务页面配置实体定义
//!
//! 单例表：`singleton_guard` 列带唯一索引，第二行插入在库层即失败。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 服务页面配置实体（单例）
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "service_pages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub heading: String,
    pub content: String,
    /// 恒为 true，唯一索引保证至多一行
    #[sea_orm(unique)]
    pub singleton_guard: bool,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::partner_logos::Entity")]
    PartnerLogos,
}

impl Related<super::partner_logos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PartnerLogos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
