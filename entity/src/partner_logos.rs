//! # 合作伙伴 Logo 实体定义

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 合作伙伴 Logo 实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "partner_logos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub service_page_id: i32,
    pub name: String,
    pub image_url: String,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service_pages::Entity",
        from = "Column::ServicePageId",
        to = "super::service_pages::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    ServicePage,
}

impl Related<super::service_pages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServicePage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
