//! # 服务页面管理
//!
//! 服务页是单例：表里至多一行，由唯一索引的 `singleton_guard` 列
//! 在存储层兜底，服务层再做一次计数检查给出友好错误。

use crate::error::{AppError, Result};
use chrono::Utc;
use entity::{partner_logos, service_pages};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

/// 服务页文案
#[derive(Debug, Clone, Deserialize)]
pub struct ServicePageContent {
    pub title: String,
    pub heading: String,
    pub content: String,
}

/// 服务页服务
pub struct ServicePageService {
    db: DatabaseConnection,
}

impl ServicePageService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// 取服务页及其合作伙伴Logo（按展示顺序）
    pub async fn get(&self) -> Result<(service_pages::Model, Vec<partner_logos::Model>)> {
        let page = service_pages::Entity::find()
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("service_page", "singleton"))?;

        let logos = page
            .find_related(partner_logos::Entity)
            .filter(partner_logos::Column::IsActive.eq(true))
            .order_by_asc(partner_logos::Column::DisplayOrder)
            .all(&self.db)
            .await?;

        Ok((page, logos))
    }

    /// 创建服务页
    ///
    /// 第二次创建返回冲突错误。并发创建被唯一索引的 `singleton_guard`
    /// 拦下后同样映射为冲突。
    pub async fn create(&self, content: ServicePageContent) -> Result<service_pages::Model> {
        let count = service_pages::Entity::find().count(&self.db).await?;
        if count > 0 {
            return Err(AppError::conflict("服务页已存在，不能重复创建"));
        }

        let inserted = service_pages::ActiveModel {
            title: Set(content.title),
            heading: Set(content.heading),
            content: Set(content.content),
            singleton_guard: Set(true),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if e.to_string().to_lowercase().contains("unique") {
                AppError::conflict("服务页已存在，不能重复创建")
            } else {
                e.into()
            }
        })?;

        Ok(inserted)
    }

    /// 原地更新已有的服务页
    pub async fn update(&self, content: ServicePageContent) -> Result<service_pages::Model> {
        let existing = service_pages::Entity::find()
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("service_page", "singleton"))?;

        let mut active: service_pages::ActiveModel = existing.into();
        active.title = Set(content.title);
        active.heading = Set(content.heading);
        active.content = Set(content.content);
        active.updated_at = Set(Utc::now().naive_utc());
        Ok(active.update(&self.db).await?)
    }

    /// PUT语义：有则更新，无则创建第一行
    pub async fn upsert(&self, content: ServicePageContent) -> Result<service_pages::Model> {
        if service_pages::Entity::find().one(&self.db).await?.is_some() {
            self.update(content).await
        } else {
            self.create(content).await
        }
    }

    /// 添加合作伙伴Logo
    pub async fn add_logo(
        &self,
        name: &str,
        image_url: &str,
        display_order: i32,
    ) -> Result<partner_logos::Model> {
        if name.trim().is_empty() {
            return Err(AppError::validation("Logo名称不能为空", Some("name".into())));
        }

        let page = service_pages::Entity::find()
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("service_page", "singleton"))?;

        let logo = partner_logos::ActiveModel {
            service_page_id: Set(page.id),
            name: Set(name.trim().to_string()),
            image_url: Set(image_url.to_string()),
            display_order: Set(display_order),
            is_active: Set(true),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(logo)
    }

    /// 下架一个Logo（保留历史行）
    pub async fn deactivate_logo(&self, logo_id: i32) -> Result<partner_logos::Model> {
        let logo = partner_logos::Entity::find_by_id(logo_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("partner_logo", logo_id))?;

        let mut active: partner_logos::ActiveModel = logo.into();
        active.is_active = Set(false);
        Ok(active.update(&self.db).await?)
    }
}
