//! # 图片处理器

use crate::management::response::success;
use crate::management::server::AppState;
use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    #[serde(default = "default_theme")]
    pub query: String,
}

fn default_theme() -> String {
    "textile industry".to_string()
}

/// 按主题取一组装饰图片URL（公开）
pub async fn fetch(
    State(state): State<AppState>,
    Query(params): Query<ImageQuery>,
) -> Response {
    let urls = state.images.fetch(&params.query).await;
    success(urls)
}
