//! # API 响应结构
//!
//! 定义标准的 JSON API 响应格式，包括成功、失败和分页响应。

use crate::error::AppError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// # 分页信息
#[derive(Debug, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl<T> From<&crate::orders::PagedResult<T>> for Pagination {
    fn from(paged: &crate::orders::PagedResult<T>) -> Self {
        Self {
            page: paged.page,
            limit: paged.page_size,
            total: paged.total_items,
            pages: paged.total_pages,
        }
    }
}

/// # 标准成功响应
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// # 分页成功响应
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// # 标准错误信息
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// # 标准错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorInfo,
    pub timestamp: DateTime<Utc>,
}

/// # API响应枚举
///
/// 统一所有API出口，方便转换为 `axum::response::Response`
#[derive(Debug)]
pub enum ApiResponse<T: Serialize> {
    Success(T),
    SuccessWithMessage(T, String),
    SuccessWithoutData(String),
    Paginated(Vec<T>, Pagination),
    AppError(AppError),
}

/// 错误到HTTP状态码与错误码的映射
fn classify(error: &AppError) -> (StatusCode, &'static str) {
    match error {
        AppError::Config { .. } => (StatusCode::BAD_REQUEST, "CONFIG_ERROR"),
        AppError::Database { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
        AppError::Network { .. } => (StatusCode::BAD_GATEWAY, "NETWORK_ERROR"),
        AppError::Cache { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "CACHE_ERROR"),
        AppError::Io { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        AppError::Serialization { .. } => (StatusCode::BAD_REQUEST, "SERIALIZATION_ERROR"),
        AppError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        AppError::Authentication { .. } => (StatusCode::UNAUTHORIZED, "AUTHENTICATION_ERROR"),
        AppError::Permission { .. } => (StatusCode::FORBIDDEN, "PERMISSION_ERROR"),
        AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND"),
        AppError::Conflict { .. } => (StatusCode::CONFLICT, "RESOURCE_CONFLICT"),
        AppError::Business { .. } => (StatusCode::BAD_REQUEST, "BUSINESS_ERROR"),
        AppError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        AppError::InvalidTransition { .. } => (StatusCode::BAD_REQUEST, "INVALID_TRANSITION"),
        AppError::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED"),
        AppError::Context { source, .. } => classify(source),
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Success(data) => (
                StatusCode::OK,
                Json(SuccessResponse {
                    success: true,
                    data: Some(data),
                    message: Some("操作成功".to_string()),
                    timestamp: Utc::now(),
                }),
            )
                .into_response(),
            Self::SuccessWithMessage(data, message) => (
                StatusCode::OK,
                Json(SuccessResponse {
                    success: true,
                    data: Some(data),
                    message: Some(message),
                    timestamp: Utc::now(),
                }),
            )
                .into_response(),
            Self::SuccessWithoutData(message) => (
                StatusCode::OK,
                Json(SuccessResponse::<()> {
                    success: true,
                    data: None,
                    message: Some(message),
                    timestamp: Utc::now(),
                }),
            )
                .into_response(),
            Self::Paginated(data, pagination) => (
                StatusCode::OK,
                Json(PaginatedResponse {
                    success: true,
                    data,
                    pagination,
                    message: Some("获取成功".to_string()),
                    timestamp: Utc::now(),
                }),
            )
                .into_response(),
            Self::AppError(error) => {
                let (status, code) = classify(&error);

                let field = match &error {
                    AppError::Validation { field, .. } => field.clone(),
                    _ => None,
                };

                let mut response = (
                    status,
                    Json(ErrorResponse {
                        success: false,
                        error: ErrorInfo {
                            code: code.to_string(),
                            message: error.to_string(),
                            field,
                        },
                        timestamp: Utc::now(),
                    }),
                )
                    .into_response();

                if let AppError::RateLimited {
                    retry_after_seconds,
                    ..
                } = &error
                {
                    if let Ok(value) = retry_after_seconds.to_string().parse() {
                        response.headers_mut().insert("Retry-After", value);
                    }
                }

                response
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ApiResponse::<()>::AppError(self).into_response()
    }
}

/// # 便捷函数：成功响应
pub fn success<T: Serialize>(data: T) -> Response {
    ApiResponse::Success(data).into_response()
}

/// # 便捷函数：带消息的成功响应
pub fn success_with_message<T: Serialize>(data: T, message: &str) -> Response {
    ApiResponse::SuccessWithMessage(data, message.to_string()).into_response()
}

/// # 便捷函数：无数据体的成功响应
pub fn success_without_data(message: &str) -> Response {
    ApiResponse::<()>::SuccessWithoutData(message.to_string()).into_response()
}

/// # 便捷函数：分页响应
pub fn paginated<T: Serialize>(data: Vec<T>, pagination: Pagination) -> Response {
    ApiResponse::Paginated(data, pagination).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_maps_to_429_with_retry_after() {
        let response =
            AppError::rate_limited("操作过于频繁", 42).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get("Retry-After").unwrap(),
            &"42".parse::<axum::http::HeaderValue>().unwrap()
        );
    }

    #[test]
    fn invalid_transition_maps_to_400() {
        let response = AppError::invalid_transition("Pending", "Shipped").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = AppError::not_found("order", 9).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
