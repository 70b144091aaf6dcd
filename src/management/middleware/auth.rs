//! # 认证中间件
//!
//! 从请求头中提取JWT，校验后把认证上下文注入到请求扩展中。

use crate::management::server::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// 从 `Authorization` 头中提取 Bearer Token
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Axum认证中间件
pub async fn auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok());

    let Some(auth_header) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let Some(token) = extract_bearer_token(auth_header) else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    match state.auth.authenticate(token).await {
        Ok(context) => {
            request.extensions_mut().insert(Arc::new(context));
            Ok(next.run(request).await)
        }
        Err(_) => Err(StatusCode::UNAUTHORIZED),
    }
}

/// 可选认证中间件
///
/// 带有效令牌的请求获得认证上下文，匿名请求原样放行。
/// 用于既接受匿名又想关联登录用户的路由（如联系表单提交）。
pub async fn auth_optional(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(extract_bearer_token)
        .map(str::to_string);

    if let Some(token) = token {
        if let Ok(context) = state.auth.authenticate(&token).await {
            request.extensions_mut().insert(Arc::new(context));
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_extraction() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }
}
