//! # 账户相关处理器

use crate::audit::RequestOrigin;
use crate::auth::{AuthContext, LoginRequest, RateBucket, SignupRequest};
use crate::error::Result;
use crate::management::response::{success, success_with_message, success_without_data};
use crate::management::server::AppState;
use axum::Json;
use axum::extract::{ConnectInfo, Extension, State};
use axum::http::HeaderMap;
use axum::response::Response;
use chrono::NaiveDateTime;
use entity::users;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;

/// 对外暴露的用户视图，不含密码哈希
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub last_login: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl From<users::Model> for UserView {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
            last_login: user.last_login,
            created_at: user.created_at,
        }
    }
}

fn origin_of(headers: &HeaderMap, peer: SocketAddr) -> RequestOrigin {
    RequestOrigin::from_request(headers, Some(peer))
}

fn rate_subject(origin: &RequestOrigin, peer: SocketAddr) -> String {
    origin.ip.clone().unwrap_or_else(|| peer.ip().to_string())
}

/// 注册
pub async fn signup(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<SignupRequest>,
) -> Result<Response> {
    let origin = origin_of(&headers, peer);
    state
        .rate_guard
        .enforce(RateBucket::Signup, &rate_subject(&origin, peer))
        .await?;

    let user = state.auth.signup(request, origin).await?;
    Ok(success_with_message(UserView::from(user), "注册成功"))
}

/// 登录
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Response> {
    let origin = origin_of(&headers, peer);
    state
        .rate_guard
        .enforce(RateBucket::Login, &rate_subject(&origin, peer))
        .await?;

    let response = state.auth.login(request, origin).await?;
    Ok(success(response))
}

/// 注销
pub async fn logout(
    State(state): State<AppState>,
    Extension(context): Extension<Arc<AuthContext>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Response> {
    state
        .auth
        .logout(&context, origin_of(&headers, peer))
        .await?;
    Ok(success_without_data("已注销"))
}

/// 当前用户资料
pub async fn get_profile(
    Extension(context): Extension<Arc<AuthContext>>,
) -> Result<Response> {
    Ok(success(UserView::from(context.user.clone())))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: String,
}

/// 更新资料
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(context): Extension<Arc<AuthContext>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Response> {
    let user = state
        .auth
        .update_profile(context.user.id, &request.email, origin_of(&headers, peer))
        .await?;
    Ok(success_with_message(UserView::from(user), "资料已更新"))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// 修改密码
pub async fn change_password(
    State(state): State<AppState>,
    Extension(context): Extension<Arc<AuthContext>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Response> {
    state
        .auth
        .change_password(
            context.user.id,
            &request.current_password,
            &request.new_password,
            origin_of(&headers, peer),
        )
        .await?;
    Ok(success_without_data("密码已修改"))
}
