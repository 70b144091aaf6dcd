//! HTTP 层集成测试：路由、认证中间件、限流与错误映射。

use axum::Router;
use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Request, StatusCode, header};
use entity::users;
use order_portal::config::{AppConfig, ServerConfig};
use order_portal::management::AppState;
use order_portal::management::routes::create_routes;
use sea_orm::{ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set};
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use std::net::SocketAddr;
use tower::ServiceExt;

async fn test_app() -> (Router, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let state = AppState::build(&AppConfig::default(), db.clone()).unwrap();
    let router = create_routes(state, &ServerConfig::default())
        .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
    (router, db)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    request_json("POST", uri, body, token)
}

fn request_json(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn signup_and_login(router: &Router, username: &str) -> String {
    let (status, _) = send(
        router,
        post_json(
            "/api/auth/signup",
            json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "long-enough-pass",
            }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        router,
        post_json(
            "/api/auth/login",
            json!({ "username": username, "password": "long-enough-pass" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn promote_to_admin(db: &DatabaseConnection, username: &str) {
    let user = users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(db)
        .await
        .unwrap()
        .unwrap();
    let mut active: users::ActiveModel = user.into();
    active.is_admin = Set(true);
    active.update(db).await.unwrap();
}

#[tokio::test]
async fn health_is_public() {
    let (router, _) = test_app().await;
    let (status, body) = send(&router, get("/api/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], "healthy");
}

#[tokio::test]
async fn orders_require_authentication() {
    let (router, _) = test_app().await;
    let (status, _) = send(&router, get("/api/orders", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn order_creation_and_status_flow() {
    let (router, db) = test_app().await;
    let token = signup_and_login(&router, "buyer").await;

    let (status, body) = send(
        &router,
        post_json(
            "/api/orders",
            json!({
                "title": "Widget Order",
                "description": "100 blue widgets",
                "client_name": "ABC Corp",
                "quantity": 100,
                "priority": "Normal",
            }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Pending");
    let order_id = body["data"]["id"].as_i64().unwrap();

    // 普通用户不能改状态
    let (status, _) = send(
        &router,
        request_json(
            "PUT",
            &format!("/api/orders/{order_id}/status"),
            json!({ "status": "Processing" }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 管理员可以
    promote_to_admin(&db, "buyer").await;
    let (status, body) = send(
        &router,
        request_json(
            "PUT",
            &format!("/api/orders/{order_id}/status"),
            json!({ "status": "Processing" }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Processing");

    // 跳步迁移被拒绝
    let (status, body) = send(
        &router,
        request_json(
            "PUT",
            &format!("/api/orders/{order_id}/status"),
            json!({ "status": "Delivered" }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");

    // 列表里能看到自己的订单
    let (status, body) = send(&router, get("/api/orders", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn login_attempts_are_rate_limited() {
    let (router, _) = test_app().await;
    signup_and_login(&router, "target").await;

    for _ in 0..4 {
        let (status, _) = send(
            &router,
            post_json(
                "/api/auth/login",
                json!({ "username": "target", "password": "wrong-password" }),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    // signup_and_login 已占用一次配额，第六次触发限流
    let (status, body) = send(
        &router,
        post_json(
            "/api/auth/login",
            json!({ "username": "target", "password": "wrong-password" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["code"], "RATE_LIMIT_EXCEEDED");
}

#[tokio::test]
async fn anonymous_contact_submission_works() {
    let (router, _) = test_app().await;
    let (status, body) = send(
        &router,
        post_json(
            "/api/contacts",
            json!({
                "name": "Dana",
                "email": "dana@example.com",
                "phone": "555-0101",
                "description": "Bulk pricing please",
            }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user_id"], Value::Null);
}

#[tokio::test]
async fn logged_in_contact_submission_links_the_account() {
    let (router, db) = test_app().await;
    let token = signup_and_login(&router, "dana").await;
    let user = users::Entity::find()
        .filter(users::Column::Username.eq("dana"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();

    let (status, body) = send(
        &router,
        post_json(
            "/api/contacts",
            json!({
                "name": "Dana",
                "email": "dana@example.com",
                "phone": "555-0101",
                "description": "Bulk pricing please",
            }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user_id"], json!(user.id));
}

#[tokio::test]
async fn validation_errors_carry_the_field() {
    let (router, _) = test_app().await;
    let token = signup_and_login(&router, "buyer").await;

    let (status, body) = send(
        &router,
        post_json(
            "/api/orders",
            json!({
                "title": "Bad Order",
                "description": "Nothing at all",
                "client_name": "ABC Corp",
                "quantity": 0,
            }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "quantity");
}
