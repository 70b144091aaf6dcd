//! 订单流水线端到端测试：创建 → 审计 → 状态变更 → 通知。

use chrono::Utc;
use entity::{audit_logs, users};
use order_portal::audit::RequestOrigin;
use order_portal::config::EmailConfig;
use order_portal::notifier::{MemoryTransport, Notifier};
use order_portal::orders::{OrderDraft, OrderLifecycle, OrderPriority, OrderStatus};
use sea_orm::{ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

async fn setup() -> (OrderLifecycle, Arc<MemoryTransport>, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let transport = Arc::new(MemoryTransport::default());
    let notifier = Arc::new(Notifier::new(transport.clone(), &EmailConfig::default()));
    (OrderLifecycle::new(db.clone(), notifier), transport, db)
}

async fn insert_user(db: &DatabaseConnection, username: &str) -> users::Model {
    let now = Utc::now().naive_utc();
    users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        password_hash: Set("hash".to_string()),
        is_active: Set(true),
        is_admin: Set(false),
        last_login: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

#[tokio::test]
async fn widget_order_walkthrough() {
    let (lifecycle, transport, db) = setup().await;
    let owner = insert_user(&db, "buyer").await;

    // 创建：Pending + 一条 order_created 审计
    let order = lifecycle
        .create(
            OrderDraft {
                title: "Widget Order".to_string(),
                description: "Bulk widgets".to_string(),
                client_name: "ABC Corp".to_string(),
                quantity: 100,
                priority: OrderPriority::Normal,
                attachment: None,
            },
            &owner,
            RequestOrigin::default(),
        )
        .await
        .unwrap();

    assert_eq!(order.status, "Pending");
    assert_eq!(order.quantity, 100);

    let created_rows = audit_logs::Entity::find()
        .filter(audit_logs::Column::Action.eq("order_created"))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(created_rows.len(), 1);

    // 状态变更：一条 order_status_changed 审计 + 一次通知尝试
    let change = lifecycle
        .update_status(
            order.id,
            OrderStatus::Processing,
            &owner,
            RequestOrigin::default(),
        )
        .await
        .unwrap();
    assert!(change.changed);

    let changed_rows = audit_logs::Entity::find()
        .filter(audit_logs::Column::Action.eq("order_status_changed"))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(changed_rows.len(), 1);
    assert!(changed_rows[0]
        .description
        .contains("from Pending to Processing"));

    let attempts = transport.sent();
    assert!(attempts
        .iter()
        .any(|m| m.subject == "Order Status Update - Widget Order"));
}

#[tokio::test]
async fn full_lifecycle_to_delivery() {
    let (lifecycle, _, db) = setup().await;
    let owner = insert_user(&db, "buyer").await;

    let order = lifecycle
        .create(
            OrderDraft {
                title: "Thread Batch".to_string(),
                description: "5 spools of thread".to_string(),
                client_name: "Mill Co".to_string(),
                quantity: 5,
                priority: OrderPriority::Urgent,
                attachment: Some("specs.pdf".to_string()),
            },
            &owner,
            RequestOrigin::default(),
        )
        .await
        .unwrap();

    for status in [
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ] {
        let change = lifecycle
            .update_status(order.id, status, &owner, RequestOrigin::default())
            .await
            .unwrap();
        assert!(change.changed);
    }

    // 每次迁移恰好一条审计
    let rows = audit_logs::Entity::find()
        .filter(audit_logs::Column::Action.eq("order_status_changed"))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);

    // 终态拒绝任何后续迁移
    let err = lifecycle
        .update_status(
            order.id,
            OrderStatus::Cancelled,
            &owner,
            RequestOrigin::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        order_portal::AppError::InvalidTransition { .. }
    ));
}

#[tokio::test]
async fn soft_deleted_orders_stay_out_of_search_until_restored() {
    let (lifecycle, _, db) = setup().await;
    let owner = insert_user(&db, "buyer").await;

    let order = lifecycle
        .create(
            OrderDraft {
                title: "Fabric Roll".to_string(),
                description: "Plain weave, 50m".to_string(),
                client_name: "Looms Ltd".to_string(),
                quantity: 3,
                priority: OrderPriority::Normal,
                attachment: None,
            },
            &owner,
            RequestOrigin::default(),
        )
        .await
        .unwrap();

    lifecycle.soft_delete(order.id).await.unwrap();
    let found = lifecycle.search(owner.id, "fabric", 1).await.unwrap();
    assert!(found.items.is_empty());

    lifecycle.restore(order.id).await.unwrap();
    let found = lifecycle.search(owner.id, "fabric", 1).await.unwrap();
    assert_eq!(found.items.len(), 1);
}
