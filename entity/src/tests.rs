//! 实体层单元测试：字段映射与序列化行为

use crate::{audit_logs, orders};
use sea_orm::entity::prelude::*;

#[test]
fn order_model_serializes_expected_fields() {
    let model = orders::Model {
        id: 1,
        title: "Widget Order".to_string(),
        description: "Blue widgets".to_string(),
        client_name: "ABC Corp".to_string(),
        quantity: 100,
        priority: "Normal".to_string(),
        status: "Pending".to_string(),
        attachment: None,
        user_id: Some(7),
        created_at: chrono::NaiveDateTime::default(),
        updated_at: chrono::NaiveDateTime::default(),
        is_deleted: false,
        deleted_at: None,
    };

    let json = serde_json::to_value(&model).unwrap();
    assert_eq!(json["status"], "Pending");
    assert_eq!(json["priority"], "Normal");
    assert_eq!(json["quantity"], 100);
    assert_eq!(json["is_deleted"], false);
}

#[test]
fn audit_log_allows_anonymous_actor() {
    let model = audit_logs::Model {
        id: 1,
        user_id: None,
        action: "contact_submitted".to_string(),
        description: "anonymous submission".to_string(),
        ip_address: Some("203.0.113.9".to_string()),
        user_agent: None,
        resource_type: Some("Contact".to_string()),
        resource_id: Some(3),
        created_at: chrono::NaiveDateTime::default(),
    };

    assert!(model.user_id.is_none());
    let json = serde_json::to_value(&model).unwrap();
    assert!(json["user_id"].is_null());
}

#[test]
fn orders_table_name_matches_schema() {
    assert_eq!(orders::Entity.table_name(), "orders");
    assert_eq!(audit_logs::Entity.table_name(), "audit_logs");
}
