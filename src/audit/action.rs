//! # 审计动作类型
//!
//! 动作集合是封闭的，写入前先归一化为枚举，避免日志里出现自由文本动作名。

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 可审计的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Login,
    Logout,
    Signup,
    ProfileUpdate,
    PasswordChange,
    OrderCreated,
    OrderUpdated,
    OrderStatusChanged,
    ContactSubmitted,
}

impl AuditAction {
    /// 存储形式的动作名
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Logout => "logout",
            Self::Signup => "signup",
            Self::ProfileUpdate => "profile_update",
            Self::PasswordChange => "password_change",
            Self::OrderCreated => "order_created",
            Self::OrderUpdated => "order_updated",
            Self::OrderStatusChanged => "order_status_changed",
            Self::ContactSubmitted => "contact_submitted",
        }
    }

    /// 全部动作，筛选界面使用
    pub const ALL: [Self; 9] = [
        Self::Login,
        Self::Logout,
        Self::Signup,
        Self::ProfileUpdate,
        Self::PasswordChange,
        Self::OrderCreated,
        Self::OrderUpdated,
        Self::OrderStatusChanged,
        Self::ContactSubmitted,
    ];
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| {
                AppError::validation(format!("未知的审计动作: {s}"), Some("action".into()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_action() {
        for action in AuditAction::ALL {
            assert_eq!(action.as_str().parse::<AuditAction>().unwrap(), action);
        }
    }

    #[test]
    fn unknown_action_is_a_validation_error() {
        let err = "rm_rf".parse::<AuditAction>().unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}
