//! # Order Portal
//!
//! 小型企业门户的服务端：账户、订单生命周期、联系表单、服务页
//! 与审计追踪。核心流水线是固定顺序的：
//! 请求 → 防护（认证 + 限流）→ 业务写入（事务内含审计）→ 通知（尽力而为）。

pub mod audit;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod images;
pub mod logging;
pub mod management;
pub mod notifier;
pub mod orders;
pub mod store;

pub use error::{AppError, Result};
