//! # 订单生命周期模块
//!
//! 订单状态机、创建/状态变更编排（审计 + 通知）、软删除与搜索。

mod lifecycle;
mod status;

pub use lifecycle::{OrderDraft, OrderLifecycle, PagedResult, StatusChange, ORDERS_PAGE_SIZE};
pub use status::{OrderPriority, OrderStatus};
