//! # Entity 模块
//!
//! 包含所有 Sea-ORM 实体定义

pub mod audit_logs;
pub mod contacts;
pub mod orders;
pub mod partner_logos;
pub mod service_pages;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use contacts::Entity as Contacts;
pub use orders::Entity as Orders;
pub use partner_logos::Entity as PartnerLogos;
pub use service_pages::Entity as ServicePages;
pub use users::Entity as Users;

#[cfg(test)]
mod tests;
