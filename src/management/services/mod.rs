//! # 业务服务层

pub mod audit_query;
pub mod contacts;
pub mod service_page;

pub use audit_query::{AuditFilter, AuditQuery};
pub use contacts::{ContactForm, ContactService};
pub use service_page::{ServicePageContent, ServicePageService};
