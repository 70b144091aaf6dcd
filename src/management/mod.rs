//! # 管理接口模块
//!
//! HTTP API 层：路由、中间件、处理器与业务服务。

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod services;

pub use server::{AppState, ManagementServer};
