//! # 请求处理器

pub mod audit_logs;
pub mod auth;
pub mod contacts;
pub mod images;
pub mod orders;
pub mod services_page;

use crate::auth::AuthContext;
use crate::error::{AppError, Result};
use serde::Deserialize;

/// 列表接口共用的查询参数
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub q: Option<String>,
}

/// 页码解析：非数字或缺失时落到第一页，越界由分页逻辑收敛
pub(crate) fn parse_page(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(1)
}

/// 管理操作的权限门槛
pub(crate) fn require_admin(context: &AuthContext) -> Result<()> {
    if context.user.is_admin {
        Ok(())
    } else {
        Err(AppError::permission("需要管理员权限"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_parsing_clamps_garbage_to_first_page() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("3")), 3);
        assert_eq!(parse_page(Some(" 7 ")), 7);
    }
}
