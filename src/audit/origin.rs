//! # 请求来源提取

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// 用户代理字符串的最大存储长度
const MAX_USER_AGENT_LEN: usize = 255;

/// 审计记录的请求来源（IP + User-Agent）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOrigin {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestOrigin {
    /// 从请求头和对端地址提取来源
    ///
    /// 代理部署下取 `X-Forwarded-For` 的第一跳（客户端真实IP），
    /// 没有该头时退回对端地址。User-Agent 截断到数据库列宽。
    #[must_use]
    pub fn from_request(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let forwarded_ip = headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|hop| !hop.is_empty())
            .map(ToString::to_string);

        let ip = forwarded_ip.or_else(|| peer.map(|addr| addr.ip().to_string()));

        let user_agent = headers
            .get("user-agent")
            .and_then(|value| value.to_str().ok())
            .map(truncate_chars)
            .filter(|ua| !ua.is_empty());

        Self { ip, user_agent }
    }
}

fn truncate_chars(value: &str) -> String {
    value.chars().take(MAX_USER_AGENT_LEN).collect()
}
