//! # 通知模块
//!
//! 面向用户的邮件通知。投递是"尽力而为"：任何失败只记日志并返回
//! `false`，绝不向调用方抛错，业务流程（注册、下单、状态变更）
//! 不因通知失败而中断。

mod transport;

pub use transport::{EmailTransport, HttpMailTransport, MemoryTransport};

use crate::config::EmailConfig;
use std::sync::Arc;
use tracing::{info, warn};

/// 一封待发送的通知邮件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// 通知服务
pub struct Notifier {
    transport: Arc<dyn EmailTransport>,
    from_address: String,
    site_url: String,
}

impl Notifier {
    pub fn new(transport: Arc<dyn EmailTransport>, config: &EmailConfig) -> Self {
        Self {
            transport,
            from_address: config.from_address.clone(),
            site_url: config.site_url.clone(),
        }
    }

    /// 根据配置选择传输通道：启用时走HTTP邮件服务，否则用内存收件箱
    pub fn from_config(config: &EmailConfig) -> Self {
        let transport: Arc<dyn EmailTransport> = if config.enabled {
            Arc::new(HttpMailTransport::new(config))
        } else {
            Arc::new(MemoryTransport::default())
        };
        Self::new(transport, config)
    }

    /// 发送一封邮件，返回是否投递成功
    ///
    /// 收件人为空直接返回 `false`，传输失败记日志后返回 `false`。
    pub async fn send(&self, message: EmailMessage) -> bool {
        if message.to.trim().is_empty() {
            warn!("跳过无收件人的通知: {}", message.subject);
            return false;
        }

        let to = message.to.clone();
        match self.transport.deliver(&self.from_address, &message).await {
            Ok(()) => {
                info!("通知邮件已发送: '{}' -> {}", message.subject, to);
                true
            }
            Err(e) => {
                warn!("通知邮件发送失败: '{}' -> {}: {}", message.subject, to, e);
                false
            }
        }
    }

    /// 新用户欢迎邮件
    pub async fn send_welcome(&self, username: &str, email: &str) -> bool {
        self.send(EmailMessage {
            to: email.to_string(),
            subject: "Welcome to Enterprise!".to_string(),
            body: format!(
                "Hello {username}, welcome to Enterprise!\n\nVisit us at {}",
                self.site_url
            ),
        })
        .await
    }

    /// 下单确认邮件
    pub async fn send_order_confirmation(&self, order_title: &str, email: &str) -> bool {
        self.send(EmailMessage {
            to: email.to_string(),
            subject: format!("Order Confirmation - {order_title}"),
            body: format!(
                "Your order \"{order_title}\" has been received and is being processed.\n\n\
                 Track it at {}/status/",
                self.site_url
            ),
        })
        .await
    }

    /// 订单状态变更邮件
    pub async fn send_order_status_update(
        &self,
        order_title: &str,
        new_status: &str,
        email: &str,
    ) -> bool {
        self.send(EmailMessage {
            to: email.to_string(),
            subject: format!("Order Status Update - {order_title}"),
            body: format!(
                "Your order \"{order_title}\" status has been updated to: {new_status}\n\n\
                 Track it at {}/status/",
                self.site_url
            ),
        })
        .await
    }

    /// 联系表单确认邮件
    pub async fn send_contact_confirmation(&self, name: &str, email: &str) -> bool {
        self.send(EmailMessage {
            to: email.to_string(),
            subject: "Thank you for contacting Enterprise".to_string(),
            body: format!(
                "Hello {name}, we have received your message and will get back to you soon."
            ),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use async_trait::async_trait;

    fn memory_notifier() -> (Notifier, Arc<MemoryTransport>) {
        let transport = Arc::new(MemoryTransport::default());
        let notifier = Notifier::new(transport.clone(), &EmailConfig::default());
        (notifier, transport)
    }

    #[tokio::test]
    async fn empty_recipient_short_circuits() {
        let (notifier, transport) = memory_notifier();
        let sent = notifier
            .send(EmailMessage {
                to: "   ".to_string(),
                subject: "ignored".to_string(),
                body: String::new(),
            })
            .await;

        assert!(!sent);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn successful_delivery_returns_true() {
        let (notifier, transport) = memory_notifier();
        let sent = notifier.send_welcome("alice", "alice@example.com").await;

        assert!(sent);
        let messages = transport.sent();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].subject, "Welcome to Enterprise!");
        assert!(messages[0].body.contains("alice"));
    }

    #[tokio::test]
    async fn status_update_body_names_new_status() {
        let (notifier, transport) = memory_notifier();
        notifier
            .send_order_status_update("Widget Order", "Processing", "bob@example.com")
            .await;

        let messages = transport.sent();
        assert!(messages[0].body.contains("Processing"));
        assert_eq!(messages[0].subject, "Order Status Update - Widget Order");
    }

    struct FailingTransport;

    #[async_trait]
    impl EmailTransport for FailingTransport {
        async fn deliver(
            &self,
            _from: &str,
            _message: &EmailMessage,
        ) -> crate::error::Result<()> {
            Err(AppError::network("smtp relay unreachable"))
        }
    }

    #[tokio::test]
    async fn transport_failure_is_swallowed() {
        let notifier = Notifier::new(Arc::new(FailingTransport), &EmailConfig::default());
        let sent = notifier.send_welcome("carol", "carol@example.com").await;
        assert!(!sent);
    }
}
