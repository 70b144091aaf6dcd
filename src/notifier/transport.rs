//! # 邮件传输通道

use super::EmailMessage;
use crate::config::EmailConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// 邮件传输抽象
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn deliver(&self, from: &str, message: &EmailMessage) -> Result<()>;
}

/// HTTP 邮件服务传输（POST JSON 到邮件服务接口）
pub struct HttpMailTransport {
    client: reqwest::Client,
    endpoint: String,
    api_token: String,
}

#[derive(Serialize)]
struct MailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl HttpMailTransport {
    #[must_use]
    pub fn new(config: &EmailConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_token: config.api_token.clone(),
        }
    }
}

#[async_trait]
impl EmailTransport for HttpMailTransport {
    async fn deliver(&self, from: &str, message: &EmailMessage) -> Result<()> {
        let payload = MailPayload {
            from,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::network(format!(
                "邮件服务返回错误状态: {}",
                response.status()
            )))
        }
    }
}

/// 内存传输，测试和本地开发使用：记录而不是投递
#[derive(Default)]
pub struct MemoryTransport {
    messages: Mutex<Vec<EmailMessage>>,
}

impl MemoryTransport {
    /// 已"发送"的全部邮件
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<EmailMessage>> {
        self.messages.lock().unwrap()
    }
}

#[async_trait]
impl EmailTransport for MemoryTransport {
    async fn deliver(&self, _from: &str, message: &EmailMessage) -> Result<()> {
        self.lock().push(message.clone());
        Ok(())
    }
}
