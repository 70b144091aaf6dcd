//! # JWT 令牌管理

use crate::config::AuthConfig;
use crate::error::{AppError, Result};
use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};

const ISSUER: &str = "order-portal";
const AUDIENCE: &str = "order-portal-users";

/// JWT 载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// 用户ID
    pub sub: String,
    pub username: String,
    pub is_admin: bool,
    /// 令牌唯一标识，注销时用于吊销
    pub jti: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl JwtClaims {
    fn new(user_id: i32, username: String, is_admin: bool, expires_in: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            username,
            is_admin,
            jti: uuid::Uuid::new_v4().to_string(),
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
            iat: now,
            exp: now + expires_in,
        }
    }

    pub fn user_id(&self) -> Result<i32> {
        self.sub
            .parse()
            .map_err(|_| AppError::authentication("令牌中的用户ID无效"))
    }

    /// 令牌剩余有效时间（秒）
    #[must_use]
    pub fn remaining_seconds(&self) -> i64 {
        (self.exp - Utc::now().timestamp()).max(0)
    }
}

/// JWT 令牌管理器
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_in: i64,
}

impl JwtManager {
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_audience(&[AUDIENCE]);
        validation.validate_exp = true;
        validation.leeway = 30;

        Self {
            encoding_key,
            decoding_key,
            validation,
            expires_in: config.jwt_expires_in,
        }
    }

    /// 签发访问令牌
    pub fn generate_access_token(
        &self,
        user_id: i32,
        username: String,
        is_admin: bool,
    ) -> Result<String> {
        let claims = JwtClaims::new(user_id, username, is_admin, self.expires_in);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            AppError::Internal {
                message: "令牌生成失败".to_string(),
                source: Some(e.into()),
            }
        })
    }

    /// 校验并解析令牌
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims> {
        let token_data: TokenData<JwtClaims> = decode(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("认证令牌已过期")
                }
                _ => AppError::authentication(format!("令牌校验失败: {e}")),
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> JwtManager {
        JwtManager::new(&AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expires_in: 3600,
            refresh_expires_in: 86400,
        })
    }

    #[test]
    fn token_round_trip() {
        let manager = manager();
        let token = manager
            .generate_access_token(7, "alice".to_string(), false)
            .unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.username, "alice");
        assert!(!claims.is_admin);
        assert!(claims.remaining_seconds() > 3500);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let manager = manager();
        let token = manager
            .generate_access_token(7, "alice".to_string(), false)
            .unwrap();
        let mut tampered = token.clone();
        tampered.push('x');

        assert!(manager.validate_token(&tampered).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = manager()
            .generate_access_token(7, "alice".to_string(), true)
            .unwrap();
        let other = JwtManager::new(&AuthConfig {
            jwt_secret: "different-secret".to_string(),
            ..AuthConfig::default()
        });

        assert!(other.validate_token(&token).is_err());
    }
}
