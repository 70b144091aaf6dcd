//! # 账户服务
//!
//! 注册、登录、注销、资料维护。每个成功的账户操作都会留下审计
//! 记录；失败的登录尝试同样入审计，但不暴露具体原因给调用方。

use super::jwt::JwtManager;
use crate::audit::{self, AuditAction, AuditEntry, RequestOrigin};
use crate::cache::{CacheKey, UnifiedCacheManager};
use crate::error::{AppError, Result};
use crate::notifier::Notifier;
use chrono::Utc;
use entity::users;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// 注册请求
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// 登录请求
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 登录响应
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i32,
    pub username: String,
    pub is_admin: bool,
}

/// 已认证请求的上下文，由认证中间件写入请求扩展
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: users::Model,
    /// 当前令牌的唯一标识
    pub token_id: String,
    /// 当前令牌的剩余有效期（秒）
    pub token_remaining_seconds: i64,
}

/// 账户服务
pub struct AuthService {
    db: DatabaseConnection,
    jwt: JwtManager,
    cache: Arc<UnifiedCacheManager>,
    notifier: Arc<Notifier>,
}

impl AuthService {
    pub fn new(
        db: DatabaseConnection,
        jwt: JwtManager,
        cache: Arc<UnifiedCacheManager>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            db,
            jwt,
            cache,
            notifier,
        }
    }

    /// 注册新账户
    ///
    /// 用户行与 `signup` 审计行在同一事务内写入，提交后尽力发送
    /// 欢迎邮件。
    pub async fn signup(
        &self,
        request: SignupRequest,
        origin: RequestOrigin,
    ) -> Result<users::Model> {
        validate_signup(&request)?;

        let username = request.username.trim().to_string();
        let email = request.email.trim().to_lowercase();

        let existing = users::Entity::find()
            .filter(
                sea_orm::Condition::any()
                    .add(users::Column::Username.eq(username.clone()))
                    .add(users::Column::Email.eq(email.clone())),
            )
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(AppError::conflict("用户名或邮箱已被占用"));
        }

        let password_hash = hash_password(&request.password)?;
        let now = Utc::now().naive_utc();
        let txn = self.db.begin().await?;

        let user = users::ActiveModel {
            username: Set(username),
            email: Set(email),
            password_hash: Set(password_hash),
            is_active: Set(true),
            is_admin: Set(false),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        audit::record(
            &txn,
            AuditEntry::new(
                Some(user.id),
                AuditAction::Signup,
                format!("User '{}' registered", user.username),
            )
            .with_origin(origin)
            .with_resource("user", user.id),
        )
        .await?;

        txn.commit().await?;

        self.notifier
            .send_welcome(&user.username, &user.email)
            .await;

        Ok(user)
    }

    /// 登录
    ///
    /// 失败的尝试以匿名身份入审计；对调用方只返回统一的认证错误，
    /// 不区分"用户不存在"和"密码错误"。
    pub async fn login(
        &self,
        request: LoginRequest,
        origin: RequestOrigin,
    ) -> Result<LoginResponse> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(request.username.clone()))
            .filter(users::Column::IsActive.eq(true))
            .one(&self.db)
            .await?;

        let Some(user) = user else {
            self.record_failed_login(&request.username, origin).await?;
            return Err(AppError::authentication("用户名或密码错误"));
        };

        if !verify_password(&request.password, &user.password_hash)? {
            self.record_failed_login(&request.username, origin).await?;
            return Err(AppError::authentication("用户名或密码错误"));
        }

        let now = Utc::now().naive_utc();
        let mut active: users::ActiveModel = user.clone().into();
        active.last_login = Set(Some(now));
        active.updated_at = Set(now);
        let user = active.update(&self.db).await?;

        audit::record(
            &self.db,
            AuditEntry::new(
                Some(user.id),
                AuditAction::Login,
                format!("User '{}' logged in", user.username),
            )
            .with_origin(origin)
            .with_resource("user", user.id),
        )
        .await?;

        let token = self
            .jwt
            .generate_access_token(user.id, user.username.clone(), user.is_admin)?;

        Ok(LoginResponse {
            token,
            user_id: user.id,
            username: user.username,
            is_admin: user.is_admin,
        })
    }

    async fn record_failed_login(&self, username: &str, origin: RequestOrigin) -> Result<()> {
        audit::record(
            &self.db,
            AuditEntry::new(
                None,
                AuditAction::Login,
                format!("Failed login attempt for '{username}'"),
            )
            .with_origin(origin),
        )
        .await?;
        Ok(())
    }

    /// 注销：吊销当前令牌并记录审计
    pub async fn logout(&self, context: &AuthContext, origin: RequestOrigin) -> Result<()> {
        let key = CacheKey::RevokedToken {
            jti: context.token_id.clone(),
        }
        .build();
        let ttl = context.token_remaining_seconds.max(1) as u64;
        self.cache
            .set(&key, true, Some(Duration::from_secs(ttl)))
            .await?;

        audit::record(
            &self.db,
            AuditEntry::new(
                Some(context.user.id),
                AuditAction::Logout,
                format!("User '{}' logged out", context.user.username),
            )
            .with_origin(origin)
            .with_resource("user", context.user.id),
        )
        .await?;

        Ok(())
    }

    /// 校验令牌并装配认证上下文
    pub async fn authenticate(&self, token: &str) -> Result<AuthContext> {
        let claims = self.jwt.validate_token(token)?;

        let revoked_key = CacheKey::RevokedToken {
            jti: claims.jti.clone(),
        }
        .build();
        if self.cache.exists(&revoked_key).await? {
            return Err(AppError::authentication("认证令牌已注销"));
        }

        let user_id = claims.user_id()?;
        let user = users::Entity::find_by_id(user_id)
            .filter(users::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::authentication("账户不存在或已停用"))?;

        let token_remaining_seconds = claims.remaining_seconds();
        Ok(AuthContext {
            user,
            token_id: claims.jti,
            token_remaining_seconds,
        })
    }

    /// 更新资料（目前只有邮箱）
    pub async fn update_profile(
        &self,
        user_id: i32,
        new_email: &str,
        origin: RequestOrigin,
    ) -> Result<users::Model> {
        let email = new_email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(AppError::validation("邮箱格式无效", Some("email".into())));
        }

        let taken = users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .filter(users::Column::Id.ne(user_id))
            .one(&self.db)
            .await?;
        if taken.is_some() {
            return Err(AppError::conflict("邮箱已被占用"));
        }

        let user = users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("user", user_id))?;

        let mut active: users::ActiveModel = user.into();
        active.email = Set(email);
        active.updated_at = Set(Utc::now().naive_utc());
        let user = active.update(&self.db).await?;

        audit::record(
            &self.db,
            AuditEntry::new(
                Some(user.id),
                AuditAction::ProfileUpdate,
                format!("User '{}' updated profile", user.username),
            )
            .with_origin(origin)
            .with_resource("user", user.id),
        )
        .await?;

        Ok(user)
    }

    /// 修改密码
    pub async fn change_password(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
        origin: RequestOrigin,
    ) -> Result<()> {
        if new_password.len() < 8 {
            return Err(AppError::validation(
                "新密码长度至少为8个字符",
                Some("new_password".into()),
            ));
        }

        let user = users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("user", user_id))?;

        if !verify_password(current_password, &user.password_hash)? {
            return Err(AppError::authentication("当前密码不正确"));
        }

        let username = user.username.clone();
        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(hash_password(new_password)?);
        active.updated_at = Set(Utc::now().naive_utc());
        let user = active.update(&self.db).await?;

        audit::record(
            &self.db,
            AuditEntry::new(
                Some(user.id),
                AuditAction::PasswordChange,
                format!("User '{username}' changed password"),
            )
            .with_origin(origin)
            .with_resource("user", user.id),
        )
        .await?;

        Ok(())
    }
}

fn validate_signup(request: &SignupRequest) -> Result<()> {
    let username = request.username.trim();
    if username.len() < 3 {
        return Err(AppError::validation(
            "用户名长度至少为3个字符",
            Some("username".into()),
        ));
    }
    if !request.email.contains('@') {
        return Err(AppError::validation("邮箱格式无效", Some("email".into())));
    }
    if request.password.len() < 8 {
        return Err(AppError::validation(
            "密码长度至少为8个字符",
            Some("password".into()),
        ));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| AppError::Internal {
        message: "密码哈希失败".to_string(),
        source: Some(e.into()),
    })
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash).map_err(|e| AppError::Internal {
        message: "密码校验失败".to_string(),
        source: Some(e.into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, EmailConfig};
    use crate::notifier::MemoryTransport;
    use entity::audit_logs;
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    async fn setup() -> (AuthService, Arc<MemoryTransport>, DatabaseConnection) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        ::migration::Migrator::up(&db, None).await.unwrap();

        let transport = Arc::new(MemoryTransport::default());
        let notifier = Arc::new(Notifier::new(transport.clone(), &EmailConfig::default()));
        let cache = Arc::new(UnifiedCacheManager::memory_only(1024));
        let jwt = JwtManager::new(&AuthConfig {
            jwt_secret: "test-secret".to_string(),
            ..AuthConfig::default()
        });

        (
            AuthService::new(db.clone(), jwt, cache, notifier),
            transport,
            db,
        )
    }

    fn alice() -> SignupRequest {
        SignupRequest {
            username: "alice".to_string(),
            email: "Alice@Example.com".to_string(),
            password: "correct-horse".to_string(),
        }
    }

    #[tokio::test]
    async fn signup_persists_audits_and_welcomes() {
        let (service, transport, db) = setup().await;

        let user = service.signup(alice(), RequestOrigin::default()).await.unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert!(user.is_active);
        assert!(!user.is_admin);

        let rows = audit_logs::Entity::find()
            .filter(audit_logs::Column::Action.eq("signup"))
            .all(&db)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Welcome to Enterprise!");
    }

    #[tokio::test]
    async fn duplicate_signup_conflicts() {
        let (service, _, _) = setup().await;
        service.signup(alice(), RequestOrigin::default()).await.unwrap();

        let err = service
            .signup(alice(), RequestOrigin::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn weak_password_is_rejected() {
        let (service, _, _) = setup().await;
        let mut request = alice();
        request.password = "short".to_string();

        let err = service
            .signup(request, RequestOrigin::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation { field: Some(ref f), .. } if f == "password"
        ));
    }

    #[tokio::test]
    async fn login_round_trip_and_failed_attempt_audit() {
        let (service, _, db) = setup().await;
        service.signup(alice(), RequestOrigin::default()).await.unwrap();

        let response = service
            .login(
                LoginRequest {
                    username: "alice".to_string(),
                    password: "correct-horse".to_string(),
                },
                RequestOrigin::default(),
            )
            .await
            .unwrap();
        assert_eq!(response.username, "alice");

        let context = service.authenticate(&response.token).await.unwrap();
        assert_eq!(context.user.username, "alice");
        assert!(context.user.last_login.is_some());
        assert!(!context.token_id.is_empty());
        assert!(context.token_remaining_seconds > 0);

        let err = service
            .login(
                LoginRequest {
                    username: "alice".to_string(),
                    password: "wrong-password".to_string(),
                },
                RequestOrigin::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authentication { .. }));

        // 失败尝试以匿名身份入审计
        let failures = audit_logs::Entity::find()
            .filter(audit_logs::Column::Action.eq("login"))
            .filter(audit_logs::Column::UserId.is_null())
            .all(&db)
            .await
            .unwrap();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].description.contains("alice"));
    }

    #[tokio::test]
    async fn logout_revokes_token() {
        let (service, _, _) = setup().await;
        service.signup(alice(), RequestOrigin::default()).await.unwrap();

        let response = service
            .login(
                LoginRequest {
                    username: "alice".to_string(),
                    password: "correct-horse".to_string(),
                },
                RequestOrigin::default(),
            )
            .await
            .unwrap();

        let context = service.authenticate(&response.token).await.unwrap();
        service.logout(&context, RequestOrigin::default()).await.unwrap();

        let err = service.authenticate(&response.token).await.unwrap_err();
        assert!(matches!(err, AppError::Authentication { .. }));
    }

    #[tokio::test]
    async fn change_password_requires_current() {
        let (service, _, _) = setup().await;
        let user = service.signup(alice(), RequestOrigin::default()).await.unwrap();

        let err = service
            .change_password(user.id, "wrong", "new-password-1", RequestOrigin::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authentication { .. }));

        service
            .change_password(
                user.id,
                "correct-horse",
                "new-password-1",
                RequestOrigin::default(),
            )
            .await
            .unwrap();

        let response = service
            .login(
                LoginRequest {
                    username: "alice".to_string(),
                    password: "new-password-1".to_string(),
                },
                RequestOrigin::default(),
            )
            .await;
        assert!(response.is_ok());
    }

    #[tokio::test]
    async fn profile_update_rejects_taken_email() {
        let (service, _, _) = setup().await;
        let user = service.signup(alice(), RequestOrigin::default()).await.unwrap();
        service
            .signup(
                SignupRequest {
                    username: "bob".to_string(),
                    email: "bob@example.com".to_string(),
                    password: "another-pass".to_string(),
                },
                RequestOrigin::default(),
            )
            .await
            .unwrap();

        let err = service
            .update_profile(user.id, "bob@example.com", RequestOrigin::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));

        let updated = service
            .update_profile(user.id, "alice2@example.com", RequestOrigin::default())
            .await
            .unwrap();
        assert_eq!(updated.email, "alice2@example.com");
    }
}
