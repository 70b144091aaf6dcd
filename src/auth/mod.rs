//! # 认证与访问防护模块

pub mod jwt;
pub mod rate_limit;
pub mod service;

pub use jwt::{JwtClaims, JwtManager};
pub use rate_limit::{RateBucket, RateGuard, RateLimitOutcome};
pub use service::{AuthContext, AuthService, LoginRequest, LoginResponse, SignupRequest};
