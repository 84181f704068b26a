//! 会话能力：登录态持久化与 token 过期检查。

mod store;
mod token;

use chrono::{DateTime, Utc};
use domain::SystemContext;
use serde::{Deserialize, Serialize};

pub use store::{FileSessionStore, InMemorySessionStore, SessionStore};
pub use token::{TokenClaims, peek_claims};

/// 会话相关错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("not logged in")]
    NotLoggedIn,
    #[error("session expired, please log in again")]
    SessionExpired,
    #[error("token invalid")]
    TokenInvalid,
    #[error("session storage error: {0}")]
    Storage(String),
    #[error("session file corrupt: {0}")]
    Corrupt(String),
}

/// 登录后保存的会话。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// 签发 token 的服务端地址。
    pub api_url: String,
    pub system_id: i64,
    pub system_name: String,
    pub user_id: i64,
    pub username: String,
    pub token: String,
}

impl Session {
    pub fn context(&self) -> SystemContext {
        SystemContext::new(
            self.system_id,
            self.user_id,
            self.system_name.clone(),
            self.username.clone(),
        )
    }

    /// token 的过期时间；非 JWT 或不带 exp 时为 None。
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        peek_claims(&self.token).ok()?.expires_at()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expires_at| expires_at <= now)
    }

    /// 会话可用于指定服务端且未过期。
    pub fn ensure_usable(&self, api_url: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        if self.api_url != api_url {
            return Err(AuthError::NotLoggedIn);
        }
        if self.is_expired(now) {
            return Err(AuthError::SessionExpired);
        }
        Ok(())
    }
}
