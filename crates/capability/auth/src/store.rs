//! 会话存储。
//!
//! - FileSessionStore：JSON 文件，命令行跨进程保存登录态
//! - InMemorySessionStore：仅用于测试

use crate::{AuthError, Session};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// 会话存储接口。
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 读取会话；未登录时返回 None。
    async fn load(&self) -> Result<Option<Session>, AuthError>;

    async fn save(&self, session: &Session) -> Result<(), AuthError>;

    /// 清除会话；本就未登录时不报错。
    async fn clear(&self) -> Result<(), AuthError>;
}

/// 基于 JSON 文件的会话存储。
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>, AuthError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AuthError::Storage(err.to_string())),
        };
        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|err| AuthError::Corrupt(err.to_string()))
    }

    async fn save(&self, session: &Session) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| AuthError::Storage(err.to_string()))?;
        }
        let raw = serde_json::to_vec_pretty(session)
            .map_err(|err| AuthError::Storage(err.to_string()))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|err| AuthError::Storage(err.to_string()))?;
        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), AuthError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Storage(err.to_string())),
        }
    }
}

/// 会话内存存储
///
/// 使用 RwLock 提供线程安全的内存存储。
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self) -> Result<Option<Session>, AuthError> {
        self.session
            .read()
            .map(|session| session.clone())
            .map_err(|_| AuthError::Storage("session lock poisoned".to_string()))
    }

    async fn save(&self, session: &Session) -> Result<(), AuthError> {
        let mut guard = self
            .session
            .write()
            .map_err(|_| AuthError::Storage("session lock poisoned".to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), AuthError> {
        let mut guard = self
            .session
            .write()
            .map_err(|_| AuthError::Storage("session lock poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }
}
