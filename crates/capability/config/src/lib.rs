//! 客户端运行配置加载。

use std::env;
use std::path::PathBuf;
use url::Url;

/// 服务端默认地址。
pub const DEFAULT_API_URL: &str = "https://winesystem.servehttp.com";

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 客户端运行配置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub session_file: Option<PathBuf>,
    /// 日志过滤表达式；`RUST_LOG` 优先于此值。
    pub log_filter: Option<String>,
    pub json_output: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: None,
            log_filter: None,
            json_output: false,
        }
    }
}

impl ClientConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = match read_optional("WINE_API_URL") {
            Some(value) => normalize_api_url("WINE_API_URL", &value)?,
            None => DEFAULT_API_URL.to_string(),
        };
        let session_file = read_optional("WINE_SESSION_FILE").map(PathBuf::from);
        let log_filter = read_optional("WINE_LOG");
        let json_output = read_bool_with_default("WINE_JSON", false);

        Ok(Self {
            api_url,
            session_file,
            log_filter,
            json_output,
        })
    }

    /// 以命令行参数覆盖服务端地址。
    pub fn with_api_url(mut self, value: &str) -> Result<Self, ConfigError> {
        self.api_url = normalize_api_url("--api-url", value)?;
        Ok(self)
    }

    /// 会话文件路径：显式配置优先，否则落在平台配置目录下。
    pub fn session_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.session_file {
            return Ok(path.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join("winesystem").join("session.json"))
            .ok_or_else(|| ConfigError::Missing("WINE_SESSION_FILE".to_string()))
    }
}

/// 只接受带主机名的 http/https 地址，去掉末尾的 `/`。
fn normalize_api_url(key: &str, value: &str) -> Result<String, ConfigError> {
    let invalid =
        |reason: &str| ConfigError::Invalid(key.to_string(), format!("{value}: {reason}"));
    let url = Url::parse(value.trim()).map_err(|err| invalid(&err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host"));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}
