use api_contract::MessageResponse;
use domain::{TaxonomyError, ValidationErrors};

/// 客户端统一错误。
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("{status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Taxonomy(#[from] TaxonomyError),
}

impl ApiError {
    /// 由非 2xx 响应构造；响应体不是 `{message}` 时退回状态短语。
    pub fn from_response(status: u16, reason: Option<&str>, body: &str) -> Self {
        let message = serde_json::from_str::<MessageResponse>(body)
            .map(|body| body.message)
            .ok()
            .filter(|message| !message.trim().is_empty())
            .or_else(|| reason.map(str::to_string))
            .unwrap_or_else(|| "request failed".to_string());
        ApiError::Status { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 指定状态码时替换为界面文案。
    pub fn with_status_message(self, expected: u16, message: &str) -> Self {
        match self {
            ApiError::Status { status, .. } if status == expected => ApiError::Status {
                status,
                message: message.to_string(),
            },
            other => other,
        }
    }

    /// 转成展示给用户的提示。
    pub fn alert(&self) -> Alert {
        match self {
            ApiError::Transport(message) => Alert::new("Network Error", message.clone()),
            ApiError::Status { status, message } => Alert::new(status.to_string(), message.clone()),
            ApiError::Decode(message) => Alert::new("Unexpected Response", message.clone()),
            ApiError::InvalidUrl(url) => Alert::new("Invalid URL", url.clone()),
            ApiError::Validation(errors) => Alert::new("Invalid Input", errors.to_string()),
            ApiError::Taxonomy(error) => Alert::new("Invalid Report", error.to_string()),
        }
    }
}

/// 提示框内容：标题 + 正文。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// 正文前加上失败的动作，如 "Failed to login: ..."。
    pub fn with_context(mut self, action: &str) -> Self {
        self.message = format!("Failed to {action}: {}", self.message);
        self
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::ValidationError;

    #[test]
    fn status_error_prefers_server_message() {
        let err = ApiError::from_response(409, Some("Conflict"), r#"{"message":"name taken"}"#);
        assert_eq!(err.alert(), Alert::new("409", "name taken"));
    }

    #[test]
    fn status_error_falls_back_to_reason() {
        let err = ApiError::from_response(502, Some("Bad Gateway"), "<html>oops</html>");
        assert_eq!(err.alert(), Alert::new("502", "Bad Gateway"));

        let err = ApiError::from_response(599, None, "");
        assert_eq!(err.alert().message, "request failed");
    }

    #[test]
    fn override_only_touches_matching_status() {
        let err = ApiError::Status {
            status: 400,
            message: "bad".to_string(),
        }
        .with_status_message(400, "The system name already exists.");
        assert_eq!(err.alert().message, "The system name already exists.");

        let err = ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        }
        .with_status_message(400, "ignored");
        assert_eq!(err.alert().message, "boom");
    }

    #[test]
    fn validation_errors_share_one_alert() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::Required("name"));
        errors.push(ValidationError::PasswordMismatch);
        let alert = ApiError::from(errors).alert();
        assert_eq!(alert.title, "Invalid Input");
        assert!(alert.message.contains("name is required"));
        assert!(alert.message.contains("do not match"));
    }

    #[test]
    fn context_prefixes_message() {
        let alert = Alert::new("401", "wrong password").with_context("login");
        assert_eq!(alert.to_string(), "401: Failed to login: wrong password");
    }
}
