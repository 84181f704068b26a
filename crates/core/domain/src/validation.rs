//! 本地输入校验。
//!
//! 所有校验在发起网络请求前同步完成；一次收集全部错误，
//! 便于界面同时标出所有不合法字段。

/// 口令最小长度。
pub const MIN_PASSWORD_LEN: usize = 4;

/// 单个字段的校验错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("password must be {min} or more characters")]
    PasswordTooShort { min: usize },
    #[error("the passwords you entered do not match")]
    PasswordMismatch,
}

/// 一次校验收集到的全部错误。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 去除首尾空白后检查非空，返回规范化后的值。
    pub fn require(&mut self, value: &str, field: &'static str) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.push(ValidationError::Required(field));
        }
        trimmed.to_string()
    }

    /// 新口令的长度与确认一致性。
    pub fn new_password(&mut self, password: &str, confirmation: &str) {
        if password.chars().count() < MIN_PASSWORD_LEN {
            self.push(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        if password != confirmation {
            self.push(ValidationError::PasswordMismatch);
        }
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// 校验单个必填名称。
pub fn require_name(value: &str, field: &'static str) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let value = errors.require(value, field);
    errors.finish().map(|_| value)
}

/// 创建系统表单。
pub fn check_system_create(
    name: &str,
    owner_name: &str,
    password: &str,
    confirmation: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.require(name, "name");
    errors.require(owner_name, "owner name");
    errors.new_password(password, confirmation);
    errors.finish()
}

/// 创建用户表单。
pub fn check_user_create(
    name: &str,
    password: &str,
    confirmation: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.require(name, "username");
    errors.new_password(password, confirmation);
    errors.finish()
}

/// 修改口令表单。
pub fn check_password_change(
    old_password: &str,
    new_password: &str,
    confirmation: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if old_password.is_empty() {
        errors.push(ValidationError::Required("password"));
    }
    errors.new_password(new_password, confirmation);
    errors.finish()
}
