use domain::TaxonomyError;
use wine_auth::AuthError;
use wine_client::{Alert, ApiError};
use wine_config::ConfigError;

/// 命令执行错误；统一转成提示输出到 stderr。
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Usage(String),
    #[error("output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    pub fn not_found(kind: &str, key: &str) -> Self {
        CliError::NotFound(format!("{kind} {key:?} not found"))
    }

    pub fn alert(&self) -> Alert {
        match self {
            CliError::Api(err) => err.alert(),
            CliError::Auth(AuthError::NotLoggedIn) => {
                Alert::new("Not Logged In", "run `wine login` first")
            }
            CliError::Auth(err) => Alert::new("Session", err.to_string()),
            CliError::Config(err) => Alert::new("Configuration", err.to_string()),
            CliError::NotFound(message) => Alert::new("Not Found", message.clone()),
            CliError::Usage(message) => Alert::new("Usage", message.clone()),
            CliError::Output(err) => Alert::new("Output", err.to_string()),
        }
    }
}

impl From<TaxonomyError> for CliError {
    fn from(error: TaxonomyError) -> Self {
        CliError::Api(error.into())
    }
}

pub type CliResult<T = ()> = Result<T, CliError>;
