use soundcms_admin::form::FormError;
use soundcms_admin::table::TableError;
use soundcms_lib::config::ConfigError;
use soundcms_lib::error::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Lib(#[from] soundcms_lib::Error),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Usage(String),
}
