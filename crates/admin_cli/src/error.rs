use engine::{EngineError, ErrorKind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid settings: {0}")]
    Settings(String),
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("terminal error: {0}")]
    Terminal(String),
    #[error("{0}")]
    Usage(String),
}

impl AppError {
    /// Process exit status: 2 for invalid input, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) | AppError::Settings(_) | AppError::Usage(_) => 2,
            AppError::Engine(err) if err.kind() == ErrorKind::Validation => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_exit_with_two() {
        let err = AppError::from(EngineError::Validation("bad amount".to_string()));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(AppError::Settings("x".to_string()).exit_code(), 2);
    }

    #[test]
    fn other_errors_exit_with_one() {
        assert_eq!(
            AppError::from(EngineError::NotFound("member".to_string())).exit_code(),
            1
        );
        assert_eq!(AppError::from(EngineError::Unauthorized).exit_code(), 1);
        assert_eq!(AppError::Terminal("closed".to_string()).exit_code(), 1);
    }
}
