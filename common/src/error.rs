//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No match for '{pattern}' in {subject}")]
    NoMatch { subject: String, pattern: String },

    #[error("Ambiguous match for '{pattern}' in {subject}: {count} candidates")]
    AmbiguousMatch {
        subject: String,
        pattern: String,
        count: usize,
    },

    #[error("Value not set: {field}")]
    UnsetValue { field: String },

    #[error("Missing field '{field}' on {entity}")]
    MissingField { entity: String, field: String },

    #[error("Could not find a free name for '{name}' after {attempts} attempts")]
    CollisionExhausted { name: String, attempts: usize },

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
