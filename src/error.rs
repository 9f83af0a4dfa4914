use thiserror::Error;

use crate::token::LexMode;

/// User-facing errors.
///
/// Scanning never fails on its own; these come from strict validation,
/// configuration and file handling.
#[derive(Error, Debug)]
pub enum SqlsplitError {
    #[error("sqlsplit config error: {0}")]
    Config(String),

    #[error("sqlsplit unterminated {mode} starting at byte {position}")]
    Unterminated { mode: LexMode, position: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SqlsplitError>;
