use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::error::SqlsplitError;
use crate::lexer::LineCommentEnd;
use crate::settings::Settings;

const CONFIG_FILE_NAME: &str = "sqlsplit.toml";

/// Keys accepted in `sqlsplit.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    dialect: Option<String>,
    line_comment_end: Option<String>,
    strict: Option<bool>,
    exclude: Option<Vec<String>>,
}

/// Load sqlsplit configuration from a `sqlsplit.toml` file.
///
/// An explicit path wins. Otherwise parent directories of the inputs are
/// searched, then the user's config directory.
pub fn load_config(files: &[PathBuf], config_path: Option<&Path>) -> Result<Settings, SqlsplitError> {
    let mut settings = Settings::default();

    let config_file = match config_path {
        Some(path) => {
            if path.exists() {
                Some(path.to_path_buf())
            } else {
                return Err(SqlsplitError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
        }
        None => find_config_file(files).or_else(user_config_file),
    };

    if let Some(path) = config_file {
        debug!("loading config from {}", path.display());
        let raw = load_config_from_path(&path)?;
        apply_config(&mut settings, raw)?;
    }

    Ok(settings)
}

/// Search for a sqlsplit.toml in the common parent directories of the given files.
fn find_config_file(files: &[PathBuf]) -> Option<PathBuf> {
    get_common_parents(files)
        .into_iter()
        .map(|parent| parent.join(CONFIG_FILE_NAME))
        .find(|config| config.exists())
}

/// `<config dir>/sqlsplit/sqlsplit.toml`, if present.
fn user_config_file() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("sqlsplit").join(CONFIG_FILE_NAME);
    path.exists().then_some(path)
}

/// Get the common parent directories of the given file paths, ordered
/// from most specific to least specific.
fn get_common_parents(files: &[PathBuf]) -> Vec<PathBuf> {
    let mut parents = Vec::new();

    for file in files {
        let parent = if file.is_dir() {
            file.clone()
        } else {
            file.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        };

        // Walk up to root
        let mut current = Some(parent.as_path());
        while let Some(dir) = current {
            let dir_buf = dir.to_path_buf();
            if !parents.contains(&dir_buf) {
                parents.push(dir_buf);
            }
            current = dir.parent();
        }
    }

    parents
}

/// Load and parse a TOML config file.
fn load_config_from_path(path: &Path) -> Result<FileConfig, SqlsplitError> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply configuration values to Settings.
fn apply_config(settings: &mut Settings, config: FileConfig) -> Result<(), SqlsplitError> {
    if let Some(dialect) = config.dialect {
        settings.dialect_name = dialect;
        // Fail early rather than on the first file.
        settings.dialect()?;
    }

    if let Some(name) = config.line_comment_end {
        let end = LineCommentEnd::from_name(&name).ok_or_else(|| {
            SqlsplitError::Config(format!(
                "Invalid line_comment_end: {} (expected \"consume\" or \"keep\")",
                name
            ))
        })?;
        settings.keep_newlines = end == LineCommentEnd::Keep;
    }

    if let Some(strict) = config.strict {
        settings.strict = strict;
    }

    if let Some(exclude) = config.exclude {
        settings.exclude = exclude;
    }

    Ok(())
}
