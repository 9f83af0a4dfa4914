use crate::dialect::{self, Dialect};
use crate::error::SqlsplitError;
use crate::lexer::{LineCommentEnd, Scanner};

/// Settings holds all splitting configuration for sqlsplit.
#[derive(Debug, Clone)]
pub struct Settings {
    pub dialect_name: String,

    /// Keep the line break that ends a `--` comment.
    pub keep_newlines: bool,

    /// Fail on input that ends inside a quote or block comment.
    pub strict: bool,

    /// Print comment-free text instead of statements.
    pub strip: bool,

    /// Report files that contain comments without printing them.
    pub check: bool,

    pub diff: bool,

    /// Glob patterns to exclude.
    pub exclude: Vec<String>,

    pub verbose: bool,

    pub quiet: bool,

    pub no_progressbar: bool,

    pub no_color: bool,

    pub force_color: bool,

    /// Number of threads for parallel processing (0 = all cores).
    pub threads: usize,

    pub single_process: bool,
}

fn default_dialect() -> String {
    "generic".to_string()
}

impl Settings {
    /// Create the dialect for the configured dialect_name.
    pub fn dialect(&self) -> Result<Box<dyn Dialect>, SqlsplitError> {
        dialect::dialect_from_name(&self.dialect_name)
    }

    pub fn line_comment_end(&self) -> LineCommentEnd {
        if self.keep_newlines {
            LineCommentEnd::Keep
        } else {
            LineCommentEnd::Consume
        }
    }

    /// Scanner for the configured dialect and line-comment rule.
    pub fn scanner(&self) -> Result<Scanner, SqlsplitError> {
        Ok(self.dialect()?.scanner(self.line_comment_end()))
    }

    /// Whether color output is enabled.
    pub fn color(&self) -> bool {
        if self.force_color {
            return true;
        }
        if self.no_color {
            return false;
        }
        if std::env::var("NO_COLOR").is_ok() {
            return false;
        }
        true
    }

    /// Whether file contents are echoed to stdout.
    pub fn prints_output(&self) -> bool {
        !self.check && !self.diff
    }

    /// SQL file extensions to process.
    pub fn sql_extensions(&self) -> &[&str] {
        &["sql", "ddl", "dml", "pls", "pks", "pkb"]
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dialect_name: default_dialect(),
            keep_newlines: false,
            strict: false,
            strip: false,
            check: false,
            diff: false,
            exclude: Vec::new(),
            verbose: false,
            quiet: false,
            no_progressbar: false,
            no_color: false,
            force_color: false,
            threads: 0,
            single_process: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.dialect_name, "generic");
        assert!(!settings.strict);
        assert!(!settings.check);
        assert_eq!(settings.line_comment_end(), LineCommentEnd::Consume);
    }

    #[test]
    fn test_scanner_creation() {
        let settings = Settings::default();
        assert_eq!(settings.scanner().unwrap(), Scanner::ANSI);

        let oracle = Settings {
            dialect_name: "oracle".to_string(),
            keep_newlines: true,
            ..Settings::default()
        };
        assert_eq!(
            oracle.scanner().unwrap(),
            Scanner::ORACLE.with_line_comment_end(LineCommentEnd::Keep)
        );

        let bad = Settings {
            dialect_name: "nope".to_string(),
            ..Settings::default()
        };
        assert!(bad.scanner().is_err());
    }

    #[test]
    fn test_color_logic() {
        let mut settings = Settings {
            force_color: true,
            ..Settings::default()
        };
        assert!(settings.color());

        settings.no_color = true;
        assert!(settings.color()); // force_color overrides no_color

        settings.force_color = false;
        assert!(!settings.color());
    }

    #[test]
    fn test_prints_output() {
        let mut settings = Settings::default();
        assert!(settings.prints_output());

        settings.diff = true;
        assert!(!settings.prints_output());
    }
}
