use phf::phf_map;

use crate::error::SqlsplitError;
use crate::lexer::{LineCommentEnd, QuoteEscape, Scanner};

/// A SQL dialect, as far as script scanning is concerned.
pub trait Dialect: Send + Sync {
    fn name(&self) -> &'static str;

    /// How string literals treat a backslash before a quote.
    fn quote_escape(&self) -> QuoteEscape {
        QuoteEscape::Backslash
    }

    /// Whether the driver rejects line breaks inside a statement.
    fn strips_line_breaks(&self) -> bool {
        false
    }

    /// Create a scanner configured for this dialect.
    fn scanner(&self, line_comment_end: LineCommentEnd) -> Scanner {
        Scanner::new(self.quote_escape()).with_line_comment_end(line_comment_end)
    }

    /// Make a split statement ready to hand to the driver.
    fn prepare(&self, statement: &str) -> String {
        if self.strips_line_breaks() {
            statement.replace(['\r', '\n'], " ")
        } else {
            statement.to_string()
        }
    }
}

/// The default dialect. Backslash escapes quotes, as in MySQL, H2 and most
/// drivers with ANSI-like literals.
pub struct Generic;

impl Dialect for Generic {
    fn name(&self) -> &'static str {
        "generic"
    }
}

pub struct MySql;

impl Dialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }
}

pub struct PostgreSql;

impl Dialect for PostgreSql {
    fn name(&self) -> &'static str {
        "postgresql"
    }
}

/// Oracle: a backslash inside a literal is just a backslash.
pub struct Oracle;

impl Dialect for Oracle {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn quote_escape(&self) -> QuoteEscape {
        QuoteEscape::None
    }
}

/// DB2 drivers cannot handle line breaks in statements.
pub struct Db2;

impl Dialect for Db2 {
    fn name(&self) -> &'static str {
        "db2"
    }

    fn strips_line_breaks(&self) -> bool {
        true
    }
}

/// InterSystems Caché: same line-break restriction as DB2.
pub struct Cache;

impl Dialect for Cache {
    fn name(&self) -> &'static str {
        "cache"
    }

    fn strips_line_breaks(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy)]
enum DialectKind {
    Generic,
    MySql,
    PostgreSql,
    Oracle,
    Db2,
    Cache,
}

static DIALECT_ALIASES: phf::Map<&'static str, DialectKind> = phf_map! {
    "generic" => DialectKind::Generic,
    "ansi" => DialectKind::Generic,
    "h2" => DialectKind::Generic,
    "mysql" => DialectKind::MySql,
    "mariadb" => DialectKind::MySql,
    "postgresql" => DialectKind::PostgreSql,
    "postgres" => DialectKind::PostgreSql,
    "pg" => DialectKind::PostgreSql,
    "oracle" => DialectKind::Oracle,
    "oracle-rdb" => DialectKind::Oracle,
    "db2" => DialectKind::Db2,
    "as400" => DialectKind::Db2,
    "cache" => DialectKind::Cache,
    "intersystems" => DialectKind::Cache,
};

/// Create a dialect from a string name.
pub fn dialect_from_name(name: &str) -> Result<Box<dyn Dialect>, SqlsplitError> {
    let kind = DIALECT_ALIASES
        .get(name.to_ascii_lowercase().as_str())
        .copied()
        .ok_or_else(|| SqlsplitError::Config(format!("Unknown dialect: {}", name)))?;

    let dialect: Box<dyn Dialect> = match kind {
        DialectKind::Generic => Box::new(Generic),
        DialectKind::MySql => Box::new(MySql),
        DialectKind::PostgreSql => Box::new(PostgreSql),
        DialectKind::Oracle => Box::new(Oracle),
        DialectKind::Db2 => Box::new(Db2),
        DialectKind::Cache => Box::new(Cache),
    };
    Ok(dialect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic() {
        let dialect = Generic;
        assert_eq!(dialect.quote_escape(), QuoteEscape::Backslash);
        assert!(!dialect.strips_line_breaks());
    }

    #[test]
    fn test_oracle_dialect() {
        let dialect = Oracle;
        assert_eq!(dialect.quote_escape(), QuoteEscape::None);
        assert_eq!(dialect.scanner(LineCommentEnd::Consume), Scanner::ORACLE);
    }

    #[test]
    fn test_dialect_from_name() {
        assert_eq!(dialect_from_name("generic").unwrap().name(), "generic");
        assert_eq!(dialect_from_name("Postgres").unwrap().name(), "postgresql");
        assert_eq!(dialect_from_name("ORACLE").unwrap().name(), "oracle");
        assert_eq!(dialect_from_name("mariadb").unwrap().name(), "mysql");
        assert!(dialect_from_name("unknown").is_err());
    }

    #[test]
    fn test_scanner_line_comment_end() {
        let scanner = Generic.scanner(LineCommentEnd::Keep);
        assert_eq!(scanner.line_comment_end(), LineCommentEnd::Keep);
        assert_eq!(scanner.quote_escape(), QuoteEscape::Backslash);
    }

    #[test]
    fn test_prepare_strips_line_breaks() {
        assert_eq!(Db2.prepare("SELECT 1\r\nFROM t"), "SELECT 1  FROM t");
        assert_eq!(Cache.prepare("a\nb"), "a b");
        assert_eq!(Generic.prepare("a\nb"), "a\nb");
    }
}
