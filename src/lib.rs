pub mod api;
pub mod comment;
pub mod config;
pub mod dialect;
pub mod error;
pub mod lexer;
pub mod report;
pub mod settings;
pub mod splitter;
mod string_utils;
pub mod token;

// Re-export the main public API
pub use api::{get_matching_paths, run, split_string, strip_string};
pub use comment::remove_comments;
pub use config::load_config;
pub use error::{Result, SqlsplitError};
pub use lexer::{LineCommentEnd, QuoteEscape, Scanner};
pub use settings::Settings;
pub use splitter::{split, Statement, StatementKind};
pub use token::{Classified, LexMode, Token, TokenKind};
