use memchr::memchr2;

use crate::lexer::{QuoteEscape, Scanner};

impl Scanner {
    /// Remove every `--` and `/* */` comment from `input`.
    ///
    /// All other bytes keep their order and adjacency; nothing is inserted
    /// where a comment used to be. Quoted text is never treated as a comment.
    pub fn remove_comments(&self, input: &str) -> String {
        // No comment can start without one of these bytes.
        if memchr2(b'-', b'/', input.as_bytes()).is_none() {
            return input.to_string();
        }

        let mut result = String::with_capacity(input.len());
        for token in self.tokens(input) {
            if !token.is_comment() {
                result.push_str(token.text);
            }
        }
        result
    }

    /// Whether `input` contains at least one comment outside quotes.
    pub fn has_comments(&self, input: &str) -> bool {
        self.tokens(input).any(|token| token.is_comment())
    }
}

/// Remove comments from possibly absent SQL text. `None` stays `None`.
pub fn remove_comments(input: Option<&str>, escape: QuoteEscape) -> Option<String> {
    input.map(|sql| Scanner::new(escape).remove_comments(sql))
}
