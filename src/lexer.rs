use log::trace;

use crate::error::SqlsplitError;
use crate::string_utils::{skip_block_comment, skip_line_comment, skip_string_literal};
use crate::token::{Classified, LexMode, Pos, Token, TokenKind};

/// String-literal escaping rule of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuoteEscape {
    /// `\` directly before the open quote character keeps the literal open.
    #[default]
    Backslash,
    /// Oracle style: backslash has no escaping role.
    None,
}

impl From<bool> for QuoteEscape {
    fn from(backslash_escapes: bool) -> Self {
        if backslash_escapes {
            Self::Backslash
        } else {
            Self::None
        }
    }
}

/// What happens to the line break that ends a `--` comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineCommentEnd {
    /// The line break is a comment byte and is removed with the comment.
    #[default]
    Consume,
    /// Legacy behavior: the line break survives as ordinary text.
    Keep,
}

impl LineCommentEnd {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "consume" => Some(Self::Consume),
            "keep" => Some(Self::Keep),
            _ => None,
        }
    }
}

/// Single-pass lexical scanner over SQL text.
///
/// A `Scanner` holds configuration only. Every call owns its own scan state,
/// so one value can be shared freely between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scanner {
    quote_escape: QuoteEscape,
    line_comment_end: LineCommentEnd,
}

impl Scanner {
    /// Backslash escapes quotes.
    pub const ANSI: Scanner = Scanner::new(QuoteEscape::Backslash);
    /// Backslash is plain text inside literals.
    pub const ORACLE: Scanner = Scanner::new(QuoteEscape::None);

    pub const fn new(quote_escape: QuoteEscape) -> Self {
        Self {
            quote_escape,
            line_comment_end: LineCommentEnd::Consume,
        }
    }

    pub const fn with_line_comment_end(self, line_comment_end: LineCommentEnd) -> Self {
        Self {
            quote_escape: self.quote_escape,
            line_comment_end,
        }
    }

    pub fn quote_escape(&self) -> QuoteEscape {
        self.quote_escape
    }

    pub fn line_comment_end(&self) -> LineCommentEnd {
        self.line_comment_end
    }

    /// Iterate over the lexical runs of `input`.
    pub fn tokens<'a>(&self, input: &'a str) -> Tokens<'a> {
        Tokens {
            input,
            pos: 0,
            quote_escape: self.quote_escape,
            line_comment_end: self.line_comment_end,
        }
    }

    /// Classify every character of `input`.
    pub fn scan<'a>(&self, input: &'a str) -> impl Iterator<Item = Classified> + 'a {
        self.tokens(input).flat_map(|token| {
            let mode = token.kind.mode();
            let is_comment = token.is_comment();
            token.text.char_indices().map(move |(offset, ch)| Classified {
                pos: token.start + offset,
                ch,
                mode,
                is_comment,
            })
        })
    }

    /// The mode still active once all of `input` has been consumed.
    pub fn final_mode(&self, input: &str) -> LexMode {
        match self.tokens(input).last() {
            Some(token) if !token.terminated => token.kind.mode(),
            _ => LexMode::Normal,
        }
    }

    /// Fail if `input` ends inside a string literal or block comment.
    ///
    /// A line comment running to end of input is closed by the end of input
    /// and is accepted.
    pub fn validate(&self, input: &str) -> Result<(), SqlsplitError> {
        let mut count = 0usize;
        let mut last = None;
        for token in self.tokens(input) {
            count += 1;
            last = Some(token);
        }
        trace!("scanned {} tokens over {} bytes", count, input.len());

        match last {
            Some(token) if !token.terminated && token.kind != TokenKind::LineComment => {
                Err(SqlsplitError::Unterminated {
                    mode: token.kind.mode(),
                    position: token.start,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Iterator over the tokens of one input. Holds the whole scan state.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    input: &'a str,
    pos: Pos,
    quote_escape: QuoteEscape,
    line_comment_end: LineCommentEnd,
}

impl<'a> Tokens<'a> {
    /// End of the top-level code run starting at `start`.
    fn code_run_end(&self, start: Pos) -> Pos {
        let bytes = self.input.as_bytes();
        let mut j = start + 1;
        while j < bytes.len() {
            match bytes[j] {
                b'\'' | b'"' | b';' => return j,
                b'-' if bytes.get(j + 1) == Some(&b'-') => return j,
                b'/' if bytes.get(j + 1) == Some(&b'*') => return j,
                _ => j += 1,
            }
        }
        bytes.len()
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let bytes = self.input.as_bytes();
        let start = self.pos;
        if start >= bytes.len() {
            return None;
        }

        let (kind, end, terminated) = match (bytes[start], bytes.get(start + 1).copied()) {
            (b'-', Some(b'-')) => {
                let (end, closed) = skip_line_comment(bytes, start, self.line_comment_end);
                (TokenKind::LineComment, end, closed)
            }
            (b'/', Some(b'*')) => {
                let (end, closed) = skip_block_comment(bytes, start);
                (TokenKind::BlockComment, end, closed)
            }
            (b'\'', _) => {
                let (end, closed) = skip_string_literal(bytes, start, self.quote_escape);
                (TokenKind::SingleQuoted, end, closed)
            }
            (b'"', _) => {
                let (end, closed) = skip_string_literal(bytes, start, self.quote_escape);
                (TokenKind::DoubleQuoted, end, closed)
            }
            (b';', _) => (TokenKind::Terminator, start + 1, true),
            _ => (TokenKind::Code, self.code_run_end(start), true),
        };

        self.pos = end;
        Some(Token::new(kind, &self.input[start..end], start, terminated))
    }
}
