use std::fmt;

/// Position in source string (byte offset).
pub type Pos = usize;

/// Lexical context active at a given input position.
///
/// Exactly one mode is active at a time. Modes never nest: comment modes
/// swallow quote characters and quote modes swallow comment openers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LexMode {
    #[default]
    Normal,
    SingleQuote,
    DoubleQuote,
    LineComment,
    BlockComment,
}

impl LexMode {
    pub fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }

    pub fn is_quote(self) -> bool {
        matches!(self, Self::SingleQuote | Self::DoubleQuote)
    }
}

impl fmt::Display for LexMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "code",
            Self::SingleQuote => "single-quoted string",
            Self::DoubleQuote => "double-quoted string",
            Self::LineComment => "line comment",
            Self::BlockComment => "block comment",
        };
        f.write_str(name)
    }
}

/// Kinds of runs produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Top-level text with no special meaning. Never contains `;`.
    Code,
    /// A single top-level `;`.
    Terminator,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment,
}

impl TokenKind {
    /// The lexical mode every character of this token belongs to.
    pub fn mode(self) -> LexMode {
        match self {
            Self::Code | Self::Terminator => LexMode::Normal,
            Self::SingleQuoted => LexMode::SingleQuote,
            Self::DoubleQuoted => LexMode::DoubleQuote,
            Self::LineComment => LexMode::LineComment,
            Self::BlockComment => LexMode::BlockComment,
        }
    }

    pub fn is_comment(self) -> bool {
        self.mode().is_comment()
    }
}

/// A maximal run of input sharing one lexical category.
///
/// `text` borrows from the scanned input; concatenating the text of every
/// token yields the input unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: Pos,
    /// False only for a quote or comment still open at end of input.
    pub terminated: bool,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, start: Pos, terminated: bool) -> Self {
        Self {
            kind,
            text,
            start,
            terminated,
        }
    }

    pub fn end(&self) -> Pos {
        self.start + self.text.len()
    }

    pub fn is_comment(&self) -> bool {
        self.kind.is_comment()
    }
}

/// Classification of a single input character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified {
    pub pos: Pos,
    pub ch: char,
    pub mode: LexMode,
    pub is_comment: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_modes() {
        assert_eq!(TokenKind::Code.mode(), LexMode::Normal);
        assert_eq!(TokenKind::Terminator.mode(), LexMode::Normal);
        assert_eq!(TokenKind::DoubleQuoted.mode(), LexMode::DoubleQuote);
        assert!(TokenKind::BlockComment.is_comment());
        assert!(!TokenKind::SingleQuoted.is_comment());
    }

    #[test]
    fn test_token_end() {
        let t = Token::new(TokenKind::Code, "select", 4, true);
        assert_eq!(t.end(), 10);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(LexMode::BlockComment.to_string(), "block comment");
        assert_eq!(LexMode::SingleQuote.to_string(), "single-quoted string");
    }
}
