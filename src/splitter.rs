use std::ops::Range;

use compact_str::CompactString;
use log::trace;
use smallvec::SmallVec;

use crate::lexer::{QuoteEscape, Scanner};
use crate::token::{Pos, TokenKind};

/// Whether a statement returns rows or is executed for its effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// Begins with the `SELECT` keyword.
    Query,
    /// Anything else: DML, DDL, procedure calls.
    Command,
}

impl StatementKind {
    /// `Query` when `text` begins with `SELECT` or `SHOW` as a whole word,
    /// ignoring ASCII case.
    pub fn of(text: &str) -> Self {
        if ["select", "show"]
            .iter()
            .any(|keyword| starts_with_keyword(text, keyword))
        {
            Self::Query
        } else {
            Self::Command
        }
    }
}

fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= keyword.len()
        && bytes[..keyword.len()].eq_ignore_ascii_case(keyword.as_bytes())
        && bytes
            .get(keyword.len())
            .map_or(true, |b| !(b.is_ascii_alphanumeric() || *b == b'_'))
}

/// One statement of a split script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Zero-based position in the script.
    pub index: usize,
    /// Statement text without comments, trimmed, without its terminator.
    pub text: CompactString,
    pub kind: StatementKind,
    /// Bytes of the script from the first to the last non-blank character
    /// kept in `text`. Comments inside the statement fall within it.
    pub span: Range<Pos>,
}

impl Statement {
    pub fn new(index: usize, text: &str, span: Range<Pos>) -> Self {
        Self {
            index,
            text: CompactString::new(text),
            kind: StatementKind::of(text),
            span,
        }
    }

    pub fn is_query(&self) -> bool {
        self.kind == StatementKind::Query
    }
}

/// Byte ranges of the input making up the statement being collected.
/// Adjacent ranges are merged, so a comment-free statement is one range.
#[derive(Debug, Default)]
struct Segment {
    pieces: SmallVec<[Range<Pos>; 4]>,
}

impl Segment {
    fn push(&mut self, range: Range<Pos>) {
        match self.pieces.last_mut() {
            Some(last) if last.end == range.start => last.end = range.end,
            _ => self.pieces.push(range),
        }
    }

    /// Trimmed extent of the kept text, `None` when it is all blank.
    fn span(&self, source: &str) -> Option<Range<Pos>> {
        let start = self.pieces.iter().find_map(|r| {
            source[r.clone()]
                .find(|c: char| !c.is_whitespace())
                .map(|i| r.start + i)
        })?;
        let end = self.pieces.iter().rev().find_map(|r| {
            let kept = source[r.clone()].trim_end();
            (!kept.is_empty()).then_some(r.start + kept.len())
        })?;
        Some(start..end)
    }

    /// Close the segment, handing its trimmed text and span to `emit` when
    /// non-blank.
    fn flush(&mut self, source: &str, mut emit: impl FnMut(&str, Range<Pos>)) {
        if let Some(span) = self.span(source) {
            if let [_] = self.pieces.as_slice() {
                emit(&source[span.clone()], span);
            } else {
                let joined: String = self.pieces.iter().map(|r| &source[r.clone()]).collect();
                emit(joined.trim(), span);
            }
        }
        self.pieces.clear();
    }
}

impl Scanner {
    /// Split `script` on top-level `;` into trimmed, comment-free statements.
    ///
    /// Blank segments are dropped. A quote left open at the end keeps the
    /// rest of the script inside the final statement.
    pub fn split(&self, script: &str) -> Vec<String> {
        let mut result = Vec::new();
        self.for_each_statement(script, |text, _| result.push(text.to_string()));
        result
    }

    /// Like [`Scanner::split`], also classifying each statement.
    pub fn statements(&self, script: &str) -> Vec<Statement> {
        let mut result = Vec::new();
        self.for_each_statement(script, |text, span| {
            let index = result.len();
            result.push(Statement::new(index, text, span));
        });
        result
    }

    fn for_each_statement(&self, script: &str, mut emit: impl FnMut(&str, Range<Pos>)) {
        let mut segment = Segment::default();
        let mut terminators = 0usize;

        for token in self.tokens(script) {
            match token.kind {
                TokenKind::Terminator => {
                    terminators += 1;
                    segment.flush(script, &mut emit);
                }
                TokenKind::LineComment | TokenKind::BlockComment => {}
                TokenKind::Code | TokenKind::SingleQuoted | TokenKind::DoubleQuoted => {
                    segment.push(token.start..token.end());
                }
            }
        }
        segment.flush(script, &mut emit);

        trace!(
            "split {} bytes at {} top-level terminators",
            script.len(),
            terminators
        );
    }
}

/// Split a possibly absent script. `None` yields no statements.
pub fn split(script: Option<&str>, escape: QuoteEscape) -> Vec<String> {
    script.map_or_else(Vec::new, |sql| Scanner::new(escape).split(sql))
}
