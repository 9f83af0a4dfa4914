use memchr::{memchr, memchr2, memmem};

use crate::lexer::{LineCommentEnd, QuoteEscape};

/// Skip a string literal starting at position `i` (which must point to `'` or `"`).
///
/// Returns the position after the closing quote and whether a closing quote
/// was found. An unterminated literal runs to the end of input.
///
/// With `QuoteEscape::Backslash`, a backslash immediately followed by the
/// opening quote character consumes both as content. Any other backslash is
/// a plain character and is not re-examined.
pub(crate) fn skip_string_literal(bytes: &[u8], i: usize, escape: QuoteEscape) -> (usize, bool) {
    let quote = bytes[i];
    let mut j = i + 1;
    while j < bytes.len() {
        let found = match escape {
            QuoteEscape::Backslash => memchr2(quote, b'\\', &bytes[j..]),
            QuoteEscape::None => memchr(quote, &bytes[j..]),
        };
        let Some(offset) = found else {
            return (bytes.len(), false);
        };
        let end = j + offset;
        if bytes[end] == b'\\' {
            j = if bytes.get(end + 1) == Some(&quote) {
                end + 2
            } else {
                end + 1
            };
            continue;
        }
        return (end + 1, true);
    }
    (bytes.len(), false)
}

/// Skip a `--` comment starting at position `i`.
///
/// The comment ends at the first `\n` or `\r`. With `LineCommentEnd::Consume`
/// that character is part of the comment, with `Keep` it is left for the
/// caller. Without a line terminator the comment runs to end of input and is
/// reported as unterminated.
pub(crate) fn skip_line_comment(bytes: &[u8], i: usize, end_rule: LineCommentEnd) -> (usize, bool) {
    let body = i + 2;
    match memchr2(b'\n', b'\r', &bytes[body..]) {
        Some(offset) => {
            let newline = body + offset;
            match end_rule {
                LineCommentEnd::Consume => (newline + 1, true),
                LineCommentEnd::Keep => (newline, true),
            }
        }
        None => (bytes.len(), false),
    }
}

/// Skip a `/* ... */` comment starting at position `i`.
/// The opener's `*` never doubles as the closer's, so `/*/` stays open.
pub(crate) fn skip_block_comment(bytes: &[u8], i: usize) -> (usize, bool) {
    let body = i + 2;
    match memmem::find(&bytes[body..], b"*/") {
        Some(offset) => (body + offset + 2, true),
        None => (bytes.len(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_single_quoted_string() {
        let bytes = b"'hello' rest";
        let pos = skip_string_literal(bytes, 0, QuoteEscape::Backslash);
        assert_eq!(pos, (7, true), "Should return position after closing quote");
    }

    #[test]
    fn test_skip_double_quoted_string() {
        let bytes = b"\"world\" rest";
        let pos = skip_string_literal(bytes, 0, QuoteEscape::Backslash);
        assert_eq!(pos, (7, true));
    }

    #[test]
    fn test_skip_escaped_quote() {
        let bytes = b"'it\\'s' rest";
        assert_eq!(skip_string_literal(bytes, 0, QuoteEscape::Backslash), (7, true));
        // Without escaping the backslash is content and the quote closes.
        assert_eq!(skip_string_literal(bytes, 0, QuoteEscape::None), (5, true));
    }

    #[test]
    fn test_backslash_before_other_quote_kind_is_plain() {
        let bytes = b"'a\\\"b' rest";
        assert_eq!(skip_string_literal(bytes, 0, QuoteEscape::Backslash), (6, true));
    }

    #[test]
    fn test_double_backslash_escapes_following_quote() {
        // 'a\\' : the second backslash escapes the quote, literal stays open
        let bytes = b"'a\\\\' x";
        assert_eq!(
            skip_string_literal(bytes, 0, QuoteEscape::Backslash),
            (bytes.len(), false)
        );
        assert_eq!(skip_string_literal(bytes, 0, QuoteEscape::None), (5, true));
    }

    #[test]
    fn test_unterminated_literal() {
        let bytes = b"'abc; -- x";
        assert_eq!(
            skip_string_literal(bytes, 0, QuoteEscape::Backslash),
            (bytes.len(), false)
        );
    }

    #[test]
    fn test_trailing_backslash() {
        let bytes = b"'abc\\";
        assert_eq!(
            skip_string_literal(bytes, 0, QuoteEscape::Backslash),
            (bytes.len(), false)
        );
    }

    #[test]
    fn test_skip_line_comment() {
        let bytes = b"-- note\nselect";
        assert_eq!(skip_line_comment(bytes, 0, LineCommentEnd::Consume), (8, true));
        assert_eq!(skip_line_comment(bytes, 0, LineCommentEnd::Keep), (7, true));
    }

    #[test]
    fn test_line_comment_ends_at_carriage_return() {
        let bytes = b"--x\r\ny";
        assert_eq!(skip_line_comment(bytes, 0, LineCommentEnd::Consume), (4, true));
    }

    #[test]
    fn test_line_comment_to_eof() {
        let bytes = b"-- trailing";
        assert_eq!(
            skip_line_comment(bytes, 0, LineCommentEnd::Consume),
            (bytes.len(), false)
        );
    }

    #[test]
    fn test_skip_block_comment() {
        let bytes = b"/* a; b */ rest";
        assert_eq!(skip_block_comment(bytes, 0), (10, true));
        assert_eq!(skip_block_comment(b"/**/", 0), (4, true));
        assert_eq!(skip_block_comment(b"/*/ x", 0), (5, false));
    }
}
