//! Block comments
//!
//! A `/* ... */` comment is only recognized where a statement may start. It
//! is drained into the buffer without moving the token start, so its whole
//! text stays available across refills, then copied into the output tree as
//! a comment node at the builder's cursor.

use super::error::LexError;
use super::input::InputBuffer;

/// Does a comment open at `pos`?
pub fn is_comment_start(input: &InputBuffer<'_>, pos: usize) -> bool {
    input.byte(pos) == Some(b'/') && input.byte(pos + 1) == Some(b'*')
}

/// Advance `cur` from the opening `/*` to just past the closing `*/`,
/// refilling as needed. `start` is left on the opening slash.
pub fn drain_comment(input: &mut InputBuffer<'_>) -> Result<(), LexError> {
    input.cur += 2;

    loop {
        match memchr::memchr(b'*', input.remaining()) {
            Some(offset) => {
                let star = input.cur + offset;
                match input.byte(star + 1) {
                    Some(b'/') => {
                        input.cur = star + 2;
                        return Ok(());
                    }
                    Some(_) => {
                        input.cur = star + 1;
                        continue;
                    }
                    // The star is the last buffered byte; read more before
                    // deciding.
                    None => input.cur = star,
                }
            }
            None => input.cur = input.len(),
        }

        if input.is_eof() {
            return Err(LexError::UnterminatedComment { line: input.line() });
        }
        input.fill(true)?;
    }
}

/// The comment text between `start` and `cur`, ready for the tree.
///
/// One run of spaces and tabs is trimmed from each end, stopping at a
/// newline, and the remainder is padded with a single space on each side.
/// An empty comment yields `None`.
pub fn comment_body(input: &InputBuffer<'_>) -> Option<String> {
    let mut from = input.start + 2;
    let mut to = input.cur.saturating_sub(2).max(from);

    while from < to && is_blank(input.byte(from)) {
        from += 1;
    }
    while to > from && is_blank(input.byte(to - 1)) {
        to -= 1;
    }

    if from == to {
        return None;
    }
    Some(format!(" {} ", input.text(from, to)))
}

fn is_blank(ch: Option<u8>) -> bool {
    matches!(ch, Some(ch) if ch != b'\n' && ch.is_ascii_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slax::lexing::input::InputOptions;
    use std::io::Cursor;

    fn drained(text: &str) -> Option<String> {
        let mut input = InputBuffer::from_text(text);
        drain_comment(&mut input).unwrap();
        comment_body(&input)
    }

    #[test]
    fn test_body_is_trimmed_and_padded() {
        assert_eq!(drained("/*   hello world  */").as_deref(), Some(" hello world "));
        assert_eq!(drained("/*x*/").as_deref(), Some(" x "));
    }

    #[test]
    fn test_empty_comment_has_no_body() {
        assert_eq!(drained("/**/"), None);
        assert_eq!(drained("/*    */"), None);
    }

    #[test]
    fn test_trim_stops_at_newline() {
        assert_eq!(drained("/*\n  text\n*/").as_deref(), Some(" \n  text\n "));
    }

    #[test]
    fn test_stars_inside_comment() {
        assert_eq!(drained("/** a * b **/").as_deref(), Some(" * a * b * "));
    }

    #[test]
    fn test_comment_spanning_refills() {
        let source = "/* first line\n second line\n third */ after";
        let mut input = InputBuffer::new(Cursor::new(source), InputOptions::new(8, 2, 8));
        input.fill(true).unwrap();

        drain_comment(&mut input).unwrap();
        assert_eq!(
            comment_body(&input).as_deref(),
            Some(" first line\n second line\n third ")
        );
        assert_eq!(input.line(), 2);
    }

    #[test]
    fn test_unterminated_comment_is_fatal() {
        let mut input = InputBuffer::from_text("/* never closed *");
        let err = drain_comment(&mut input).unwrap_err();
        assert!(matches!(err, LexError::UnterminatedComment { .. }));
    }
}
