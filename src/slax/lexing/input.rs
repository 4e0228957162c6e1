//! Streaming input buffer
//!
//! Source text is read one line-bounded chunk at a time into a byte buffer.
//! The buffer keeps two cursors: `start`, the first byte of the token being
//! recognized, and `cur`, the next unread byte. Everything before `start` is
//! dead and may be discarded by shifting the live region to the front;
//! everything from `start` on must be preserved across refills, which is
//! what lets a token (or a comment) span several reads.
//!
//! Refills stop at a "final" byte (`;` or whitespace) when asked to, so a
//! token is never split by a read boundary. Quoted strings cross boundaries
//! and refill without that requirement, then settle the buffer back onto a
//! final byte once the closing quote is found.

use std::io::BufRead;

use super::error::LexError;
use crate::slax::trace::lex_trace;

/// Buffer sizing knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputOptions {
    /// Capacity allocated before the first read
    pub initial_size: usize,
    /// Minimum free space kept available before each read
    pub fudge: usize,
    /// Growth step when shifting cannot make enough room
    pub increment: usize,
}

impl InputOptions {
    /// Build options, clamping them to values the refill loop can make
    /// progress with.
    pub fn new(initial_size: usize, fudge: usize, increment: usize) -> Self {
        let fudge = fudge.max(1);
        Self {
            initial_size: initial_size.max(fudge + 1),
            fudge,
            increment: increment.max(1),
        }
    }
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            initial_size: 8192,
            fudge: 1024,
            increment: 8192,
        }
    }
}

/// Outcome of a refill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// There are unread bytes at `cur`
    Ready,
    /// The source is exhausted and nothing is left past `cur`
    Exhausted,
}

pub struct InputBuffer<'a> {
    buf: Vec<u8>,
    len: usize,
    pub(crate) start: usize,
    pub(crate) cur: usize,
    line: usize,
    // Newlines in buf[..counted], plus those in bytes already compacted away
    newlines: usize,
    counted: usize,
    eof: bool,
    reads: usize,
    source: Option<Box<dyn BufRead + 'a>>,
    options: InputOptions,
}

impl<'a> InputBuffer<'a> {
    /// A buffer fed from `source`. Nothing is read until the first fill.
    pub fn new(source: impl BufRead + 'a, options: InputOptions) -> Self {
        let options = InputOptions::new(options.initial_size, options.fudge, options.increment);
        Self {
            buf: vec![0; options.initial_size],
            len: 0,
            start: 0,
            cur: 0,
            line: 0,
            newlines: 0,
            counted: 0,
            eof: false,
            reads: 0,
            source: Some(Box::new(source)),
            options,
        }
    }

    /// A buffer preloaded with a complete expression. Refills never read.
    pub fn from_text(text: &str) -> InputBuffer<'static> {
        let bytes = text.as_bytes().to_vec();
        InputBuffer {
            len: bytes.len(),
            buf: bytes,
            start: 0,
            cur: 0,
            line: 1,
            newlines: 0,
            counted: 0,
            eof: true,
            reads: 0,
            source: None,
            options: InputOptions::default(),
        }
    }

    /// Read more input.
    ///
    /// With `require_final`, keeps reading until the last buffered byte is
    /// `;` or whitespace (or the source ends). Without it, returns after the
    /// first successful read. In expression mode there is nothing to read and
    /// this only reports whether unread bytes remain.
    pub fn fill(&mut self, require_final: bool) -> Result<Fill, LexError> {
        if self.source.is_none() {
            return Ok(self.status());
        }

        loop {
            self.make_room()?;

            let read = if self.eof { 0 } else { self.read_chunk()? };
            if read == 0 {
                if !self.eof {
                    lex_trace!(line = self.line, "end of input");
                    self.eof = true;
                }
                return Ok(self.status());
            }

            let last = self.buf[self.len - 1];
            if last == b'\n' {
                self.line += 1;
            }
            if !require_final || is_final(last) {
                return Ok(Fill::Ready);
            }
        }
    }

    /// Read on until the buffered data ends on a final byte again.
    ///
    /// A refill without `require_final` may stop inside the word after a
    /// quoted string; the next token must not be cut at that point.
    pub fn settle(&mut self) -> Result<(), LexError> {
        if self.is_eof() || self.len == 0 || is_final(self.buf[self.len - 1]) {
            return Ok(());
        }
        self.fill(true)?;
        Ok(())
    }

    fn status(&self) -> Fill {
        if self.cur < self.len {
            Fill::Ready
        } else {
            Fill::Exhausted
        }
    }

    /// Guarantee at least `fudge` free bytes past the buffered data, shifting
    /// the live region down when enough dead space has piled up in front of
    /// it and growing the buffer otherwise.
    fn make_room(&mut self) -> Result<(), LexError> {
        let fudge = self.options.fudge;
        while self.len + fudge > self.buf.len() {
            if self.start > fudge {
                self.compact();
            } else {
                self.grow()?;
            }
        }
        Ok(())
    }

    fn compact(&mut self) {
        let shift = self.start;
        self.count_newlines_to(shift);
        self.counted -= shift;
        self.buf.copy_within(shift..self.len, 0);
        self.len -= shift;
        self.cur -= shift;
        self.start = 0;
        lex_trace!(shift, "input buffer compacted");
    }

    fn grow(&mut self) -> Result<(), LexError> {
        let increment = self.options.increment;
        let requested = self.buf.len() + increment;
        self.buf
            .try_reserve_exact(increment)
            .map_err(|_| LexError::OutOfMemory { requested })?;
        self.buf.resize(requested, 0);
        lex_trace!(size = requested, "input buffer grown");
        Ok(())
    }

    /// Copy one chunk from the source into the free space, stopping after the
    /// first newline. Returns the number of bytes taken.
    fn read_chunk(&mut self) -> Result<usize, LexError> {
        let line = self.line;
        let Some(source) = self.source.as_mut() else {
            return Ok(0);
        };

        let available = source
            .fill_buf()
            .map_err(|source| LexError::Io { line, source })?;
        if available.is_empty() {
            return Ok(0);
        }

        let room = self.buf.len() - self.len;
        let window = &available[..available.len().min(room)];
        let take = match memchr::memchr(b'\n', window) {
            Some(newline) => newline + 1,
            None => window.len(),
        };
        self.buf[self.len..self.len + take].copy_from_slice(&window[..take]);
        source.consume(take);

        self.len += take;
        self.reads += 1;
        Ok(take)
    }

    /// Count of completed source lines read so far.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Line of the byte at `start`, counting from 1. Independent of how the
    /// source was split into reads.
    pub fn start_line(&mut self) -> usize {
        self.count_newlines_to(self.start) + 1
    }

    fn count_newlines_to(&mut self, pos: usize) -> usize {
        let pos = pos.min(self.len);
        if pos > self.counted {
            self.newlines += memchr::memchr_iter(b'\n', &self.buf[self.counted..pos]).count();
            self.counted = pos;
        }
        self.newlines
    }

    /// Number of buffered bytes (dead prefix included).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Has the source reported end of input? Always true in expression mode.
    pub fn is_eof(&self) -> bool {
        self.eof || self.source.is_none()
    }

    /// Number of successful reads from the source.
    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn byte(&self, pos: usize) -> Option<u8> {
        if pos < self.len {
            Some(self.buf[pos])
        } else {
            None
        }
    }

    /// The unread bytes from `cur` to the end of buffered data.
    pub fn remaining(&self) -> &[u8] {
        &self.buf[self.cur.min(self.len)..self.len]
    }

    /// Advance `cur` past whitespace in the buffered data.
    pub fn skip_whitespace(&mut self) {
        while let Some(ch) = self.byte(self.cur) {
            if !ch.is_ascii_whitespace() {
                break;
            }
            self.cur += 1;
        }
    }

    /// Does `word` appear at `pos`, followed by something that cannot
    /// continue a name (or by the end of buffered data)?
    pub fn word_at(&self, pos: usize, word: &str) -> bool {
        let word = word.as_bytes();
        let end = pos + word.len();
        if end > self.len || &self.buf[pos..end] != word {
            return false;
        }
        !self.byte(end).is_some_and(is_bare)
    }

    /// Keep reading while the name at `start` and the whitespace after it run
    /// to the end of buffered data, so the lookahead for `(` sees the next
    /// non-blank byte.
    pub fn buffer_past_name(&mut self) -> Result<(), LexError> {
        loop {
            let mut pos = self.start;
            while self.byte(pos).is_some_and(is_bare) {
                pos += 1;
            }
            while self.byte(pos).is_some_and(|ch| ch.is_ascii_whitespace()) {
                pos += 1;
            }
            if pos < self.len || self.is_eof() {
                return Ok(());
            }
            self.fill(true)?;
        }
    }

    /// Is the next non-whitespace byte at or after `pos` an open paren?
    pub fn paren_follows(&self, pos: usize) -> bool {
        let mut pos = pos;
        while let Some(ch) = self.byte(pos) {
            if ch == b'(' {
                return true;
            }
            if !ch.is_ascii_whitespace() {
                return false;
            }
            pos += 1;
        }
        false
    }

    /// Like [`paren_follows`](Self::paren_follows), but only spaces and tabs
    /// may come in between.
    pub fn paren_follows_on_line(&self, pos: usize) -> bool {
        let mut pos = pos;
        while let Some(ch) = self.byte(pos) {
            match ch {
                b'(' => return true,
                b' ' | b'\t' => pos += 1,
                _ => return false,
            }
        }
        false
    }

    /// Text between two positions.
    pub fn text(&self, from: usize, to: usize) -> String {
        let to = to.min(self.len);
        let from = from.min(to);
        String::from_utf8_lossy(&self.buf[from..to]).into_owned()
    }

    /// Text of the token currently being recognized.
    pub fn token_text(&self) -> String {
        self.text(self.start, self.cur)
    }
}

/// Can this byte appear in a bare name?
pub fn is_bare(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, b':' | b'_' | b'.' | b'-') || ch & 0x80 != 0
}

/// Can this byte appear in a variable name?
pub fn is_var(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, b'-' | b'_' | b'.' | b':')
}

/// Is it safe to end a read on this byte?
pub fn is_final(ch: u8) -> bool {
    ch == b';' || ch.is_ascii_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn small() -> InputOptions {
        InputOptions::new(16, 4, 16)
    }

    /// Hands out at most `chunk` bytes per `fill_buf`.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        chunk: usize,
    }

    impl Trickle {
        fn new(text: &str, chunk: usize) -> Self {
            Self {
                data: text.as_bytes().to_vec(),
                pos: 0,
                chunk,
            }
        }
    }

    impl std::io::Read for Trickle {
        fn read(&mut self, out: &mut [u8]) -> std::io::Result<usize> {
            let available = self.fill_buf()?;
            let n = available.len().min(out.len());
            out[..n].copy_from_slice(&available[..n]);
            self.consume(n);
            Ok(n)
        }
    }

    impl BufRead for Trickle {
        fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
            let end = (self.pos + self.chunk).min(self.data.len());
            Ok(&self.data[self.pos..end])
        }

        fn consume(&mut self, amount: usize) {
            self.pos += amount;
        }
    }

    #[test]
    fn test_fill_reads_one_line() {
        let mut input = InputBuffer::new(Cursor::new("one;\ntwo;\n"), InputOptions::default());

        assert_eq!(input.fill(true).unwrap(), Fill::Ready);
        assert_eq!(input.remaining(), b"one;\n");
        assert_eq!(input.line(), 1);
    }

    #[test]
    fn test_fill_without_final_returns_after_any_read() {
        let text = "abcdefghijklmnopqrstuvwxyz\n";
        let mut input = InputBuffer::new(Cursor::new(text), InputOptions::new(8, 2, 8));

        assert_eq!(input.fill(false).unwrap(), Fill::Ready);
        assert!(input.len() < text.len());
        assert_eq!(input.line(), 0);
    }

    #[test]
    fn test_settle_reads_to_a_final_byte() {
        let text = "abcdefghijklmnopqrstuvwxyz\n";
        let mut input = InputBuffer::new(Cursor::new(text), InputOptions::new(8, 2, 8));

        input.fill(false).unwrap();
        assert!(input.len() < text.len());
        input.settle().unwrap();
        assert_eq!(input.remaining(), text.as_bytes());
        assert_eq!(input.line(), 1);

        let reads = input.reads();
        input.settle().unwrap();
        assert_eq!(input.reads(), reads);
    }

    #[test]
    fn test_unclamped_options_still_read_everything() {
        let text = "abcdefg\n";
        let options = InputOptions {
            initial_size: 0,
            fudge: 0,
            increment: 0,
        };
        let mut input = InputBuffer::new(Cursor::new(text), options);

        assert_eq!(input.fill(true).unwrap(), Fill::Ready);
        assert_eq!(input.remaining(), text.as_bytes());
    }

    #[test]
    fn test_start_line_counts_newlines_before_start() {
        let text = "a\nbb\n\nccc;\n";
        let mut input = InputBuffer::new(Cursor::new(text), InputOptions::new(4, 1, 4));
        while input.fill(true).unwrap() == Fill::Ready {
            input.cur = input.len();
        }

        input.start = text.find("ccc").unwrap();
        assert_eq!(input.start_line(), 4);
    }

    #[test]
    fn test_start_line_survives_compaction() {
        let text = "aaaaaaaaaa\nbbbbbbbbbb\ncc;\n";
        let mut input = InputBuffer::new(Cursor::new(text), small());

        input.fill(true).unwrap();
        input.start = 11;
        input.cur = 11;
        assert_eq!(input.start_line(), 2);
        input.fill(true).unwrap();
        input.start = input.len();
        input.cur = input.len();
        input.fill(true).unwrap();

        assert_eq!(input.remaining(), b"cc;\n");
        assert_eq!(input.start_line(), 3);
    }

    #[test]
    fn test_buffer_past_name_reads_to_the_next_blank() {
        let mut input = InputBuffer::new(Trickle::new("count   (x)\n", 3), InputOptions::default());
        input.fill(true).unwrap();
        assert!(!input.paren_follows(5));

        input.buffer_past_name().unwrap();
        assert!(input.paren_follows(5));
    }

    #[test]
    fn test_fill_with_final_keeps_reading_long_lines() {
        let text = "abcdefghijklmnopqrstuvwxyz0123456789\n";
        let mut input = InputBuffer::new(Cursor::new(text), small());

        assert_eq!(input.fill(true).unwrap(), Fill::Ready);
        assert_eq!(input.remaining(), text.as_bytes());
        assert!(input.reads() > 1);
        assert!(input.capacity() > 16);
    }

    #[test]
    fn test_fill_reports_exhaustion() {
        let mut input = InputBuffer::new(Cursor::new("x"), InputOptions::default());

        assert_eq!(input.fill(true).unwrap(), Fill::Ready);
        input.cur = input.len();
        input.start = input.cur;
        assert_eq!(input.fill(true).unwrap(), Fill::Exhausted);
        assert!(input.is_eof());
        assert_eq!(input.fill(true).unwrap(), Fill::Exhausted);
    }

    #[test]
    fn test_unterminated_last_line_is_not_counted() {
        let mut input = InputBuffer::new(Cursor::new("a;\nb"), InputOptions::default());

        input.fill(true).unwrap();
        input.cur = input.len();
        input.start = input.cur;
        input.fill(true).unwrap();
        assert_eq!(input.remaining(), b"b");
        assert_eq!(input.line(), 1);
    }

    #[test]
    fn test_compaction_preserves_live_region() {
        let text = "aaaaaaaaaa;\nbbbbbbbbbb;\n";
        let mut input = InputBuffer::new(Cursor::new(text), small());

        input.fill(true).unwrap();
        assert_eq!(input.len(), 12);
        // Everything but the trailing ";\n" is dead.
        input.start = 10;
        input.cur = 12;

        input.fill(true).unwrap();
        assert_eq!(input.start, 0);
        assert_eq!(input.cur, 2);
        assert_eq!(input.text(0, input.len()), ";\nbbbbbbbbbb;\n");
        assert_eq!(input.capacity(), 16);
    }

    #[test]
    fn test_expression_mode_never_reads() {
        let mut input = InputBuffer::from_text("$a + 1");

        assert_eq!(input.fill(true).unwrap(), Fill::Ready);
        input.cur = input.len();
        assert_eq!(input.fill(true).unwrap(), Fill::Exhausted);
        assert_eq!(input.reads(), 0);
        assert!(input.is_eof());
    }

    #[test]
    fn test_word_at_requires_name_boundary() {
        let input = InputBuffer::from_text("if iff if(");

        assert!(input.word_at(0, "if"));
        assert!(!input.word_at(3, "if"));
        assert!(input.word_at(7, "if"));
    }

    #[test]
    fn test_paren_follows_skips_whitespace() {
        let input = InputBuffer::from_text("name  (x) other");

        assert!(input.paren_follows(4));
        assert!(!input.paren_follows(9));
    }

    #[test]
    fn test_character_classes() {
        assert!(is_bare(b'a') && is_bare(b':') && is_bare(b'-') && is_bare(0xc3));
        assert!(!is_bare(b'(') && !is_bare(b' '));
        assert!(is_var(b'.') && !is_var(b'*'));
        assert!(is_final(b';') && is_final(b'\n') && !is_final(b'x'));
    }
}
