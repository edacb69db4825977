//! The input stream the tokenizer reads from.
//!
//! [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
//!
//! "Before the tokenization stage, the input stream must be preprocessed by
//! normalizing newlines. Thus, newlines in HTML DOMs are represented by U+000A
//! LF characters, and there are never any U+000D CR characters in the input to
//! the tokenization stage."
//!
//! Input arrives already decoded. Chunks are normalized as they are appended,
//! so a CR at the end of one chunk and an LF at the start of the next still
//! collapse into a single LF.

use std::collections::VecDeque;

/// Buffered, newline-normalized characters with lookahead and pushback.
#[derive(Debug, Default)]
pub struct InputStream {
    buffer: VecDeque<char>,
    /// The last appended character was a CR, already turned into LF.
    last_was_cr: bool,
    /// No more input will be appended.
    closed: bool,
    /// Characters consumed so far, net of pushback.
    offset: usize,
}

impl InputStream {
    /// An empty, open stream.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A closed stream holding all of `text`.
    #[must_use]
    pub fn from_str_closed(text: &str) -> Self {
        let mut stream = Self::new();
        stream.append(text);
        stream.close();
        stream
    }

    /// Add more decoded text to the end of the stream.
    ///
    /// Ignored once the stream is closed.
    pub fn append(&mut self, text: &str) {
        if self.closed {
            return;
        }
        self.buffer.reserve(text.len());
        for c in text.chars() {
            match c {
                '\r' => {
                    self.buffer.push_back('\n');
                    self.last_was_cr = true;
                }
                '\n' if self.last_was_cr => {
                    // "CRLF" already produced its LF.
                    self.last_was_cr = false;
                }
                c => {
                    self.buffer.push_back(c);
                    self.last_was_cr = false;
                }
            }
        }
    }

    /// Mark the end of input. Once the buffer drains, reads report EOF.
    pub const fn close(&mut self) {
        self.closed = true;
    }

    /// True once [`close`](Self::close) has been called.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// True when the stream is closed and every character has been consumed.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.closed && self.buffer.is_empty()
    }

    /// Offset of the next character, counted from the start of the input.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.offset
    }

    /// The `n`th upcoming character (0 is the next one), without consuming.
    #[must_use]
    pub fn peek(&self, n: usize) -> Option<char> {
        self.buffer.get(n).copied()
    }

    /// Consume and return the next character.
    pub fn next_char(&mut self) -> Option<char> {
        let c = self.buffer.pop_front()?;
        self.offset += 1;
        Some(c)
    }

    /// Consume up to `n` characters.
    pub fn consume(&mut self, n: usize) -> String {
        let take = n.min(self.buffer.len());
        self.offset += take;
        self.buffer.drain(..take).collect()
    }

    /// Put `text` back so it is read next, in order.
    ///
    /// `text` goes through the same newline normalization as appended input,
    /// so a CR never reaches the tokenizer this way either.
    pub fn pushback(&mut self, text: &str) {
        let mut normalized = Vec::with_capacity(text.len());
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\r' {
                let _ = chars.next_if_eq(&'\n');
                normalized.push('\n');
            } else {
                normalized.push(c);
            }
        }
        self.offset = self.offset.saturating_sub(normalized.len());
        for c in normalized.into_iter().rev() {
            self.buffer.push_front(c);
        }
    }

    /// Whether the upcoming characters spell `target`.
    ///
    /// Returns `None` when the buffer agrees with `target` so far but is too
    /// short to decide and more input may still arrive.
    #[must_use]
    pub fn starts_with(&self, target: &str, ascii_case_insensitive: bool) -> Option<bool> {
        for (i, expected) in target.chars().enumerate() {
            match self.peek(i) {
                Some(actual) => {
                    let same = if ascii_case_insensitive {
                        actual.eq_ignore_ascii_case(&expected)
                    } else {
                        actual == expected
                    };
                    if !same {
                        return Some(false);
                    }
                }
                None if self.closed => return Some(false),
                None => return None,
            }
        }
        Some(true)
    }

    /// Discard all buffered input and close the stream.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newlines_are_normalized() {
        let mut stream = InputStream::from_str_closed("a\r\nb\rc\n");
        assert_eq!(stream.consume(10), "a\nb\nc\n");
        assert!(stream.at_end());
    }

    #[test]
    fn test_crlf_split_across_chunks() {
        let mut stream = InputStream::new();
        stream.append("a\r");
        stream.append("\nb");
        stream.close();
        assert_eq!(stream.consume(10), "a\nb");
    }

    #[test]
    fn test_pushback_is_read_next() {
        let mut stream = InputStream::from_str_closed("abc");
        assert_eq!(stream.consume(2), "ab");
        assert_eq!(stream.position(), 2);
        stream.pushback("xb");
        assert_eq!(stream.position(), 0);
        assert_eq!(stream.peek(0), Some('x'));
        assert_eq!(stream.consume(3), "xbc");
        assert_eq!(stream.next_char(), None);
    }

    #[test]
    fn test_pushback_normalizes_newlines() {
        let mut stream = InputStream::from_str_closed("z");
        stream.pushback("a\r\nb\rc");
        assert_eq!(stream.consume(10), "a\nb\ncz");
        assert_eq!(stream.position(), 5);
    }

    #[test]
    fn test_starts_with_waits_for_more_input() {
        let mut stream = InputStream::new();
        stream.append("DOC");
        assert_eq!(stream.starts_with("doctype", true), None);
        assert_eq!(stream.starts_with("DOX", false), Some(false));
        stream.append("TYPE");
        assert_eq!(stream.starts_with("doctype", true), Some(true));
        assert_eq!(stream.starts_with("doctype", false), Some(false));
        stream.close();
        assert_eq!(stream.starts_with("DOCTYPEX", false), Some(false));
    }
}
