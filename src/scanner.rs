//! Splits a single line into raw word and punctuation fragments.
//!
//! The scanner knows nothing about token categories; it only decides
//! where fragments begin and end. Both the tokenizer and the semantic
//! handlers walk lines through it, so column bookkeeping lives in one
//! place.

use crate::vocabulary::{PUNCTUATION, SEPARATORS, TERMINATOR};

/// One piece of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub text: &'a str,
    /// Byte offset of the first byte.
    pub start: usize,
    /// Byte offset one past the last byte.
    pub end: usize,
    /// Set on the verbatim remainder that follows `//` or `/*`.
    pub is_comment: bool,
}

/// Lazy iterator over the fragments of one line.
///
/// Once exhausted it stays exhausted; scanning the same line again
/// needs a new scanner.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    line: &'a str,
    pos: usize,
    word_start: Option<usize>,
    pending: Option<Fragment<'a>>,
    done: bool,
}

/// Scan `line` into fragments.
#[must_use]
pub const fn scan(line: &str) -> Scanner<'_> {
    Scanner {
        line,
        pos: 0,
        word_start: None,
        pending: None,
        done: false,
    }
}

impl<'a> Scanner<'a> {
    fn fragment(&self, start: usize, end: usize, is_comment: bool) -> Fragment<'a> {
        Fragment {
            text: &self.line[start..end],
            start,
            end,
            is_comment,
        }
    }

    fn flush(&mut self, end: usize) -> Option<Fragment<'a>> {
        let start = self.word_start.take()?;
        (start < end).then(|| self.fragment(start, end, false))
    }

    /// Emit `word` if one was pending, holding `next` back for the
    /// following call.
    fn flush_before(&mut self, at: usize, next: Fragment<'a>) -> Fragment<'a> {
        match self.flush(at) {
            Some(word) => {
                self.pending = Some(next);
                word
            }
            None => next,
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Fragment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(fragment) = self.pending.take() {
            return Some(fragment);
        }
        if self.done {
            return None;
        }

        while let Some(ch) = self.line[self.pos..].chars().next() {
            let at = self.pos;

            if ch == '/' && matches!(self.line[at + 1..].chars().next(), Some('/' | '*')) {
                self.done = true;
                self.pos = self.line.len();
                let comment = self.fragment(at, self.line.len(), true);
                return Some(self.flush_before(at, comment));
            }

            self.pos += ch.len_utf8();

            if SEPARATORS.contains(&ch) || ch == TERMINATOR {
                if let Some(word) = self.flush(at) {
                    return Some(word);
                }
                continue;
            }

            if PUNCTUATION.contains(&ch) {
                let symbol = self.fragment(at, self.pos, false);
                return Some(self.flush_before(at, symbol));
            }

            if self.word_start.is_none() {
                self.word_start = Some(at);
            }
        }

        self.done = true;
        self.flush(self.line.len())
    }
}

/// Non-comment fragment texts of `line`.
pub fn words(line: &str) -> impl Iterator<Item = &str> {
    scan(line).filter(|f| !f.is_comment).map(|f| f.text)
}

/// First fragment of `line`, which may be a comment tail.
#[must_use]
pub fn first_word(line: &str) -> Option<&str> {
    scan(line).next().map(|f| f.text)
}

fn comment_start(line: &str) -> Option<usize> {
    match (line.find("//"), line.find("/*")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Text of `line` before its first comment opener.
#[must_use]
pub fn code_part(line: &str) -> &str {
    comment_start(line).map_or(line, |at| &line[..at])
}

/// The comment tail of `line`, starting at its opener.
#[must_use]
pub fn trailing_comment(line: &str) -> Option<&str> {
    comment_start(line).map(|at| &line[at..])
}

/// Returns `true` if `line` ends inside a `/*` block that has not been
/// closed on the same line.
#[must_use]
pub fn opens_block_comment(line: &str) -> bool {
    trailing_comment(line)
        .is_some_and(|tail| tail.starts_with("/*") && !tail[2..].contains("*/"))
}

/// Split `text` on `separator`, ignoring separators inside
/// parentheses, brackets, braces, and quoted literals.
#[must_use]
pub fn split_outside_groups(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, ch) in text.char_indices() {
        if let Some(open) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Split `NAME = VALUE` at its single `=`, leaving `==`, `<=`, `>=`
/// and `!=` alone.
#[must_use]
pub fn split_assignment(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    let at = bytes.iter().enumerate().position(|(i, &b)| {
        b == b'='
            && bytes.get(i + 1) != Some(&b'=')
            && !matches!(i.checked_sub(1).map(|p| bytes[p]), Some(b'=' | b'!' | b'<' | b'>'))
    })?;
    Some((&text[..at], &text[at + 1..]))
}
