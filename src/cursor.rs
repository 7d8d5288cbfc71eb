//! The shared, forward-only line supplier.
//!
//! Every handler that may need more than its current line receives the
//! cursor by `&mut`. A line handed out by [`LineCursor::next_line`] is
//! never handed out again, so nested handlers and the top-level driver
//! can never see the same line twice.

use tracing::trace;

/// One line of input and its zero-based number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub text: &'a str,
    pub number: usize,
}

#[derive(Debug)]
pub struct LineCursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    /// Split `input` on `\n`. A trailing `\r` stays part of the line
    /// text; the scanner treats it as a separator.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            lines: input.split('\n').collect(),
            pos: 0,
        }
    }

    /// Pull the next line, or `None` once the input is exhausted.
    pub fn next_line(&mut self) -> Option<SourceLine<'a>> {
        let text = *self.lines.get(self.pos)?;
        let line = SourceLine {
            text,
            number: self.pos,
        };
        self.pos += 1;
        trace!(line = line.number, text, "pulled line");
        Some(line)
    }

    /// Number of the most recently pulled line, if any.
    #[must_use]
    pub const fn last_line_number(&self) -> Option<usize> {
        self.pos.checked_sub(1)
    }

    /// The most recently pulled line, if any.
    #[must_use]
    pub fn last_line(&self) -> Option<SourceLine<'a>> {
        let number = self.last_line_number()?;
        self.lines.get(number).map(|&text| SourceLine { text, number })
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.lines.len()
    }
}

impl<'a> Iterator for LineCursor<'a> {
    type Item = SourceLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line()
    }
}
