//! Lexer and line-driven semantic checker for a small subset of C.
//!
//! Two entry points share one scanner: [`tokenize`] classifies every
//! lexeme of the input with its line and column, and [`analyze`] walks
//! the input line by line and reports a [`Verdict`] per meaningful line
//! (accepted notes as well as errors). Nothing is fatal: a problem on
//! one line is reported and the walk carries on.
//!
//! # Quick start
//!
//! ## Tokenize
//!
//! ```
//! use ccheck_rs::{TokenKind, tokenize};
//!
//! let tokens = tokenize("a+b");
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [TokenKind::Identifier, TokenKind::Punctuation, TokenKind::Identifier]
//! );
//! assert_eq!(tokens[2].span.start_column, 2);
//! ```
//!
//! ## Analyze
//!
//! ```
//! use ccheck_rs::analyze;
//!
//! let source = "#include <stdio.h>\nint main() {\n    char name;\n    printf(\"%d\", name);\n    return 0;\n}\n";
//! let verdicts = analyze(source);
//! let errors: Vec<_> = verdicts.iter().filter(|v| v.is_error()).collect();
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].line_number, 3);
//! assert_eq!(errors[0].message(), "ERROR: wrong type specified for name");
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod analyzer;
pub mod cursor;
pub mod declarations;
pub mod function;
pub mod io_format;
pub mod lexer;
pub mod literal;
pub mod returns;
pub mod scanner;
pub mod symbols;
pub mod token;
pub mod verdict;
pub mod vocabulary;

pub use analyzer::{Analyzer, Options};
pub use cursor::{LineCursor, SourceLine};
pub use lexer::{tokenize, tokenize_line};
pub use symbols::{Function, Globals, Variable};
pub use token::{Span, Token, TokenKind};
pub use verdict::{Accepted, Outcome, Problem, ProblemClass, Sink, Verdict};
pub use vocabulary::CType;

/// Failure to accept input at all, before any scanning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The input bytes are not UTF-8 text.
    #[error("input is not valid UTF-8 text (valid up to byte {valid_up_to})")]
    NotText { valid_up_to: usize },
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::NotText {
            valid_up_to: err.valid_up_to(),
        }
    }
}

/// Analyze `input` with default [`Options`] and collect the verdicts.
#[must_use]
pub fn analyze(input: &str) -> Vec<Verdict> {
    let mut verdicts = Vec::new();
    analyze_into(input, &mut verdicts);
    verdicts
}

/// Analyze `input` with default [`Options`], streaming verdicts to
/// `sink`.
pub fn analyze_into(input: &str, sink: &mut impl Sink) {
    Analyzer::new().run(input, sink);
}

/// Like [`analyze`], for raw bytes.
pub fn analyze_bytes(input: &[u8]) -> Result<Vec<Verdict>, Error> {
    Ok(analyze(std::str::from_utf8(input)?))
}

/// Like [`tokenize`], for raw bytes.
pub fn tokenize_bytes(input: &[u8]) -> Result<Vec<Token>, Error> {
    Ok(tokenize(std::str::from_utf8(input)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_must_be_text() {
        assert_eq!(
            analyze_bytes(b"int x;\xff\n"),
            Err(Error::NotText { valid_up_to: 6 })
        );
        assert!(tokenize_bytes(b"int x;").is_ok());
    }

    #[test]
    fn empty_input() {
        assert!(analyze("").is_empty());
        assert!(tokenize("").is_empty());
    }
}
