use std::fmt;

use serde::Serialize;

/// Position of a token within its line.
///
/// Columns are half-open byte offsets: `start_column` is the first
/// byte of the token and `end_column` is one past its last byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub line: usize,
    pub start_column: usize,
    pub end_column: usize,
}

/// Token kinds produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Reserved word (`int`, `while`, `#include`, `printf`, ...).
    Keyword,
    /// Single-character operator, brace, or parenthesis.
    Punctuation,
    /// Run of decimal digits.
    Number,
    /// Word starting with a letter, `_`, or `$`.
    Identifier,
    /// Anything else.
    Invalid,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Keyword => "keyword",
            Self::Punctuation => "punctuation",
            Self::Number => "number",
            Self::Identifier => "identifier",
            Self::Invalid => "invalid",
        })
    }
}

/// A single token with its kind, text, and source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}
