use crate::scanner::{Fragment, scan};
use crate::token::{Span, Token, TokenKind};
use crate::vocabulary::{is_keyword, is_number, is_punctuation, looks_like_identifier};

/// Tokenize a whole source string, line by line.
///
/// Lines are split on `\n` and numbered from zero. Comment text is
/// dropped, so a line that is entirely a comment contributes nothing.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    input
        .split('\n')
        .enumerate()
        .flat_map(|(number, line)| tokenize_line(line, number))
        .collect()
}

/// Tokenize one line.
///
/// Multi-character operators are not fused: `==` becomes two `=`
/// tokens.
#[must_use]
pub fn tokenize_line(line: &str, line_number: usize) -> Vec<Token> {
    scan(line)
        .take_while(|fragment| !fragment.is_comment)
        .map(|fragment| make_token(fragment, line_number))
        .collect()
}

/// Classify a fragment's text.
#[must_use]
pub fn classify(text: &str) -> TokenKind {
    if is_keyword(text) {
        TokenKind::Keyword
    } else if is_punctuation(text) {
        TokenKind::Punctuation
    } else if is_number(text) {
        TokenKind::Number
    } else if looks_like_identifier(text) {
        TokenKind::Identifier
    } else {
        TokenKind::Invalid
    }
}

fn make_token(fragment: Fragment<'_>, line: usize) -> Token {
    Token {
        kind: classify(fragment.text),
        text: fragment.text.to_string(),
        span: Span {
            line,
            start_column: fragment.start,
            end_column: fragment.end,
        },
    }
}
