//! Tokenizer behaviour on whole inputs.

use ccheck_rs::{Token, TokenKind, tokenize, tokenize_bytes};

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

fn texts(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

// -----------------------------------------------------------
// Basic tokenizer behaviour.
// -----------------------------------------------------------

#[test]
fn lex_empty_input() {
    assert!(tokenize("").is_empty());
}

#[test]
fn lex_only_whitespace() {
    assert!(tokenize("   \t  \n\n  \r\n").is_empty());
}

#[test]
fn lex_sum_without_spaces() {
    let tokens = tokenize("a+b");
    assert_eq!(texts(&tokens), ["a", "+", "b"]);
    assert_eq!(
        kinds(&tokens),
        [
            TokenKind::Identifier,
            TokenKind::Punctuation,
            TokenKind::Identifier
        ]
    );
    let columns: Vec<_> = tokens
        .iter()
        .map(|t| (t.span.start_column, t.span.end_column))
        .collect();
    assert_eq!(columns, [(0, 1), (1, 2), (2, 3)]);
}

#[test]
fn lex_integer_division() {
    let tokens = tokenize("foo = 70 / 5");
    assert_eq!(texts(&tokens), ["foo", "=", "70", "/", "5"]);
    assert_eq!(
        kinds(&tokens),
        [
            TokenKind::Identifier,
            TokenKind::Punctuation,
            TokenKind::Number,
            TokenKind::Punctuation,
            TokenKind::Number,
        ]
    );
    assert_eq!(tokens[2].span.start_column, 6);
    assert_eq!(tokens[2].span.end_column, 8);
}

#[test]
fn lex_keywords() {
    let tokens = tokenize("#include <stdio.h>\nint main() {\n    printf(\"hi\");\n    return 0;\n}");
    let keywords: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Keyword)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(keywords, ["#include", "int", "printf", "return"]);
}

#[test]
fn lex_header_name_is_identifier_prefix() {
    let tokens = tokenize("#include <stdio.h>");
    assert_eq!(texts(&tokens), ["#include", "<", "stdio.h", ">"]);
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
}

#[test]
fn lex_indexed_name_is_identifier() {
    let tokens = tokenize("phrase[i] = 0;");
    assert_eq!(tokens[0].text, "phrase[i]");
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
}

#[test]
fn lex_terminator_is_dropped() {
    let tokens = tokenize("x;y");
    assert_eq!(texts(&tokens), ["x", "y"]);
    assert_eq!(tokens[1].span.start_column, 2);
}

#[test]
fn lex_commas_separate() {
    let tokens = tokenize("int a,b, c;");
    assert_eq!(texts(&tokens), ["int", "a", "b", "c"]);
}

// -----------------------------------------------------------
// Comments.
// -----------------------------------------------------------

#[test]
fn lex_line_comment_truncates() {
    let tokens = tokenize("hello //@! 123 comment");
    assert_eq!(texts(&tokens), ["hello"]);
}

#[test]
fn lex_block_comment_opener_truncates() {
    let tokens = tokenize("x = 1; /* note */ y");
    assert_eq!(texts(&tokens), ["x", "=", "1"]);
}

#[test]
fn lex_comment_only_line_is_empty() {
    let tokens = tokenize("// nothing here\nz");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].span.line, 1);
}

#[test]
fn lex_lone_slash_is_division() {
    let tokens = tokenize("a / b");
    assert_eq!(texts(&tokens), ["a", "/", "b"]);
}

// -----------------------------------------------------------
// Invalid fragments.
// -----------------------------------------------------------

#[test]
fn lex_invalid_fragments() {
    for text in ["@aux", "12abc", "3.14", "'c'", "\"s\""] {
        let tokens = tokenize(text);
        assert_eq!(tokens.len(), 1, "{text}");
        assert_eq!(tokens[0].kind, TokenKind::Invalid, "{text}");
    }
}

#[test]
fn lex_dollar_identifier() {
    assert_eq!(tokenize("$tmp")[0].kind, TokenKind::Identifier);
}

#[test]
fn lex_non_utf8_rejected() {
    assert!(tokenize_bytes(b"int \xc3\x28;").is_err());
}

// -----------------------------------------------------------
// Positions.
// -----------------------------------------------------------

#[test]
fn lex_line_numbers_from_zero() {
    let tokens = tokenize("a\n\n  b\n");
    assert_eq!(tokens[0].span.line, 0);
    assert_eq!(tokens[1].span.line, 2);
    assert_eq!(tokens[1].span.start_column, 2);
}

#[test]
fn lex_crlf_line_endings() {
    let tokens = tokenize("a\r\nb\r\n");
    assert_eq!(texts(&tokens), ["a", "b"]);
    assert_eq!(tokens[1].span.line, 1);
}
