//! Property-based tests with proptest.
//!
//! Random lines drawn from a C-flavoured alphabet, plus whole inputs
//! assembled from realistic and garbage lines, check the tokenizer's
//! position bookkeeping and the analyzer's ordering guarantees.

use ccheck_rs::scanner::code_part;
use ccheck_rs::{analyze, tokenize};
use proptest::prelude::*;

/// One line of printable C-ish characters, comments included.
fn raw_line() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_ \t+*%=<>!&|{}();,#@.$'\"/-]{0,40}"
}

/// A line that the analyzer has a handler for.
fn program_line() -> impl Strategy<Value = String> {
    let known = prop::sample::select(vec![
        "#include <stdio.h>",
        "#define MAX 10",
        "int x;",
        "int f(int a) {",
        "void g() {",
        "    return a;",
        "    printf(\"%d\", x);",
        "    if (x) {",
        "    }",
        "}",
        "/* open",
        "close */",
        "// note",
        "",
    ])
    .prop_map(str::to_string);
    prop_oneof![3 => known, 1 => raw_line()]
}

fn program() -> impl Strategy<Value = String> {
    prop::collection::vec(program_line(), 0..20).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn tokenize_is_deterministic(input in program()) {
        prop_assert_eq!(tokenize(&input), tokenize(&input));
    }

    #[test]
    fn token_spans_slice_their_text(input in program()) {
        let lines: Vec<&str> = input.split('\n').collect();
        for token in tokenize(&input) {
            let span = token.span;
            prop_assert!(span.end_column > span.start_column);
            prop_assert_eq!(&lines[span.line][span.start_column..span.end_column], token.text.as_str());
        }
    }

    #[test]
    fn tokens_and_separators_cover_the_code(line in raw_line()) {
        let code = code_part(&line);
        let mut covered = vec![false; code.len()];
        for token in tokenize(&line) {
            for slot in &mut covered[token.span.start_column..token.span.end_column] {
                *slot = true;
            }
        }
        for (i, byte) in code.bytes().enumerate() {
            if !covered[i] {
                prop_assert!(
                    matches!(byte, b' ' | b'\t' | b',' | b';'),
                    "uncovered byte {:?} at {} in {:?}", byte as char, i, line
                );
            }
        }
    }

    #[test]
    fn tokens_are_ordered_within_a_line(line in raw_line()) {
        let tokens = tokenize(&line);
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].span.end_column <= pair[1].span.start_column);
        }
    }

    #[test]
    fn verdict_lines_never_decrease(input in program()) {
        let line_count = input.split('\n').count();
        let verdicts = analyze(&input);
        for pair in verdicts.windows(2) {
            prop_assert!(pair[0].line_number <= pair[1].line_number);
        }
        for verdict in &verdicts {
            prop_assert!(verdict.line_number < line_count);
        }
    }

    #[test]
    fn analyze_is_deterministic(input in program()) {
        prop_assert_eq!(analyze(&input), analyze(&input));
    }
}
