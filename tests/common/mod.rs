#![allow(dead_code)]

use ccheck_rs::{Analyzer, Options, Problem, Verdict, analyze};

/// `(line_number, message)` for every verdict of `input`.
pub fn messages(input: &str) -> Vec<(usize, String)> {
    analyze(input)
        .iter()
        .map(|v| (v.line_number, v.message()))
        .collect()
}

/// Only the error verdicts of `input`.
pub fn errors(input: &str) -> Vec<Verdict> {
    analyze(input).into_iter().filter(Verdict::is_error).collect()
}

/// Analyze with explicit options.
pub fn analyze_with(input: &str, options: Options) -> Vec<Verdict> {
    let mut verdicts = Vec::new();
    Analyzer::with_options(options).run(input, &mut verdicts);
    verdicts
}

/// Assert `input` analyzes without a single error verdict.
pub fn assert_clean(input: &str) {
    let errors = errors(input);
    assert!(
        errors.is_empty(),
        "unexpected errors:\n{}\n--- input ---\n{input}",
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// The problem reported on `line`, if any.
pub fn problem_at(verdicts: &[Verdict], line: usize) -> Option<Problem> {
    verdicts
        .iter()
        .filter(|v| v.line_number == line)
        .find_map(|v| v.problem().cloned())
}
