//! The top-level driver.
//!
//! Pulls lines from a [`LineCursor`], looks at the first word of each,
//! and hands the line (and the cursor, when more lines are needed) to
//! the matching handler. The driver owns the global tables for the
//! whole run.

use std::str::FromStr;

use tracing::{debug, info};

use crate::cursor::{LineCursor, SourceLine};
use crate::declarations::{
    check_variable_declaration, consume_comment_block, handle_comment, handle_constant,
    handle_import,
};
use crate::function::handle_function;
use crate::scanner::{code_part, first_word, opens_block_comment};
use crate::symbols::Globals;
use crate::verdict::{Problem, Sink, Verdict, report};
use crate::vocabulary::{CType, is_qualifier};

/// Analysis policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Treat a `void` function without any `return` as an error.
    pub require_return_in_void: bool,
}

/// One analysis run over one input.
#[derive(Debug, Default)]
pub struct Analyzer {
    globals: Globals,
    options: Options,
}

/// Forwards verdicts and counts them for the run summary.
struct Tally<'s> {
    inner: &'s mut dyn Sink,
    verdicts: usize,
    errors: usize,
}

impl Sink for Tally<'_> {
    fn report(&mut self, verdict: Verdict) {
        self.verdicts += 1;
        if verdict.is_error() {
            self.errors += 1;
        }
        self.inner.report(verdict);
    }
}

impl Analyzer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: Options) -> Self {
        Self {
            globals: Globals::default(),
            options,
        }
    }

    /// Tables built so far: imports, constants and globals, and the
    /// functions that were accepted.
    #[must_use]
    pub const fn globals(&self) -> &Globals {
        &self.globals
    }

    /// Analyze `input`, sending every verdict to `sink` in line order.
    pub fn run(&mut self, input: &str, sink: &mut dyn Sink) {
        let mut cursor = LineCursor::new(input);
        let mut tally = Tally {
            inner: sink,
            verdicts: 0,
            errors: 0,
        };

        while let Some(line) = cursor.next_line() {
            self.dispatch(line, &mut cursor, &mut tally);
        }

        info!(
            lines = cursor.last_line_number().map_or(0, |n| n + 1),
            verdicts = tally.verdicts,
            errors = tally.errors,
            functions = self.globals.functions.len(),
            imports = ?self.globals.imports.iter().collect::<Vec<_>>(),
            "analysis finished"
        );
    }

    fn dispatch(&mut self, line: SourceLine<'_>, cursor: &mut LineCursor<'_>, sink: &mut dyn Sink) {
        let trimmed = line.text.trim_start();
        if trimmed.starts_with("//") || trimmed.starts_with("/*") {
            handle_comment(line, cursor, sink);
            return;
        }
        let Some(first) = first_word(line.text) else {
            return;
        };

        let is_type = CType::from_str(first).is_ok() || is_qualifier(first);
        if is_type && code_part(line.text).contains('(') {
            debug!(line = line.number, "dispatching to function handler");
            if let Some(function) = handle_function(line, cursor, &self.globals, self.options, sink)
            {
                debug!(name = %function.name, "function registered");
                self.globals.functions.push(function);
            }
            return;
        }

        match first {
            "#include" => handle_import(line, &mut self.globals.imports, sink),
            "#define" => handle_constant(line, &mut self.globals, sink),
            "}" => report(sink, line, Problem::UnexpectedClosingBrace),
            _ if is_type => {
                let outcome = check_variable_declaration(code_part(line.text), &mut self.globals);
                report(sink, line, outcome);
            }
            _ => report(sink, line, Problem::StatementOutsideFunction(first.to_string())),
        }
        if opens_block_comment(line.text) {
            consume_comment_block(line, cursor, sink);
        }
    }
}
