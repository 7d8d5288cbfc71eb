//! Handlers for top-level declarations and comments.
//!
//! `#include`, `#define`, comment lines and comment blocks, and
//! variable declarations (shared between globals and function
//! locals).

use std::str::FromStr;

use tracing::debug;

use crate::cursor::{LineCursor, SourceLine};
use crate::literal::{Literal, constant_type};
use crate::scanner::{code_part, scan, split_assignment, split_outside_groups};
use crate::symbols::{ImportSet, Variable, VariableTable};
use crate::verdict::{Accepted, Problem, Sink, report};
use crate::vocabulary::{CType, is_identifier, is_punctuation, is_qualifier, leading_identifier};

/// Check an `#include` line and record the header on success.
pub fn handle_import(line: SourceLine<'_>, imports: &mut ImportSet, sink: &mut dyn Sink) {
    let outcome = check_import(code_part(line.text), imports).map(|name| {
        debug!(line = line.number, header = name, "import accepted");
        imports.insert(name);
        Accepted::Import
    });
    report(sink, line, outcome);
}

/// Validate an `#include` and return the header name it introduces.
///
/// # Errors
///
/// `NoImport` without a `<...>` group, `TooManyImports` with more than
/// one or with text after it, `ImportAlreadyDeclared` for a repeat.
pub fn check_import<'a>(code: &'a str, imports: &ImportSet) -> Result<&'a str, Problem> {
    let mut names = Vec::new();
    let mut rest = code;
    while let Some(open) = rest.find('<') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('>') else {
            break;
        };
        if close > 0 {
            names.push(&after[..close]);
        }
        rest = &after[close + 1..];
    }

    match names.as_slice() {
        [] => Err(Problem::NoImport),
        [_] if !rest.trim().is_empty() => Err(Problem::TooManyImports),
        [name] if imports.contains(name) => Err(Problem::ImportAlreadyDeclared),
        [name] => Ok(*name),
        _ => Err(Problem::TooManyImports),
    }
}

/// Check a `#define NAME VALUE` line and register the constant.
pub fn handle_constant(line: SourceLine<'_>, globals: &mut dyn VariableTable, sink: &mut dyn Sink) {
    let outcome = check_constant(code_part(line.text), globals).map(|constant| {
        debug!(line = line.number, name = %constant.name, ty = %constant.ty, "constant declared");
        globals.insert(constant);
        Accepted::Constant
    });
    report(sink, line, outcome);
}

/// Validate a `#define` and build the constant it declares.
///
/// # Errors
///
/// `WrongConstSyntax` unless there are exactly three fields,
/// `InvalidConstName` for a malformed name, `ConstAlreadyDeclared` if
/// the name is taken.
pub fn check_constant(code: &str, globals: &dyn VariableTable) -> Result<Variable, Problem> {
    let fields: Vec<&str> = code.split_whitespace().collect();
    let [_, name, value] = fields.as_slice() else {
        return Err(Problem::WrongConstSyntax);
    };
    if !is_identifier(name) {
        return Err(Problem::InvalidConstName);
    }
    if globals.is_declared(name) {
        return Err(Problem::ConstAlreadyDeclared);
    }
    Ok(Variable::new(*name, constant_type(value)))
}

/// Handle a line that starts with `//` or `/*`, pulling continuation
/// lines from `cursor` for an unterminated block.
pub fn handle_comment(line: SourceLine<'_>, cursor: &mut LineCursor<'_>, sink: &mut dyn Sink) {
    let trimmed = line.text.trim();
    if trimmed.starts_with("//") {
        report(sink, line, Accepted::Comment);
        return;
    }

    if trimmed.get(2..).is_some_and(|body| body.contains("*/")) {
        if trimmed.len() >= 4 && trimmed.ends_with("*/") {
            report(sink, line, Accepted::Comment);
        } else {
            report(sink, line, Problem::TextAfterCommentBlock);
        }
        return;
    }

    report(sink, line, Accepted::Comment);
    consume_comment_block(line, cursor, sink);
}

/// Pull lines until one closes the block comment opened on `opener`.
pub fn consume_comment_block(
    opener: SourceLine<'_>,
    cursor: &mut LineCursor<'_>,
    sink: &mut dyn Sink,
) {
    let mut last = opener;
    while let Some(line) = cursor.next_line() {
        last = line;
        if !line.text.contains("*/") {
            report(sink, line, Accepted::CommentBlockLine);
            continue;
        }
        let compact: String = line.text.split_whitespace().collect();
        if compact.ends_with("*/") {
            report(sink, line, Accepted::CommentBlockEnd);
        } else {
            report(sink, line, Problem::TextAfterCommentBlock);
        }
        return;
    }
    debug!(opened = opener.number, "input ended inside a comment block");
    report(sink, last, Problem::UnclosedCommentBlock);
}

/// Check a `type a, b = 1, c[4];` declaration and add every
/// well-formed name to `table`.
///
/// All declarators are examined; the first problem found is returned
/// after the valid names have been registered.
///
/// # Errors
///
/// `VoidVariable`, `OperatorBeforeName`, `InvalidVariableName`,
/// `MissingVariableName`, `VariableAlreadyDeclared`, or
/// `AssignmentMismatch` for an initializer literal of the wrong type.
pub fn check_variable_declaration(
    code: &str,
    table: &mut dyn VariableTable,
) -> Result<Accepted, Problem> {
    let (ty, rest) = split_type_prefix(code)?;
    if ty == CType::Void {
        return Err(Problem::VoidVariable);
    }

    let mut first_problem = None;
    for segment in split_outside_groups(rest, ',') {
        match check_declarator(segment, ty, table) {
            Ok(name) => table.insert(Variable::new(name, ty)),
            Err(problem) => {
                first_problem.get_or_insert(problem);
            }
        }
    }
    first_problem.map_or(Ok(Accepted::VariableDeclaration), Err)
}

/// Skip qualifiers and read the type keyword. A bare qualifier list
/// (`unsigned x;`) means `int`.
fn split_type_prefix(code: &str) -> Result<(CType, &str), Problem> {
    let mut ty = None;
    let mut end = 0;
    for fragment in scan(code).filter(|f| !f.is_comment) {
        if ty.is_none()
            && let Ok(found) = CType::from_str(fragment.text)
        {
            ty = Some(found);
            end = fragment.end;
            continue;
        }
        if ty.is_none() && is_qualifier(fragment.text) {
            end = fragment.end;
            continue;
        }
        break;
    }
    if end == 0 {
        return Err(Problem::MissingVariableName);
    }
    Ok((ty.unwrap_or(CType::Int), &code[end..]))
}

fn check_declarator<'a>(
    segment: &'a str,
    ty: CType,
    table: &dyn VariableTable,
) -> Result<&'a str, Problem> {
    let segment = segment.trim().trim_end_matches(';').trim_end();
    let (declarator, initializer) = match split_assignment(segment) {
        Some((left, right)) => (left.trim(), Some(right.trim())),
        None => (segment, None),
    };

    let Some(first) = scan(declarator).next() else {
        return Err(Problem::MissingVariableName);
    };
    if is_punctuation(first.text) {
        return Err(Problem::OperatorBeforeName);
    }
    let Some(name) = leading_identifier(declarator) else {
        return Err(Problem::InvalidVariableName(first.text.to_string()));
    };
    let suffix = declarator[name.len()..].trim_start();
    if !(suffix.is_empty() || suffix.starts_with('[')) {
        return Err(Problem::InvalidVariableName(declarator.to_string()));
    }
    if table.is_declared(name) {
        return Err(Problem::VariableAlreadyDeclared(name.to_string()));
    }

    if let Some(value) = initializer
        && Literal::parse(value).is_some_and(|literal| !literal.fits(ty))
    {
        return Err(Problem::AssignmentMismatch {
            name: name.to_string(),
            value: value.to_string(),
        });
    }
    Ok(name)
}
