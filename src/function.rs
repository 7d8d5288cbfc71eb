//! Function declarations and bodies.
//!
//! The handler reads the signature from the current line, then keeps
//! pulling body lines from the shared cursor until the brace that
//! opened the body is closed. Each body line is classified into a
//! [`LineShape`] and dispatched from there.
//!
//! A rejected signature still consumes its body through the matching
//! `}`, so the driver resumes after the function rather than inside
//! it. When the signature line has no `{`, the first `{` that follows
//! is taken as the body opener.

use std::str::FromStr;

use tracing::{debug, trace};

use crate::analyzer::Options;
use crate::cursor::{LineCursor, SourceLine};
use crate::declarations::{check_variable_declaration, consume_comment_block, handle_comment};
use crate::io_format::{IoCall, check_io_call};
use crate::lexer::classify;
use crate::literal::Literal;
use crate::returns::check_return;
use crate::scanner::{code_part, first_word, opens_block_comment, scan, split_assignment};
use crate::symbols::{Function, Globals, Scope, Variable, VariableTable};
use crate::token::TokenKind;
use crate::verdict::{Accepted, Problem, Sink, report};
use crate::vocabulary::{
    CType, INTERNAL_FUNCTIONS, is_control_word, is_identifier, is_keyword, is_qualifier,
    leading_identifier,
};

/// What a body line is, judged by its first word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineShape<'a> {
    Blank,
    Comment,
    /// Starts with `}`.
    Close,
    /// A bare `{`.
    Open,
    Io(IoCall),
    Return,
    Declaration,
    /// Starts with a visible variable.
    Usage(&'a str),
    /// Starts with a callable function.
    Call,
    Control,
    Unknown(&'a str),
}

/// Where the signature walk currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Head,
    Params,
    AfterParams,
}

/// Everything read from a signature line, valid or not.
#[derive(Debug, Default)]
struct Signature<'a> {
    return_type: Option<CType>,
    name: Option<&'a str>,
    params: Vec<(CType, &'a str)>,
}

/// Handle a function starting on `line`.
///
/// Returns the finished function when both the signature and the body
/// check out; the caller registers it. On failure nothing should be
/// registered.
pub fn handle_function(
    line: SourceLine<'_>,
    cursor: &mut LineCursor<'_>,
    globals: &Globals,
    options: Options,
    sink: &mut dyn Sink,
) -> Option<Function> {
    let code = code_part(line.text);
    let (signature, problem) = parse_signature(code, globals);
    let valid = problem.is_none();
    match problem {
        Some(problem) => {
            debug!(line = line.number, %problem, "function signature rejected");
            report(sink, line, problem);
        }
        None => {
            debug!(line = line.number, name = signature.name, "function signature accepted");
            report(sink, line, Accepted::FunctionDeclaration);
        }
    }

    let opens = braces(code).filter(|&b| b == '{').count();
    let closes = braces(code).filter(|&b| b == '}').count();
    let mut body = Body::new(&signature, valid, globals, options);
    if opens == 0 {
        debug!(line = line.number, "body not opened on the signature line");
        body.awaiting_opener = true;
    } else {
        body.depth = opens.saturating_sub(closes);
        if body.depth == 0 {
            return body.close(line, cursor, sink);
        }
    }
    if opens_block_comment(line.text) {
        consume_comment_block(line, cursor, sink);
    }
    body.run(line, cursor, sink)
}

fn parse_signature<'a>(code: &'a str, globals: &Globals) -> (Signature<'a>, Option<Problem>) {
    let mut signature = Signature::default();
    let problem = walk_signature(code, globals, &mut signature).err();
    (signature, problem)
}

#[allow(clippy::too_many_lines)]
fn walk_signature<'a>(
    code: &'a str,
    globals: &Globals,
    signature: &mut Signature<'a>,
) -> Result<(), Problem> {
    let mut phase = Phase::Head;
    let mut saw_qualifier = false;
    let mut pending_type: Option<CType> = None;
    let mut pending_implied = false;
    let mut body_opened = false;
    let mut previous_end = 0;

    for fragment in scan(code).filter(|f| !f.is_comment) {
        if body_opened {
            break;
        }
        let comma_before = code[previous_end..fragment.start].contains(',');
        previous_end = fragment.end;
        let word = fragment.text;

        match phase {
            Phase::Head => {
                if comma_before {
                    return Err(Problem::CommaOutsideParentheses);
                }
                match word {
                    "(" => {
                        if signature.return_type.is_none() && !saw_qualifier {
                            return Err(Problem::MissingReturnType);
                        }
                        if signature.name.is_none() {
                            return Err(Problem::InvalidFunctionName);
                        }
                        phase = Phase::Params;
                    }
                    ")" => return Err(Problem::ParenthesisNotOpened),
                    "{" => return Err(Problem::DeclarationEndedEarly),
                    q if is_qualifier(q) && signature.name.is_none() => saw_qualifier = true,
                    _ if signature.return_type.is_none()
                        && signature.name.is_none()
                        && CType::from_str(word).is_ok() =>
                    {
                        signature.return_type = CType::from_str(word).ok();
                    }
                    _ => {
                        if signature.return_type.is_none() && !saw_qualifier {
                            return Err(Problem::MissingReturnType);
                        }
                        if signature.name.is_some() || !is_identifier(word) || is_keyword(word) {
                            return Err(Problem::InvalidFunctionName);
                        }
                        if globals.function(word).is_some() {
                            return Err(Problem::FunctionAlreadyDeclared);
                        }
                        signature.name = Some(word);
                        signature.return_type.get_or_insert(CType::Int);
                    }
                }
            }
            Phase::Params => {
                if comma_before && (pending_type.is_some() || signature.params.is_empty()) {
                    return Err(Problem::InvalidParamName);
                }
                match word {
                    ")" => {
                        match pending_type.take() {
                            None if comma_before => return Err(Problem::InvalidParamName),
                            Some(CType::Void) if signature.params.is_empty() => {}
                            Some(_) => return Err(Problem::InvalidParamName),
                            None => {}
                        }
                        phase = Phase::AfterParams;
                    }
                    "(" => return Err(Problem::TooManyParentheses),
                    "{" => return Err(Problem::EarlyEndOfParameters),
                    q if is_qualifier(q) => {
                        if pending_type.is_none() {
                            pending_type = Some(CType::Int);
                            pending_implied = true;
                        }
                    }
                    _ if CType::from_str(word).is_ok() => {
                        if pending_type.is_some() && !pending_implied {
                            return Err(Problem::InvalidParamName);
                        }
                        pending_type = CType::from_str(word).ok();
                        pending_implied = false;
                    }
                    _ => {
                        let Some(ty) = pending_type.take() else {
                            return Err(Problem::ParamWithoutType);
                        };
                        pending_implied = false;
                        if !is_identifier(word) || is_keyword(word) {
                            return Err(Problem::InvalidParamName);
                        }
                        if ty == CType::Void {
                            return Err(Problem::InvalidParamType(ty));
                        }
                        if signature.params.iter().any(|(_, name)| *name == word)
                            || globals.is_declared(word)
                        {
                            return Err(Problem::ParamAlreadyDeclared);
                        }
                        signature.params.push((ty, word));
                    }
                }
            }
            Phase::AfterParams => {
                if comma_before {
                    return Err(Problem::CommaOutsideParentheses);
                }
                match word {
                    "{" => body_opened = true,
                    ")" => return Err(Problem::ParenthesisNotOpened),
                    "(" => return Err(Problem::TooManyParentheses),
                    _ => return Err(Problem::TextAfterParameters),
                }
            }
        }
    }

    match phase {
        _ if body_opened => Ok(()),
        Phase::AfterParams => Err(Problem::BodyNotOpened),
        Phase::Head | Phase::Params => Err(Problem::DeclarationEndedEarly),
    }
}

/// State of one function body scan.
struct Body<'s, 'g> {
    name: Option<&'s str>,
    return_type: Option<CType>,
    params: Vec<CType>,
    valid: bool,
    globals: &'g Globals,
    scope: Scope<'g>,
    options: Options,
    saw_return: bool,
    depth: usize,
    /// The signature line had no `{`; the next one opens the body.
    awaiting_opener: bool,
}

impl<'s, 'g> Body<'s, 'g> {
    fn new(
        signature: &Signature<'s>,
        valid: bool,
        globals: &'g Globals,
        options: Options,
    ) -> Self {
        let mut scope = Scope::new(&globals.variables);
        for (ty, name) in &signature.params {
            scope.insert(Variable::new(*name, *ty));
        }
        Self {
            name: signature.name,
            return_type: signature.return_type,
            params: signature.params.iter().map(|(ty, _)| *ty).collect(),
            valid,
            globals,
            scope,
            options,
            saw_return: false,
            depth: 1,
            awaiting_opener: false,
        }
    }

    fn run(
        mut self,
        opener: SourceLine<'_>,
        cursor: &mut LineCursor<'_>,
        sink: &mut dyn Sink,
    ) -> Option<Function> {
        loop {
            let Some(line) = cursor.next_line() else {
                debug!(opened = opener.number, "input ended inside a function body");
                let last = cursor.last_line().unwrap_or(opener);
                report(sink, last, Problem::FunctionNeverClosed);
                return None;
            };

            let shape = self.classify(line.text);
            trace!(line = line.number, ?shape, "body line");
            match shape {
                LineShape::Blank => continue,
                LineShape::Comment => {
                    handle_comment(line, cursor, sink);
                    let Some(rest) = after_closed_comment(line.text) else {
                        continue;
                    };
                    if self.track_braces(rest) {
                        return self.close(line, cursor, sink);
                    }
                    continue;
                }
                LineShape::Close => {}
                LineShape::Open if self.awaiting_opener => {}
                LineShape::Open => report(sink, line, Problem::BlockNotUnderstood),
                _ => {
                    let outcome = self.dispatch(shape, line.text);
                    report(sink, line, outcome);
                }
            }

            let closed = self.track_braces(line.text);
            if shape == LineShape::Close && !closed {
                report(sink, line, Accepted::BlockEnd);
            }
            if closed {
                return self.close(line, cursor, sink);
            }
            if opens_block_comment(line.text) {
                consume_comment_block(line, cursor, sink);
            }
        }
    }

    fn classify<'l>(&self, text: &'l str) -> LineShape<'l> {
        let trimmed = text.trim_start();
        if trimmed.starts_with("//") || trimmed.starts_with("/*") {
            return LineShape::Comment;
        }
        let Some(first) = first_word(text) else {
            return LineShape::Blank;
        };

        match first {
            "}" => return LineShape::Close,
            "{" => return LineShape::Open,
            "return" => return LineShape::Return,
            _ => {}
        }
        if let Some(call) = IoCall::from_word(first) {
            return LineShape::Io(call);
        }
        if CType::from_str(first).is_ok() || is_qualifier(first) {
            return LineShape::Declaration;
        }
        if is_control_word(first) {
            return LineShape::Control;
        }

        let name = leading_identifier(first).unwrap_or(first);
        if self.scope.is_declared(name) {
            LineShape::Usage(name)
        } else if self.function_type(name).is_some() || INTERNAL_FUNCTIONS.contains(&name) {
            LineShape::Call
        } else {
            LineShape::Unknown(first)
        }
    }

    fn dispatch(&mut self, shape: LineShape<'_>, text: &str) -> Result<Accepted, Problem> {
        match shape {
            LineShape::Io(call) => check_io_call(text, call, &self.scope),
            LineShape::Return => {
                self.saw_return = true;
                let function_type = |name: &str| self.function_type(name);
                check_return(text, self.return_type, &self.scope, &function_type)
            }
            LineShape::Declaration => check_variable_declaration(code_part(text), &mut self.scope),
            LineShape::Usage(name) => check_assignment(text, name, &self.scope),
            LineShape::Call => Ok(Accepted::Call),
            LineShape::Control => Ok(Accepted::Control),
            LineShape::Unknown(word) if classify(word) == TokenKind::Invalid => {
                Err(Problem::InvalidLexeme(word.to_string()))
            }
            LineShape::Unknown(word) => Err(Problem::UnknownName(word.to_string())),
            LineShape::Blank | LineShape::Comment | LineShape::Close | LineShape::Open => {
                Ok(Accepted::BlockEnd)
            }
        }
    }

    /// Return type of a callable name, including the function being
    /// defined so recursion resolves.
    fn function_type(&self, name: &str) -> Option<CType> {
        if self.name == Some(name) {
            return self.return_type;
        }
        self.globals.function(name).map(|f| f.return_type)
    }

    /// Apply the line's braces to the nesting depth. Returns `true`
    /// once the function's own closing brace is reached.
    fn track_braces(&mut self, text: &str) -> bool {
        for brace in braces(code_part(text)) {
            match brace {
                '{' if self.awaiting_opener => self.awaiting_opener = false,
                '{' => self.depth += 1,
                '}' => {
                    self.depth -= 1;
                    if self.depth == 0 {
                        return true;
                    }
                }
                _ => {}
            }
        }
        false
    }

    /// Finish on the line holding the closing brace, then consume a
    /// block comment that line leaves open.
    fn close(
        self,
        line: SourceLine<'_>,
        cursor: &mut LineCursor<'_>,
        sink: &mut dyn Sink,
    ) -> Option<Function> {
        let function = self.finish(line, sink);
        if opens_block_comment(line.text) {
            consume_comment_block(line, cursor, sink);
        }
        function
    }

    fn finish(self, line: SourceLine<'_>, sink: &mut dyn Sink) -> Option<Function> {
        let (true, Some(name), Some(return_type)) = (self.valid, self.name, self.return_type)
        else {
            report(sink, line, Accepted::InvalidFunctionEnd);
            return None;
        };

        let needs_return = return_type != CType::Void || self.options.require_return_in_void;
        if needs_return && !self.saw_return {
            debug!(line = line.number, name, "function closed without return");
            report(sink, line, Problem::MissingReturn);
            return None;
        }

        report(sink, line, Accepted::FunctionEnd);
        Some(Function {
            name: name.to_string(),
            return_type,
            params: self.params,
        })
    }
}

/// The `{` and `}` of `code` that sit outside quoted literals.
fn braces(code: &str) -> impl Iterator<Item = char> + '_ {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    code.chars().filter(move |&ch| {
        if let Some(open) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == open {
                quote = None;
            }
            return false;
        }
        if ch == '"' || ch == '\'' {
            quote = Some(ch);
            return false;
        }
        ch == '{' || ch == '}'
    })
}

/// Text following a block comment that opens and closes at the start
/// of `text`.
fn after_closed_comment(text: &str) -> Option<&str> {
    let rest = text.trim_start().strip_prefix("/*")?;
    rest.find("*/").map(|at| &rest[at + 2..])
}

/// Check a line that starts with a known variable. Only the plain
/// `NAME = VALUE;` form with a literal or a single name on the right is
/// type-checked.
fn check_assignment(
    text: &str,
    name: &str,
    scope: &dyn VariableTable,
) -> Result<Accepted, Problem> {
    let statement = code_part(text).trim().trim_end_matches(';').trim_end();
    let Some((left, right)) = split_assignment(statement) else {
        return Ok(Accepted::VariableUsage);
    };
    if left.trim() != name {
        return Ok(Accepted::VariableUsage);
    }
    let Some(target) = scope.lookup(name) else {
        return Err(Problem::UnknownVariable(name.to_string()));
    };

    let value = right.trim();
    let compatible = if let Some(literal) = Literal::parse(value) {
        literal.fits(target.ty)
    } else if is_identifier(value) {
        let source = scope
            .lookup(value)
            .ok_or_else(|| Problem::UnknownVariable(value.to_string()))?;
        source.ty == target.ty
    } else {
        return Ok(Accepted::VariableUsage);
    };

    if compatible {
        Ok(Accepted::Assignment)
    } else {
        Err(Problem::AssignmentMismatch {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}
