//! Verdicts: the per-line outcomes the analyzer reports.

use std::fmt;

use serde::Serialize;
use serde::ser::SerializeStruct;

use crate::cursor::SourceLine;
use crate::vocabulary::CType;

/// Taxonomy of problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemClass {
    /// Unrecognised character or lexeme shape.
    Lexical,
    /// Duplicate or malformed import, constant, function, or variable.
    Declaration,
    /// Unbalanced delimiters or a block where a statement was expected.
    Structural,
    /// Return, assignment, or format-specifier type mismatch.
    Type,
    /// Use of an undeclared name.
    Reference,
}

/// Something wrong with a line. The `Display` text is the verdict
/// message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Problem {
    #[error("ERROR: invalid token: {0}")]
    InvalidLexeme(String),

    #[error("ERROR: no import")]
    NoImport,
    #[error("ERROR: too many imports")]
    TooManyImports,
    #[error("ERROR: import already declared")]
    ImportAlreadyDeclared,
    #[error("ERROR: wrong const syntax")]
    WrongConstSyntax,
    #[error("ERROR: invalid const name")]
    InvalidConstName,
    #[error("ERROR: const already declared")]
    ConstAlreadyDeclared,
    #[error("ERROR: invalid function name")]
    InvalidFunctionName,
    #[error("ERROR: function already declared")]
    FunctionAlreadyDeclared,
    #[error("ERROR: missing return type")]
    MissingReturnType,
    #[error("ERROR: invalid param name")]
    InvalidParamName,
    #[error("ERROR: parameter without a type")]
    ParamWithoutType,
    #[error("ERROR: parameter already declared")]
    ParamAlreadyDeclared,
    #[error("ERROR: invalid param type {0}")]
    InvalidParamType(CType),
    #[error("ERROR: variable already declared: {0}")]
    VariableAlreadyDeclared(String),
    #[error("ERROR: variables cannot be void")]
    VoidVariable,
    #[error("ERROR: invalid variable name: {0}")]
    InvalidVariableName(String),
    #[error("ERROR: missing variable name")]
    MissingVariableName,

    #[error("ERROR: there's text after the end of the comment block")]
    TextAfterCommentBlock,
    #[error("ERROR: comment block never closed")]
    UnclosedCommentBlock,
    #[error("ERROR: parameter parenthesis did not open")]
    ParenthesisNotOpened,
    #[error("ERROR: comma outside ()")]
    CommaOutsideParentheses,
    #[error("ERROR: too many (")]
    TooManyParentheses,
    #[error("ERROR: too early end of function declaration")]
    EarlyEndOfParameters,
    #[error("ERROR: function declaration ended too early")]
    DeclarationEndedEarly,
    #[error("ERROR: unexpected text after parameter list")]
    TextAfterParameters,
    #[error("ERROR: function body did not open")]
    BodyNotOpened,
    #[error("ERROR: block inside a function not understood")]
    BlockNotUnderstood,
    #[error("ERROR: function never closed")]
    FunctionNeverClosed,
    #[error("ERROR: Function ended without return statement")]
    MissingReturn,
    #[error("ERROR: unexpected operator before variable name")]
    OperatorBeforeName,
    #[error("ERROR: unexpected closing brace")]
    UnexpectedClosingBrace,
    #[error("ERROR: statement outside of a function: {0}")]
    StatementOutsideFunction(String),
    #[error("ERROR: missing format string")]
    MissingFormatString,
    #[error("ERROR: number of specifiers and arguments do not match")]
    SpecifierCountMismatch,

    #[error("ERROR: wrong type specified for {0}")]
    WrongSpecifierType(String),
    #[error("ERROR: type mismatch assigning {value} to {name}")]
    AssignmentMismatch { name: String, value: String },
    #[error("ERROR: return does not match type {0}")]
    ReturnMismatch(CType),
    #[error("ERROR: void function cannot return a value")]
    VoidReturnsValue,
    #[error("ERROR: integer division in a function returning int")]
    IntegerDivision,
    #[error("ERROR: return type of the enclosing function is unknown")]
    UnknownReturnType,

    #[error("ERROR: unknown identifier or function: {0}")]
    UnknownName(String),
    #[error("ERROR: unknown variable {0}")]
    UnknownVariable(String),
    #[error("ERROR: unknown identifier in return: {0}")]
    UnknownReturnIdentifier(String),
}

impl Problem {
    #[must_use]
    pub const fn class(&self) -> ProblemClass {
        match self {
            Self::InvalidLexeme(_) => ProblemClass::Lexical,
            Self::NoImport
            | Self::TooManyImports
            | Self::ImportAlreadyDeclared
            | Self::WrongConstSyntax
            | Self::InvalidConstName
            | Self::ConstAlreadyDeclared
            | Self::InvalidFunctionName
            | Self::FunctionAlreadyDeclared
            | Self::MissingReturnType
            | Self::InvalidParamName
            | Self::ParamWithoutType
            | Self::ParamAlreadyDeclared
            | Self::InvalidParamType(_)
            | Self::VariableAlreadyDeclared(_)
            | Self::VoidVariable
            | Self::InvalidVariableName(_)
            | Self::MissingVariableName => ProblemClass::Declaration,
            Self::TextAfterCommentBlock
            | Self::UnclosedCommentBlock
            | Self::ParenthesisNotOpened
            | Self::CommaOutsideParentheses
            | Self::TooManyParentheses
            | Self::EarlyEndOfParameters
            | Self::DeclarationEndedEarly
            | Self::TextAfterParameters
            | Self::BodyNotOpened
            | Self::BlockNotUnderstood
            | Self::FunctionNeverClosed
            | Self::MissingReturn
            | Self::OperatorBeforeName
            | Self::UnexpectedClosingBrace
            | Self::StatementOutsideFunction(_)
            | Self::MissingFormatString
            | Self::SpecifierCountMismatch => ProblemClass::Structural,
            Self::WrongSpecifierType(_)
            | Self::AssignmentMismatch { .. }
            | Self::ReturnMismatch(_)
            | Self::VoidReturnsValue
            | Self::IntegerDivision
            | Self::UnknownReturnType => ProblemClass::Type,
            Self::UnknownName(_) | Self::UnknownVariable(_) | Self::UnknownReturnIdentifier(_) => {
                ProblemClass::Reference
            }
        }
    }
}

/// A line that passed its check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accepted {
    Comment,
    CommentBlockLine,
    CommentBlockEnd,
    Import,
    Constant,
    VariableDeclaration,
    FunctionDeclaration,
    FunctionEnd,
    BlockEnd,
    /// Closing brace of a function whose signature was rejected.
    InvalidFunctionEnd,
    Printf,
    Scanf,
    Return,
    Assignment,
    VariableUsage,
    Call,
    /// `if`, `for`, `case`, ...: recognised but not checked.
    Control,
}

impl fmt::Display for Accepted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Comment => "valid comment",
            Self::CommentBlockLine => "line is part of a comment block",
            Self::CommentBlockEnd => "valid end of comment block",
            Self::Import => "valid import",
            Self::Constant => "valid constant declaration",
            Self::VariableDeclaration => "valid variable declaration",
            Self::FunctionDeclaration => "valid function declaration",
            Self::FunctionEnd => "valid end of function",
            Self::BlockEnd => "valid end of block",
            Self::InvalidFunctionEnd => "end of invalid function body",
            Self::Printf => "valid printf statement",
            Self::Scanf => "valid scanf statement",
            Self::Return => "valid return statement",
            Self::Assignment => "valid assignment",
            Self::VariableUsage => "valid variable usage",
            Self::Call => "valid function call",
            Self::Control => "control statement not analyzed",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted(Accepted),
    Rejected(Problem),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted(note) => note.fmt(f),
            Self::Rejected(problem) => problem.fmt(f),
        }
    }
}

impl From<Accepted> for Outcome {
    fn from(note: Accepted) -> Self {
        Self::Accepted(note)
    }
}

impl From<Problem> for Outcome {
    fn from(problem: Problem) -> Self {
        Self::Rejected(problem)
    }
}

impl From<Result<Accepted, Problem>> for Outcome {
    fn from(result: Result<Accepted, Problem>) -> Self {
        match result {
            Ok(note) => Self::Accepted(note),
            Err(problem) => Self::Rejected(problem),
        }
    }
}

/// One reported outcome attached to a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub line_number: usize,
    pub line_text: String,
    pub outcome: Outcome,
}

impl Verdict {
    pub fn new(line: SourceLine<'_>, outcome: impl Into<Outcome>) -> Self {
        Self {
            line_number: line.number,
            line_text: line.text.to_string(),
            outcome: outcome.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> String {
        self.outcome.to_string()
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Rejected(_))
    }

    #[must_use]
    pub const fn problem(&self) -> Option<&Problem> {
        match &self.outcome {
            Outcome::Rejected(problem) => Some(problem),
            Outcome::Accepted(_) => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line_number, self.outcome)
    }
}

impl Serialize for Verdict {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Verdict", 5)?;
        state.serialize_field("line_number", &self.line_number)?;
        state.serialize_field("line_text", &self.line_text)?;
        state.serialize_field("message", &self.message())?;
        state.serialize_field("is_error", &self.is_error())?;
        state.serialize_field("class", &self.problem().map(Problem::class))?;
        state.end()
    }
}

/// Destination for verdicts.
pub trait Sink {
    fn report(&mut self, verdict: Verdict);
}

impl Sink for Vec<Verdict> {
    fn report(&mut self, verdict: Verdict) {
        self.push(verdict);
    }
}

/// Shorthand used by the handlers.
pub(crate) fn report(sink: &mut dyn Sink, line: SourceLine<'_>, outcome: impl Into<Outcome>) {
    sink.report(Verdict::new(line, outcome));
}
