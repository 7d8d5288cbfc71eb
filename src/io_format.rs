//! `printf` / `scanf` format-string checks.
//!
//! The format string is the first double-quoted substring of the
//! line. Every conversion specifier in it must line up, position by
//! position, with an argument whose declared type the specifier
//! accepts.

use crate::literal::Literal;
use crate::scanner::code_part;
use crate::symbols::VariableTable;
use crate::verdict::{Accepted, Problem};
use crate::vocabulary::{FORMAT_SPECIFIERS, SpecifierClass, leading_identifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoCall {
    Printf,
    Scanf,
}

impl IoCall {
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "printf" => Some(Self::Printf),
            "scanf" => Some(Self::Scanf),
            _ => None,
        }
    }

    const fn accepted(self) -> Accepted {
        match self {
            Self::Printf => Accepted::Printf,
            Self::Scanf => Accepted::Scanf,
        }
    }
}

/// Check a `printf(...)` or `scanf(...)` line.
///
/// # Errors
///
/// `MissingFormatString`, `SpecifierCountMismatch`, `UnknownVariable`,
/// or `WrongSpecifierType`.
pub fn check_io_call(
    line: &str,
    call: IoCall,
    variables: &dyn VariableTable,
) -> Result<Accepted, Problem> {
    let (format, rest) = split_format(code_part(line)).ok_or(Problem::MissingFormatString)?;
    let specifiers = specifiers(format, call);
    let arguments = arguments(rest);

    if specifiers.len() != arguments.len() {
        return Err(Problem::SpecifierCountMismatch);
    }

    for (argument, class) in arguments.iter().zip(specifiers) {
        check_argument(argument, class, call, variables)?;
    }
    Ok(call.accepted())
}

fn check_argument(
    argument: &str,
    class: SpecifierClass,
    call: IoCall,
    variables: &dyn VariableTable,
) -> Result<(), Problem> {
    if let Some(literal) = Literal::parse(argument) {
        return if class.accepts(literal.natural_type()) {
            Ok(())
        } else {
            Err(Problem::WrongSpecifierType(argument.to_string()))
        };
    }

    let target = match call {
        IoCall::Printf => argument.split('.').next().unwrap_or(argument),
        IoCall::Scanf => argument.trim_start_matches('&'),
    }
    .trim();
    let name = leading_identifier(target).unwrap_or(target);

    let variable = variables
        .lookup(name)
        .ok_or_else(|| Problem::UnknownVariable(name.to_string()))?;
    if class.accepts(variable.ty) {
        Ok(())
    } else {
        Err(Problem::WrongSpecifierType(name.to_string()))
    }
}

/// Split `printf("fmt", a, b);` into `fmt` and `, a, b);`.
fn split_format(code: &str) -> Option<(&str, &str)> {
    let open = code.find('"')?;
    let body = &code[open + 1..];
    let mut escaped = false;
    let close = body.char_indices().find_map(|(i, ch)| {
        if escaped {
            escaped = false;
            None
        } else if ch == '\\' {
            escaped = true;
            None
        } else {
            (ch == '"').then_some(i)
        }
    })?;
    Some((&body[..close], &body[close + 1..]))
}

/// Specifier classes in the order they appear in `format`.
fn specifiers(format: &str, call: IoCall) -> Vec<SpecifierClass> {
    let mut found = Vec::new();
    let mut rest = format;

    while let Some(at) = rest.find('%') {
        let tail = &rest[at..];
        if let Some(after) = tail.strip_prefix("%%") {
            rest = after;
        } else if let Some((text, class)) = FORMAT_SPECIFIERS
            .iter()
            .find(|(text, _)| tail.starts_with(text))
        {
            found.push(*class);
            rest = &tail[text.len()..];
        } else if let (IoCall::Scanf, Some(after)) = (call, tail.strip_prefix("%*")) {
            // Suppressed conversion: consumes input, not an argument.
            let skip = FORMAT_SPECIFIERS
                .iter()
                .find(|(text, _)| after.starts_with(&text[1..]))
                .map_or(0, |(text, _)| text.len() - 1);
            rest = &after[skip..];
        } else {
            rest = &tail[1..];
        }
    }
    found
}

/// Call arguments after the format string, with parentheses, double
/// quotes, and the terminator removed.
fn arguments(rest: &str) -> Vec<String> {
    let cleaned: String = rest
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '"' | ';'))
        .collect();
    cleaned
        .split(',')
        .map(str::trim)
        .filter(|argument| !argument.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{Scope, Variable};
    use crate::vocabulary::CType;

    fn check(line: &str) -> Result<Accepted, Problem> {
        let globals = vec![Variable::new("MAX_SIZE", CType::Int)];
        let mut scope = Scope::new(&globals);
        scope.insert(Variable::new("name", CType::Char));
        scope.insert(Variable::new("shift", CType::Int));
        scope.insert(Variable::new("ratio", CType::Double));
        let call = if line.trim_start().starts_with("scanf") {
            IoCall::Scanf
        } else {
            IoCall::Printf
        };
        check_io_call(line, call, &scope)
    }

    #[test]
    fn matching_printf() {
        assert_eq!(check("printf(\"hello\\n\");"), Ok(Accepted::Printf));
        assert_eq!(check("printf(\"%s %d\\n\", name, shift);"), Ok(Accepted::Printf));
        assert_eq!(check("printf  (\"limit %d\\n\",MAX_SIZE);"), Ok(Accepted::Printf));
        assert_eq!(check("printf(\"%lf\", ratio);"), Ok(Accepted::Printf));
        assert_eq!(check("printf(\"100%%\");"), Ok(Accepted::Printf));
    }

    #[test]
    fn wrong_type() {
        assert_eq!(
            check("printf(\"%d\", name);"),
            Err(Problem::WrongSpecifierType("name".into()))
        );
        assert_eq!(
            check("printf(\"%c\", 5);"),
            Err(Problem::WrongSpecifierType("5".into()))
        );
    }

    #[test]
    fn count_and_reference_problems() {
        assert_eq!(
            check("printf(\"%d %d\", shift);"),
            Err(Problem::SpecifierCountMismatch)
        );
        assert_eq!(
            check("printf(\"%d\", ghost);"),
            Err(Problem::UnknownVariable("ghost".into()))
        );
        assert_eq!(check("printf(shift);"), Err(Problem::MissingFormatString));
    }

    #[test]
    fn member_access_uses_base_name() {
        assert_eq!(check("printf(\"%s\", name.first);"), Ok(Accepted::Printf));
    }

    #[test]
    fn scanf_strips_address_of() {
        assert_eq!(check("scanf(\"%d\", &shift);"), Ok(Accepted::Scanf));
        assert_eq!(check("scanf   (\"%[^\\n]s\", &name);"), Ok(Accepted::Scanf));
        assert_eq!(check("scanf(\"%[^\\n]%*c\", name);"), Ok(Accepted::Scanf));
        assert_eq!(check("scanf(\"%*d %d\", &shift);"), Ok(Accepted::Scanf));
    }
}
