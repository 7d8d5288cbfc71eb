//! `return` statement checks.

use crate::literal::{Literal, is_quoted};
use crate::scanner::{code_part, words};
use crate::symbols::VariableTable;
use crate::verdict::{Accepted, Problem};
use crate::vocabulary::{ARITHMETIC, CType, leading_identifier};

/// Check a `return` line against the enclosing function's type.
///
/// `expected` is `None` when the function signature was rejected
/// before a return type was found. `function_type` resolves the return
/// type of a callable name.
///
/// # Errors
///
/// A `Problem` describing the first mismatch.
pub fn check_return(
    line: &str,
    expected: Option<CType>,
    variables: &dyn VariableTable,
    function_type: &dyn Fn(&str) -> Option<CType>,
) -> Result<Accepted, Problem> {
    let statement = code_part(line).trim();
    let value = statement.strip_prefix("return").unwrap_or(statement);
    let value = strip_enclosing_parens(value.trim().trim_end_matches(';').trim_end());

    let Some(expected) = expected else {
        return Err(Problem::UnknownReturnType);
    };

    if value.is_empty() {
        return if expected == CType::Void {
            Ok(Accepted::Return)
        } else {
            Err(Problem::ReturnMismatch(expected))
        };
    }
    if expected == CType::Void {
        return Err(Problem::VoidReturnsValue);
    }
    if is_quoted(value) {
        return if expected == CType::Char {
            Ok(Accepted::Return)
        } else {
            Err(Problem::ReturnMismatch(expected))
        };
    }

    check_expression(value, expected, variables, function_type)?;
    Ok(Accepted::Return)
}

/// Numerals, names, and calls joined by arithmetic operators.
fn check_expression(
    value: &str,
    expected: CType,
    variables: &dyn VariableTable,
    function_type: &dyn Fn(&str) -> Option<CType>,
) -> Result<(), Problem> {
    let mismatch = || Problem::ReturnMismatch(expected);
    let fragments: Vec<&str> = words(value).collect();
    let mut has_decimal = false;
    let mut has_division = false;
    let mut i = 0;

    while i < fragments.len() {
        let fragment = fragments[i];
        i += 1;

        if ARITHMETIC.contains(&fragment) {
            has_division |= fragment == "/";
            continue;
        }
        if fragment == "(" || fragment == ")" {
            continue;
        }

        match Literal::parse(fragment) {
            Some(Literal::Integer) if expected.is_numeric() => continue,
            Some(Literal::Decimal) if expected.is_numeric() => {
                has_decimal = true;
                continue;
            }
            Some(_) => return Err(mismatch()),
            None => {}
        }

        let Some(name) = leading_identifier(fragment) else {
            return Err(mismatch());
        };
        let suffix = &fragment[name.len()..];
        if !(suffix.is_empty() || suffix.starts_with('[')) {
            return Err(mismatch());
        }

        let ty = if let Some(variable) = variables.lookup(name) {
            variable.ty
        } else if let Some(ty) = function_type(name) {
            if fragments.get(i) == Some(&"(") {
                i = skip_group(&fragments, i);
            }
            ty
        } else {
            return Err(Problem::UnknownReturnIdentifier(name.to_string()));
        };
        if ty != expected {
            return Err(mismatch());
        }
    }

    if has_decimal && expected == CType::Int {
        return Err(mismatch());
    }
    if has_division && expected == CType::Int {
        return Err(Problem::IntegerDivision);
    }
    Ok(())
}

/// Index just past the `)` matching the `(` at `open`.
fn skip_group(fragments: &[&str], open: usize) -> usize {
    let mut depth = 0usize;
    for (i, fragment) in fragments.iter().enumerate().skip(open) {
        match *fragment {
            "(" => depth += 1,
            ")" => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
    }
    fragments.len()
}

/// `(x + 1)` becomes `x + 1`; `(a) + (b)` is left alone.
fn strip_enclosing_parens(text: &str) -> &str {
    let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) else {
        return text;
    };
    let mut depth = 0i32;
    for ch in inner.chars() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return text;
                }
            }
            _ => {}
        }
    }
    inner.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{Scope, Variable};

    fn check(line: &str, expected: CType) -> Result<Accepted, Problem> {
        let globals = vec![Variable::new("MAX", CType::Int)];
        let mut scope = Scope::new(&globals);
        scope.insert(Variable::new("a", CType::Int));
        scope.insert(Variable::new("b", CType::Int));
        scope.insert(Variable::new("ratio", CType::Double));
        scope.insert(Variable::new("letter", CType::Char));
        let functions = |name: &str| (name == "square").then_some(CType::Int);
        check_return(line, Some(expected), &scope, &functions)
    }

    #[test]
    fn empty_return() {
        assert_eq!(check("return;", CType::Void), Ok(Accepted::Return));
        assert_eq!(check("return;", CType::Int), Err(Problem::ReturnMismatch(CType::Int)));
    }

    #[test]
    fn quoted_return() {
        assert_eq!(check("return 'x';", CType::Char), Ok(Accepted::Return));
        assert_eq!(
            check("return \"x\";", CType::Float),
            Err(Problem::ReturnMismatch(CType::Float))
        );
    }

    #[test]
    fn numeral_returns() {
        assert_eq!(check("return 0;", CType::Int), Ok(Accepted::Return));
        assert_eq!(check("return (0);", CType::Int), Ok(Accepted::Return));
        assert_eq!(check("return 2.5;", CType::Double), Ok(Accepted::Return));
        assert_eq!(check("return 7;", CType::Float), Ok(Accepted::Return));
        assert_eq!(
            check("return 2.5;", CType::Int),
            Err(Problem::ReturnMismatch(CType::Int))
        );
        assert_eq!(check("return 70 / 5;", CType::Int), Err(Problem::IntegerDivision));
        assert_eq!(check("return 70 / 5;", CType::Float), Ok(Accepted::Return));
        assert_eq!(
            check("return 1;", CType::Char),
            Err(Problem::ReturnMismatch(CType::Char))
        );
    }

    #[test]
    fn identifier_returns() {
        assert_eq!(check("return a+b;", CType::Int), Ok(Accepted::Return));
        assert_eq!(check("return MAX;", CType::Int), Ok(Accepted::Return));
        assert_eq!(check("return (letter);", CType::Char), Ok(Accepted::Return));
        assert_eq!(check("return square(a) + 1;", CType::Int), Ok(Accepted::Return));
        assert_eq!(
            check("return ratio;", CType::Int),
            Err(Problem::ReturnMismatch(CType::Int))
        );
        assert_eq!(
            check("return ghost;", CType::Int),
            Err(Problem::UnknownReturnIdentifier("ghost".into()))
        );
    }

    #[test]
    fn void_and_unknown() {
        assert_eq!(check("return a;", CType::Void), Err(Problem::VoidReturnsValue));
        let scope = Scope::new(&[]);
        assert_eq!(
            check_return("return 1;", None, &scope, &|_| None),
            Err(Problem::UnknownReturnType)
        );
    }

    #[test]
    fn trailing_comment_is_ignored() {
        assert_eq!(check("return a; // done", CType::Int), Ok(Accepted::Return));
    }
}
