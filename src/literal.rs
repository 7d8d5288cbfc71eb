//! Scalar literal recognition shared by `#define`, assignments, and
//! `return`.

use crate::vocabulary::CType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    /// `42`, `-7`, `0x1F`.
    Integer,
    /// `3.14`, `1e3`, `2.0`.
    Decimal,
    /// `'c'` or `"text"`.
    Quoted,
}

impl Literal {
    /// Recognise `text` as a single literal.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if is_quoted(text) {
            return Some(Self::Quoted);
        }
        if is_integer(text) {
            return Some(Self::Integer);
        }
        let starts_numeric = text
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));
        match text.parse::<f64>() {
            Ok(value) if starts_numeric && value.is_finite() => Some(Self::Decimal),
            _ => None,
        }
    }

    /// The type a `#define` of this literal receives.
    #[must_use]
    pub const fn natural_type(self) -> CType {
        match self {
            Self::Integer => CType::Int,
            Self::Decimal => CType::Float,
            Self::Quoted => CType::Char,
        }
    }

    /// Returns `true` if this literal may be stored in, or returned
    /// as, a value of type `ty`.
    #[must_use]
    pub const fn fits(self, ty: CType) -> bool {
        match self {
            Self::Integer => ty.is_numeric(),
            Self::Decimal => ty.is_floating(),
            Self::Quoted => matches!(ty, CType::Char),
        }
    }
}

/// Returns `true` for `"..."` and `'...'`.
#[must_use]
pub fn is_quoted(text: &str) -> bool {
    text.len() >= 2
        && ((text.starts_with('"') && text.ends_with('"'))
            || (text.starts_with('\'') && text.ends_with('\'')))
}

fn is_integer(text: &str) -> bool {
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        return i64::from_str_radix(hex, 16).is_ok();
    }
    !unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit())
}

/// Type given to a `#define` value: integers are `int`, other numbers
/// `float`, anything else `char`.
#[must_use]
pub fn constant_type(value: &str) -> CType {
    Literal::parse(value).map_or(CType::Char, Literal::natural_type)
}
