//! Fixed word lists for the supported C subset.
//!
//! Everything the scanner, tokenizer, and handlers need to recognise
//! lives here as compile-time tables. Nothing in this module holds
//! state.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Characters that end a word and are then dropped.
pub const SEPARATORS: &[char] = &[' ', '\t', '\n', '\r', '\u{0B}', '\u{0C}', '\0', ','];

/// End-of-statement marker, dropped like a separator.
pub const TERMINATOR: char = ';';

/// Single-character symbols that are always their own fragment.
pub const PUNCTUATION: &[char] = &[
    '+', '-', '*', '/', '%', '=', '<', '>', '!', '&', '|', '{', '}', '(', ')',
];

/// Arithmetic operators accepted inside return and assignment values.
pub const ARITHMETIC: &[&str] = &["+", "-", "*", "/", "%"];

pub const QUALIFIERS: &[&str] = &["long", "short", "unsigned", "signed", "const", "static"];

pub const CONTROL_WORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "break", "continue",
];

pub const DIRECTIVES: &[&str] = &["#include", "#define"];

pub const BUILTINS: &[&str] = &["printf", "scanf", "system"];

/// Built-in functions that may be called without a prior declaration.
pub const INTERNAL_FUNCTIONS: &[&str] = &["system"];

/// Returns `true` if `word` is a reserved keyword.
#[must_use]
pub fn is_keyword(word: &str) -> bool {
    CType::from_str(word).is_ok()
        || word == "return"
        || QUALIFIERS.contains(&word)
        || CONTROL_WORDS.contains(&word)
        || DIRECTIVES.contains(&word)
        || BUILTINS.contains(&word)
}

/// Returns `true` if `word` is exactly one punctuation symbol.
#[must_use]
pub fn is_punctuation(word: &str) -> bool {
    let mut chars = word.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if PUNCTUATION.contains(&c))
}

#[must_use]
pub fn is_qualifier(word: &str) -> bool {
    QUALIFIERS.contains(&word)
}

#[must_use]
pub fn is_control_word(word: &str) -> bool {
    CONTROL_WORDS.contains(&word)
}

const fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

const fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Length in bytes of the identifier at the start of `text`, if any.
///
/// Mirrors the unanchored `^[A-Za-z_$][A-Za-z0-9_$]*` pattern: only the
/// prefix has to look like an identifier.
#[must_use]
pub fn identifier_prefix_len(text: &str) -> Option<usize> {
    let first = text.chars().next()?;
    if !is_identifier_start(first) {
        return None;
    }
    Some(
        text.char_indices()
            .find(|&(_, c)| !is_identifier_char(c))
            .map_or(text.len(), |(i, _)| i),
    )
}

/// The identifier at the start of `text` (`phrase[i]` gives `phrase`).
#[must_use]
pub fn leading_identifier(text: &str) -> Option<&str> {
    identifier_prefix_len(text).map(|len| &text[..len])
}

/// Returns `true` if `text` starts like an identifier.
#[must_use]
pub fn looks_like_identifier(text: &str) -> bool {
    identifier_prefix_len(text).is_some()
}

/// Returns `true` if the whole of `text` is an identifier.
#[must_use]
pub fn is_identifier(text: &str) -> bool {
    identifier_prefix_len(text) == Some(text.len())
}

/// Returns `true` if `text` is a non-empty run of ASCII digits.
#[must_use]
pub fn is_number(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Scalar types of the subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CType {
    Int,
    Float,
    Double,
    Char,
    Void,
}

impl CType {
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float | Self::Double)
    }

    #[must_use]
    pub const fn is_floating(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Double => "double",
            Self::Char => "char",
            Self::Void => "void",
        }
    }
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a word is not one of the five type keywords.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a type keyword: {0}")]
pub struct NotAType(pub String);

impl FromStr for CType {
    type Err = NotAType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "double" => Ok(Self::Double),
            "char" => Ok(Self::Char),
            "void" => Ok(Self::Void),
            other => Err(NotAType(other.to_string())),
        }
    }
}

/// Which family of types a format specifier accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierClass {
    Integer,
    Floating,
    Character,
}

impl SpecifierClass {
    /// Returns `true` if a variable declared as `ty` may be used with
    /// a specifier of this class.
    #[must_use]
    pub const fn accepts(self, ty: CType) -> bool {
        match self {
            Self::Integer => matches!(ty, CType::Int),
            Self::Floating => ty.is_floating(),
            Self::Character => matches!(ty, CType::Char),
        }
    }
}

/// Recognised conversion specifiers, longest first so that prefix
/// matching picks `%[^\n]%*c` over `%[^\n]s` and `%lf` over `%li`.
pub const FORMAT_SPECIFIERS: &[(&str, SpecifierClass)] = &[
    ("%[^\\n]%*c", SpecifierClass::Character),
    ("%[^\\n]s", SpecifierClass::Character),
    ("%hi", SpecifierClass::Integer),
    ("%hd", SpecifierClass::Integer),
    ("%hu", SpecifierClass::Integer),
    ("%li", SpecifierClass::Integer),
    ("%lu", SpecifierClass::Integer),
    ("%lf", SpecifierClass::Floating),
    ("%d", SpecifierClass::Integer),
    ("%i", SpecifierClass::Integer),
    ("%u", SpecifierClass::Integer),
    ("%f", SpecifierClass::Floating),
    ("%c", SpecifierClass::Character),
    ("%s", SpecifierClass::Character),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_cover_every_group() {
        for word in ["int", "void", "unsigned", "while", "return", "#define", "scanf"] {
            assert!(is_keyword(word), "{word} should be a keyword");
        }
        assert!(!is_keyword("main"));
    }

    #[test]
    fn identifier_prefix_is_unanchored() {
        assert_eq!(leading_identifier("phrase[i]"), Some("phrase"));
        assert_eq!(leading_identifier("$tmp_1"), Some("$tmp_1"));
        assert_eq!(leading_identifier("9lives"), None);
        assert!(is_identifier("abc_9"));
        assert!(!is_identifier("a.b"));
    }

    #[test]
    fn ctype_round_trips_through_text() {
        for ty in [CType::Int, CType::Float, CType::Double, CType::Char, CType::Void] {
            assert_eq!(ty.as_str().parse::<CType>(), Ok(ty));
        }
        assert!("long".parse::<CType>().is_err());
    }

    #[test]
    fn specifier_classes() {
        assert!(SpecifierClass::Floating.accepts(CType::Double));
        assert!(!SpecifierClass::Integer.accepts(CType::Char));
        assert!(SpecifierClass::Character.accepts(CType::Char));
    }
}
