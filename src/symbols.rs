//! Symbol tables: imports, variables, and functions.
//!
//! [`Globals`] is owned by the analyzer for the whole run. A
//! [`Scope`] borrows the global variables and layers a function's
//! locals over them for the length of one body scan.

use std::collections::BTreeSet;

use crate::vocabulary::CType;

/// A declared variable or `#define` constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub ty: CType,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: CType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A successfully declared function. Parameter names are dropped once
/// the body has been checked; only their types are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub return_type: CType,
    pub params: Vec<CType>,
}

/// Header names accepted by `#include`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    names: BTreeSet<String>,
}

impl ImportSet {
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Record `name`. Returns `false` if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Read and insert access to a set of visible variables.
pub trait VariableTable {
    fn lookup(&self, name: &str) -> Option<&Variable>;

    /// Add a variable. Callers check for duplicates first.
    fn insert(&mut self, variable: Variable);

    fn is_declared(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

/// Tables that live for the whole run.
#[derive(Debug, Clone, Default)]
pub struct Globals {
    pub imports: ImportSet,
    pub variables: Vec<Variable>,
    pub functions: Vec<Function>,
}

impl Globals {
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }
}

impl VariableTable for Globals {
    fn lookup(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    fn insert(&mut self, variable: Variable) {
        self.variables.push(variable);
    }
}

/// Locals layered over a borrowed view of the globals.
#[derive(Debug)]
pub struct Scope<'g> {
    globals: &'g [Variable],
    locals: Vec<Variable>,
}

impl<'g> Scope<'g> {
    #[must_use]
    pub const fn new(globals: &'g [Variable]) -> Self {
        Self {
            globals,
            locals: Vec::new(),
        }
    }

    #[must_use]
    pub fn locals(&self) -> &[Variable] {
        &self.locals
    }
}

impl VariableTable for Scope<'_> {
    fn lookup(&self, name: &str) -> Option<&Variable> {
        self.locals
            .iter()
            .find(|v| v.name == name)
            .or_else(|| self.globals.iter().find(|v| v.name == name))
    }

    fn insert(&mut self, variable: Variable) {
        self.locals.push(variable);
    }
}
