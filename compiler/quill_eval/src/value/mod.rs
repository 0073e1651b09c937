//! Runtime values.
//!
//! A closed sum over the six kinds a build file can produce. Scope values are
//! handles (`LocalScope<Scope>`), so two values can name the same scope; the
//! interpreter hands out detached copies on ordinary reads to keep value
//! semantics at the language level.

use std::fmt;

use quill_ir::StringInterner;
use rustc_hash::FxHashMap;

use crate::environment::{LocalScope, Scope};

/// The kind of a value, as named in type errors.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ValueKind {
    Bool,
    Int,
    Str,
    List,
    Map,
    Scope,
}

impl ValueKind {
    /// Name used in diagnostics ("integer", "scope", ...).
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Bool => "boolean",
            ValueKind::Int => "integer",
            ValueKind::Str => "string",
            ValueKind::List => "list",
            ValueKind::Map => "map",
            ValueKind::Scope => "scope",
        }
    }

    /// Indefinite article for the kind name.
    pub fn article(self) -> &'static str {
        match self {
            ValueKind::Int => "an",
            _ => "a",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Value>),
    Map(FxHashMap<String, Value>),
    Scope(LocalScope<Scope>),
}

impl Value {
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// A list of strings.
    pub fn string_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(items.into_iter().map(|s| Value::Str(s.into())).collect())
    }

    /// A fresh scope value wrapping `scope`.
    pub fn scope(scope: Scope) -> Self {
        Value::Scope(LocalScope::new(scope))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Str(_) => ValueKind::Str,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
            Value::Scope(_) => ValueKind::Scope,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// The scope handle, sharing identity with the stored scope.
    pub fn as_scope(&self) -> Option<&LocalScope<Scope>> {
        match self {
            Value::Scope(scope) => Some(scope),
            _ => None,
        }
    }

    /// Copy this value so that no scope inside it is shared with the
    /// original. Bindings keep their used flags; parents stay shared.
    #[must_use]
    pub fn detached(&self) -> Value {
        match self {
            Value::List(items) => Value::List(items.iter().map(Value::detached).collect()),
            Value::Map(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.detached()))
                    .collect(),
            ),
            Value::Scope(scope) => Value::scope(scope.borrow().detached_copy()),
            Value::Bool(_) | Value::Int(_) | Value::Str(_) => self.clone(),
        }
    }

    /// Render in source syntax. Scope keys need the interner.
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> ValueDisplay<'a> {
        ValueDisplay {
            value: self,
            interner,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Scope(a), Value::Scope(b)) => {
                LocalScope::ptr_eq(a, b) || a.borrow().same_values(&b.borrow())
            }
            _ => false,
        }
    }
}

/// `Display` adapter returned by [`Value::display`].
pub struct ValueDisplay<'a> {
    value: &'a Value,
    interner: &'a StringInterner,
}

impl fmt::Display for ValueDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item.display(self.interner))?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                let mut keys: Vec<&String> = entries.keys().collect();
                keys.sort();
                f.write_str("{")?;
                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {key:?}: {}", entries[key].display(self.interner))?;
                }
                f.write_str(" }")
            }
            Value::Scope(scope) => {
                let scope = scope.borrow();
                let mut entries: Vec<(&'static str, Value)> = scope
                    .local_values()
                    .into_iter()
                    .map(|(name, value)| (self.interner.lookup(name), value))
                    .collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                f.write_str("{")?;
                for (i, (name, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {name} = {}", value.display(self.interner))?;
                }
                f.write_str(" }")
            }
        }
    }
}
