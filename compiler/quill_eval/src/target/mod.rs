//! Target declarations.
//!
//! A call such as `group("name") { ... }` evaluates its block into a fresh
//! scope and hands that scope to a `TargetSink`. The sink reads the
//! variables it understands, which marks them used; the scope is closed
//! afterwards, so anything the sink ignored is reported as unused.

// Arc is the implementation of CollectingSink's shared target list
#![expect(
    clippy::disallowed_types,
    reason = "Arc is the implementation of CollectingSink"
)]

use std::sync::Arc;

use parking_lot::Mutex;
use quill_ir::{Span, StringInterner};

use crate::environment::{LocalScope, Scope, SearchMode};
use crate::errors::EvalError;

/// Everything a sink gets to see about one declaration.
pub struct TargetDeclaration<'a> {
    /// Function that declared the target (`executable`, `group`, ...).
    pub kind: &'a str,
    /// Target name, the call's only argument.
    pub name: &'a str,
    pub span: Span,
    /// Scope the block ran in. Still open.
    pub scope: &'a LocalScope<Scope>,
    pub interner: &'a StringInterner,
}

/// Receiver of declared targets.
pub trait TargetSink {
    /// Consume a declaration, reading variables through `decl.scope`.
    fn declare(&mut self, decl: &TargetDeclaration<'_>) -> Result<(), EvalError>;
}

/// A declared target as recorded by `CollectingSink`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub kind: String,
    pub name: String,
    pub span: Span,
    /// Known variables that were set, rendered in source syntax.
    pub variables: Vec<(String, String)>,
}

/// Variables every target kind understands.
const KNOWN_VARIABLES: &[&str] = &[
    "args",
    "data_deps",
    "deps",
    "inputs",
    "outputs",
    "public_deps",
    "script",
    "sources",
    "testonly",
    "visibility",
];

/// Sink that records targets in memory.
///
/// Clones share one list, so a test can keep a handle while the interpreter
/// owns the boxed sink.
#[derive(Clone, Debug, Default)]
pub struct CollectingSink {
    targets: Arc<Mutex<Vec<Target>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the targets declared so far.
    pub fn targets(&self) -> Vec<Target> {
        self.targets.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.targets.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.lock().is_empty()
    }
}

impl TargetSink for CollectingSink {
    fn declare(&mut self, decl: &TargetDeclaration<'_>) -> Result<(), EvalError> {
        let mut variables = Vec::new();
        for &var in KNOWN_VARIABLES {
            // Names nobody interned cannot be bound anywhere.
            let Some(name) = decl.interner.get(var) else {
                continue;
            };
            let value = decl.scope.borrow_mut().lookup(name, SearchMode::LocalOnly);
            if let Some(value) = value {
                variables.push((var.to_string(), value.display(decl.interner).to_string()));
            }
        }
        tracing::debug!(
            kind = decl.kind,
            name = decl.name,
            variables = variables.len(),
            "target declared"
        );
        self.targets.lock().push(Target {
            kind: decl.kind.to_string(),
            name: decl.name.to_string(),
            span: decl.span,
            variables,
        });
        Ok(())
    }
}
