//! Tree-walking interpreter for Quill build files.
//!
//! # Architecture
//!
//! - `eval` - statements and expressions
//! - `call` - call dispatch, template invocation, target declarations
//! - `scope_guard` - RAII scope push/pop with explicit close
//! - `crate::builtins` - built-in functions, as `impl Interpreter` blocks
//!
//! # Scope lifecycle
//!
//! Blocks that own a scope (template invocations, template bodies, target
//! declarations) push it through a `ScopedInterpreter`. When the block
//! finishes normally the guard closes the scope and the unused bindings are
//! queued as diagnostics. When evaluation fails the guard is dropped
//! instead, which pops the scope without reporting anything.

mod builder;
mod call;
mod eval;
mod scope_guard;

pub use builder::{InterpreterBuilder, DEFAULT_TARGET_KINDS};
pub use scope_guard::ScopedInterpreter;

use quill_diagnostic::{Diagnostic, DiagnosticQueue, ErrorGuaranteed};
use quill_ir::{AstArena, BlockId, Name, Span, StringInterner};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::diagnostics::report_unused;
use crate::environment::{Environment, LocalScope, Scope, UnusedBinding};
use crate::target::TargetSink;

/// A recorded `template("name") { body }`.
#[derive(Clone, Debug)]
pub(crate) struct Template {
    pub(crate) body: BlockId,
    /// Scope the template was defined in; parent of every body scope.
    pub(crate) closure: LocalScope<Scope>,
    /// Definition site.
    pub(crate) span: Span,
}

/// Names the interpreter defines itself.
#[derive(Copy, Clone, Debug)]
pub(crate) struct InternedNames {
    pub(crate) invoker: Name,
    pub(crate) target_name: Name,
}

impl InternedNames {
    fn new(interner: &StringInterner) -> Self {
        InternedNames {
            invoker: interner.intern("invoker"),
            target_name: interner.intern("target_name"),
        }
    }
}

/// Tree-walking interpreter.
///
/// One interpreter evaluates one file: it owns the scope tree, the
/// template table and the diagnostic queue.
pub struct Interpreter<'a> {
    pub(crate) interner: &'a StringInterner,
    pub(crate) arena: &'a AstArena,
    pub(crate) env: Environment,
    pub(crate) templates: FxHashMap<Name, Template>,
    pub(crate) diagnostics: DiagnosticQueue,
    pub(crate) target_kinds: FxHashSet<Name>,
    pub(crate) target_sink: Box<dyn TargetSink>,
    pub(crate) check_root_scope: bool,
    pub(crate) names: InternedNames,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter with the default configuration.
    pub fn new(interner: &'a StringInterner, arena: &'a AstArena) -> Self {
        InterpreterBuilder::new(interner, arena).build()
    }

    /// Evaluate a whole file in the root scope.
    ///
    /// Evaluation stops at the first error, which is queued as a
    /// diagnostic. On success the root scope is closed too if the
    /// interpreter was built with `check_root_scope(true)`. Returns an
    /// error if any error diagnostic was queued, including unused
    /// variables.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self, root: BlockId) -> Result<(), ErrorGuaranteed> {
        match self.eval_block(root) {
            Ok(()) => {
                if self.check_root_scope {
                    let unused = self.env.root().borrow_mut().close();
                    self.report_unused(unused);
                }
            }
            Err(err) => {
                tracing::debug!(message = err.message.as_str(), "evaluation failed");
                self.diagnostics.push(err.to_diagnostic());
            }
        }
        match self.diagnostics.has_errors() {
            Some(guarantee) => Err(guarantee),
            None => Ok(()),
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    /// Whether a template with this name has been defined.
    pub fn has_template(&self, name: Name) -> bool {
        self.templates.contains_key(&name)
    }

    /// Diagnostics queued so far.
    pub fn diagnostics(&self) -> &DiagnosticQueue {
        &self.diagnostics
    }

    /// Drain queued diagnostics, ordered by source position.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.flush()
    }

    /// Close a scope held outside the environment stack and report it.
    pub(crate) fn close_and_report(&mut self, scope: &LocalScope<Scope>) {
        let unused = scope.borrow_mut().close();
        self.report_unused(unused);
    }

    pub(crate) fn report_unused(&mut self, unused: Option<Vec<UnusedBinding>>) {
        if let Some(unused) = unused {
            report_unused(&mut self.diagnostics, self.interner, &unused);
        }
    }
}
