//! RAII-style scope guards for Interpreter environment management.
//!
//! A [`ScopedInterpreter`] pushes a scope and guarantees it is popped again.
//! How it is popped is the point: `close()` runs the unused-variable pass,
//! `detach()` hands the still-open scope back to the caller, and dropping
//! the guard (an error was propagated with `?`, or a panic unwound) abandons
//! the scope without diagnostics.
//!
//! # Usage
//!
//! ```text
//! let mut scoped = interpreter.scoped();
//! scoped.eval_block(block)?;   // on error: scope abandoned
//! scoped.close();              // on success: unused variables reported
//! ```

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use crate::environment::{LocalScope, Scope};

/// RAII guard that pops the scope it pushed.
///
/// Access the interpreter through this guard - it implements `Deref` and `DerefMut`.
pub struct ScopedInterpreter<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
    scope: LocalScope<Scope>,
    finished: bool,
}

impl ScopedInterpreter<'_, '_> {
    /// The scope this guard pushed.
    pub fn scope(&self) -> &LocalScope<Scope> {
        &self.scope
    }

    /// Pop and close the scope, queueing its unused bindings.
    pub fn close(mut self) {
        self.finished = true;
        let unused = self.interpreter.env.close_scope();
        self.interpreter.report_unused(unused);
    }

    /// Pop the scope without closing it and return it.
    ///
    /// The caller becomes responsible for closing it (or for letting it
    /// live on as a value).
    pub fn detach(mut self) -> LocalScope<Scope> {
        self.finished = true;
        self.interpreter.env.pop_scope();
        self.scope.clone()
    }
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::trace!("abandoning scope");
            self.interpreter.env.pop_scope();
        }
    }
}

impl<'interp> Deref for ScopedInterpreter<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'a> Interpreter<'a> {
    /// Push a scope whose parent is the current scope.
    pub fn scoped(&mut self) -> ScopedInterpreter<'_, 'a> {
        self.env.push_scope();
        self.guard_current()
    }

    /// Push a scope with an explicit parent.
    pub fn scoped_with_parent(&mut self, parent: LocalScope<Scope>) -> ScopedInterpreter<'_, 'a> {
        self.env.push_scope_with_parent(parent);
        self.guard_current()
    }

    fn guard_current(&mut self) -> ScopedInterpreter<'_, 'a> {
        let scope = self.env.current();
        ScopedInterpreter {
            interpreter: self,
            scope,
            finished: false,
        }
    }
}

#[cfg(test)]
mod tests;
