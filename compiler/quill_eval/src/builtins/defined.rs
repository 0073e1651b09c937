//! `defined(identifier)` and `defined(scope.member)`.

use quill_ir::{ExprId, ExprKind, Span};

use crate::environment::SearchMode;
use crate::errors::{arity_mismatch, not_an_identifier, type_mismatch, EvalError};
use crate::value::{Value, ValueKind};
use crate::Interpreter;

impl Interpreter<'_> {
    /// Whether the argument names something.
    ///
    /// The tested variable is peeked, not read, so it stays unused. The base
    /// of an accessor is read like any other identifier. A missing base makes
    /// the accessor undefined rather than an error.
    pub(crate) fn run_defined(&mut self, args: &[ExprId], span: Span) -> Result<Value, EvalError> {
        let [arg] = args else {
            return Err(arity_mismatch("defined", "exactly one argument").with_span(span));
        };
        let arena = self.arena;
        let expr = arena.expr(*arg);
        match expr.kind {
            ExprKind::Ident(name) => {
                let current = self.env.current();
                let found = current.borrow().peek(name, SearchMode::SearchNested).is_some();
                Ok(Value::Bool(found))
            }
            ExprKind::Accessor { base, member } => {
                let Some(base_value) = self.env.lookup(base) else {
                    return Ok(Value::Bool(false));
                };
                let Value::Scope(scope) = &base_value else {
                    return Err(type_mismatch(ValueKind::Scope, &base_value, self.interner)
                        .with_span(expr.span));
                };
                let found = scope.borrow().peek(member, SearchMode::SearchNested).is_some();
                Ok(Value::Bool(found))
            }
            _ => Err(not_an_identifier("an identifier or a scope accessor").with_span(expr.span)),
        }
    }
}
