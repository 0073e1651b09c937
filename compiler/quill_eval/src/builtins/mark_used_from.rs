//! `mark_used_from` and its alias `not_needed`.

use quill_ir::{ExprId, Span};
use rustc_hash::FxHashSet;

use super::Selector;
use crate::environment::{LocalScope, Scope, SearchMode};
use crate::errors::{arity_mismatch, EvalError};
use crate::value::Value;
use crate::Interpreter;

impl Interpreter<'_> {
    /// `mark_used_from(from_scope, "*" | [names], [exclusions])`
    pub(crate) fn run_mark_used_from(
        &mut self,
        args: &[ExprId],
        span: Span,
    ) -> Result<(), EvalError> {
        if !(2..=3).contains(&args.len()) {
            return Err(
                arity_mismatch("mark_used_from", "two or three arguments").with_span(span)
            );
        }
        let source = self.resolve_source_scope(args[0])?;
        self.mark_used_in(&source, args[1], args.get(2).copied())
    }

    /// `not_needed(from_scope, "*" | [names], [exclusions])`, or
    /// `not_needed("*" | [names], [exclusions])` on the current scope.
    ///
    /// With two arguments the form is chosen by value: the scope form
    /// applies only when the first argument names a scope, so
    /// `not_needed(ignore, [])` with `ignore` bound to a list targets the
    /// current scope.
    pub(crate) fn run_not_needed(
        &mut self,
        args: &[ExprId],
        span: Span,
    ) -> Result<(), EvalError> {
        let arena = self.arena;
        let first_is_scope = match args.first().and_then(|&arg| arena.expr(arg).as_ident()) {
            Some(name) => {
                let value = self.env.current().borrow().peek(name, SearchMode::SearchNested);
                matches!(value, Some(Value::Scope(_)))
            }
            None => false,
        };

        match args.len() {
            1 => {
                let current = self.env.current();
                self.mark_used_in(&current, args[0], None)
            }
            2 if !first_is_scope => {
                let current = self.env.current();
                self.mark_used_in(&current, args[0], Some(args[1]))
            }
            2 | 3 => {
                let source = self.resolve_source_scope(args[0])?;
                self.mark_used_in(&source, args[1], args.get(2).copied())
            }
            _ => Err(arity_mismatch("not_needed", "one to three arguments").with_span(span)),
        }
    }

    /// Shared tail of both forms.
    ///
    /// The exclusion list is validated before the selector. `"*"` marks the
    /// source's own bindings only; listed names are looked up through the
    /// source's enclosing scopes, and missing ones are ignored.
    fn mark_used_in(
        &mut self,
        source: &LocalScope<Scope>,
        selector: ExprId,
        exclusions: Option<ExprId>,
    ) -> Result<(), EvalError> {
        let exclusions = match exclusions {
            Some(arg) => self.eval_exclusions(arg)?,
            None => FxHashSet::default(),
        };

        match self.eval_selector(selector, "mark used")? {
            Selector::All => source.borrow_mut().mark_all_used(&exclusions),
            Selector::Names(names) => {
                for name in names {
                    let found = source.borrow_mut().lookup(name, SearchMode::SearchNested);
                    tracing::trace!(?name, found = found.is_some(), "mark used from list");
                }
            }
        }
        Ok(())
    }
}
