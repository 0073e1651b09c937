//! `forward_variables_from`: the copying counterpart of `mark_used_from`.

use quill_ir::{ExprId, Name, Span};
use rustc_hash::FxHashSet;

use super::Selector;
use crate::environment::SearchMode;
use crate::errors::{arity_mismatch, clobbered_variable, EvalError};
use crate::value::Value;
use crate::Interpreter;

impl Interpreter<'_> {
    /// `forward_variables_from(from_scope, "*" | [names], [exclusions])`
    ///
    /// Copies the selected variables into the current scope and marks the
    /// source bindings used. Exclusions apply to both selector forms.
    pub(crate) fn run_forward_variables_from(
        &mut self,
        args: &[ExprId],
        span: Span,
    ) -> Result<(), EvalError> {
        if !(2..=3).contains(&args.len()) {
            return Err(
                arity_mismatch("forward_variables_from", "two or three arguments").with_span(span)
            );
        }
        let source = self.resolve_source_scope(args[0])?;
        let exclusions = match args.get(2) {
            Some(&arg) => self.eval_exclusions(arg)?,
            None => FxHashSet::default(),
        };

        let entries: Vec<(Name, Value)> = match self.eval_selector(args[1], "copy")? {
            Selector::All => {
                let entries: Vec<(Name, Value)> = source
                    .borrow()
                    .local_values()
                    .into_iter()
                    .filter(|(name, _)| !exclusions.contains(name))
                    .collect();
                source.borrow_mut().mark_all_used(&exclusions);
                entries
            }
            Selector::Names(names) => {
                let mut entries = Vec::with_capacity(names.len());
                for name in names {
                    if exclusions.contains(&name) {
                        continue;
                    }
                    let found = source.borrow_mut().lookup(name, SearchMode::SearchNested);
                    if let Some(value) = found {
                        entries.push((name, value));
                    }
                }
                entries
            }
        };

        let dest = self.env.current();
        for (name, value) in entries {
            if dest.borrow().contains_local(name) {
                return Err(clobbered_variable(self.interner.lookup(name)).with_span(span));
            }
            let value = value.detached();
            dest.borrow_mut()
                .define(name, value, span)
                .map_err(|e| EvalError::from(e).with_span(span))?;
        }
        Ok(())
    }
}
