//! Call dispatch: built-ins, template invocations and target declarations.

use quill_ir::{Call, Span};

use super::Interpreter;
use crate::builtins::BuiltinFunction;
use crate::errors::{arity_mismatch, block_required, undefined_function, EvalError};
use crate::stack::ensure_sufficient_stack;
use crate::target::TargetDeclaration;
use crate::value::Value;

impl Interpreter<'_> {
    /// Evaluate a call. Built-ins win over templates, templates over
    /// target kinds. `None` means the call produced no value.
    pub fn eval_call(&mut self, call: &Call, span: Span) -> Result<Option<Value>, EvalError> {
        let name = self.interner.lookup(call.func);
        if let Some(builtin) = BuiltinFunction::from_name(name) {
            return self.call_builtin(builtin, call, span);
        }
        if self.templates.contains_key(&call.func) {
            return self.invoke_template(call, span).map(|()| None);
        }
        if self.target_kinds.contains(&call.func) {
            return self.declare_target(call, span).map(|()| None);
        }
        Err(undefined_function(name).with_span(span))
    }

    /// `name("target") { block }` for a defined template.
    ///
    /// The block runs in an invocation scope under the caller's scope. The
    /// body then runs in a template scope under the template's closure,
    /// with `invoker` (the invocation scope) and `target_name` defined and
    /// already marked used. On success the invocation scope is closed
    /// first, then the template scope; on error both are abandoned.
    #[tracing::instrument(level = "debug", skip_all)]
    fn invoke_template(&mut self, call: &Call, span: Span) -> Result<(), EvalError> {
        let function = self.interner.lookup(call.func);
        let [arg] = call.args.as_slice() else {
            return Err(arity_mismatch(function, "exactly one argument").with_span(span));
        };
        let Some(block) = call.block else {
            return Err(block_required(function).with_span(span));
        };
        let Some((body, closure)) = self
            .templates
            .get(&call.func)
            .map(|t| (t.body, t.closure.clone()))
        else {
            return Err(undefined_function(function).with_span(span));
        };
        let target_name = self.eval_string_argument(*arg)?;
        tracing::debug!(
            template = function,
            target = target_name.as_str(),
            "invoking template"
        );

        ensure_sufficient_stack(|| {
            let invocation = {
                let mut scoped = self.scoped();
                scoped.eval_block(block)?;
                scoped.detach()
            };

            let template_scope = {
                let mut scoped = self.scoped_with_parent(closure);
                let names = scoped.names;
                {
                    let mut scope = scoped.scope().borrow_mut();
                    scope.define(names.invoker, Value::Scope(invocation.clone()), span)?;
                    scope.mark_used(names.invoker);
                    scope.define(names.target_name, Value::Str(target_name), span)?;
                    scope.mark_used(names.target_name);
                }
                scoped.eval_block(body)?;
                scoped.detach()
            };

            self.close_and_report(&invocation);
            self.close_and_report(&template_scope);
            Ok(())
        })
    }

    /// `kind("name") { block }` for a configured target kind.
    ///
    /// The sink consumes the block's scope before it is closed, so only the
    /// variables the sink did not read are reported.
    #[tracing::instrument(level = "debug", skip_all)]
    fn declare_target(&mut self, call: &Call, span: Span) -> Result<(), EvalError> {
        let kind = self.interner.lookup(call.func);
        let [arg] = call.args.as_slice() else {
            return Err(arity_mismatch(kind, "exactly one argument").with_span(span));
        };
        let Some(block) = call.block else {
            return Err(block_required(kind).with_span(span));
        };
        let target_name = self.eval_string_argument(*arg)?;

        ensure_sufficient_stack(|| {
            let mut scoped = self.scoped();
            scoped.eval_block(block)?;
            let scope = scoped.scope().clone();
            let interner = scoped.interner;
            let decl = TargetDeclaration {
                kind,
                name: &target_name,
                span,
                scope: &scope,
                interner,
            };
            scoped
                .target_sink
                .declare(&decl)
                .map_err(|e| e.or_span(span))?;
            scoped.close();
            Ok(())
        })
    }
}
