//! Built-in functions.
//!
//! Built-ins receive their argument expressions unevaluated. That lets
//! `mark_used_from` and friends require a bare identifier for the source
//! scope and resolve it to the stored scope itself, instead of evaluating
//! it into a (potentially large) detached copy whose used flags nobody
//! would ever look at again.

mod defined;
mod forward_variables_from;
mod mark_used_from;
mod template;

use quill_ir::{Call, ExprId, Name, Span};
use rustc_hash::FxHashSet;

use crate::environment::{LocalScope, Scope};
use crate::errors::{
    block_not_allowed, block_required, invalid_exclusion_list, invalid_selector,
    not_an_identifier, type_mismatch, undefined_identifier, EvalError,
};
use crate::value::{Value, ValueKind};
use crate::Interpreter;

/// Functions the interpreter implements directly.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BuiltinFunction {
    Defined,
    ForwardVariablesFrom,
    MarkUsedFrom,
    NotNeeded,
    Template,
}

impl BuiltinFunction {
    pub const ALL: [BuiltinFunction; 5] = [
        BuiltinFunction::Defined,
        BuiltinFunction::ForwardVariablesFrom,
        BuiltinFunction::MarkUsedFrom,
        BuiltinFunction::NotNeeded,
        BuiltinFunction::Template,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            BuiltinFunction::Defined => "defined",
            BuiltinFunction::ForwardVariablesFrom => "forward_variables_from",
            BuiltinFunction::MarkUsedFrom => "mark_used_from",
            BuiltinFunction::NotNeeded => "not_needed",
            BuiltinFunction::Template => "template",
        }
    }

    /// Whether the call must be followed by a `{ }` block.
    pub fn takes_block(self) -> bool {
        matches!(self, BuiltinFunction::Template)
    }

    /// One-line summary, `name: what it does.`
    pub fn help_short(self) -> &'static str {
        match self {
            BuiltinFunction::Defined => "defined: Returns whether an identifier is defined.",
            BuiltinFunction::ForwardVariablesFrom => {
                "forward_variables_from: Copies variables from a different scope."
            }
            BuiltinFunction::MarkUsedFrom => {
                "mark_used_from: Marks variables as used from a different scope."
            }
            BuiltinFunction::NotNeeded => {
                "not_needed: Marks variables from scope as used."
            }
            BuiltinFunction::Template => "template: Define a template rule.",
        }
    }

    /// Full help text.
    pub fn help(self) -> &'static str {
        match self {
            BuiltinFunction::Defined => DEFINED_HELP,
            BuiltinFunction::ForwardVariablesFrom => FORWARD_VARIABLES_FROM_HELP,
            BuiltinFunction::MarkUsedFrom => MARK_USED_FROM_HELP,
            BuiltinFunction::NotNeeded => NOT_NEEDED_HELP,
            BuiltinFunction::Template => TEMPLATE_HELP,
        }
    }
}

const DEFINED_HELP: &str = r#"defined: Returns whether an identifier is defined.

  defined(identifier)
  defined(scope.member)

  Returns true if the identifier is visible from the current scope, or if
  the scope accessor names a member of the given scope. Testing a variable
  does not count as reading it, so an unread variable is still reported.

Example

  if (!defined(output_name)) {
    output_name = target_name
  }
"#;

const FORWARD_VARIABLES_FROM_HELP: &str = r#"forward_variables_from: Copies variables from a different scope.

  forward_variables_from(from_scope, variable_list_or_star,
                         variables_to_not_forward_list = [])

  Copies the given variables from the given scope into the current scope,
  marking each source variable used. Listed variables are looked up in the
  source scope and the scopes enclosing it; names that do not exist are
  skipped. "*" copies every variable defined directly on the source scope.

  Copying a variable that is already defined in the current scope is an
  error. Names in variables_to_not_forward_list are never copied.

Example

  template("my_group") {
    group(target_name) {
      forward_variables_from(invoker, [ "deps", "public_deps" ])
    }
  }
"#;

const MARK_USED_FROM_HELP: &str = r#"mark_used_from: Marks variables as used from a different scope.

  mark_used_from(from_scope, variable_list_or_star,
                 variables_to_not_mark_list = [])

  Marks variables of another scope as used without copying them. Templates
  use this for invoker variables they deliberately ignore, which would
  otherwise be reported as "assignment had no effect".

  Listed variables are marked if they exist in the given scope or any
  scope enclosing it; missing names are ignored. "*" marks only the
  variables defined directly on from_scope, never enclosing ones, and
  skips the names in variables_to_not_mark_list.

Examples

  template("my_test") {
    action(target_name) {
      forward_variables_from(invoker, [ "deps", "visibility" ])
      if (defined(visibility) && visibility) {
        deps += invoker.extra_deps
      } else {
        mark_used_from(invoker, [ "extra_deps" ])
      }
    }
  }

  template("my_app") {
    group(target_name) {
      mark_used_from(invoker, "*", [ "bundle_name" ])
      deps = [ invoker.bundle_name ]
    }
  }
"#;

const NOT_NEEDED_HELP: &str = r#"not_needed: Marks variables from scope as used.

  not_needed(variable_list_or_star, variables_to_ignore_list = [])
  not_needed(from_scope, variable_list_or_star,
             variables_to_ignore_list = [])

  Same as mark_used_from. When the first argument does not evaluate to a
  scope, the variables are marked in the current scope.

Example

  not_needed("*", [ "config" ])
  not_needed([ "data_deps", "deps" ])
  not_needed(invoker, "*", [ "config" ])
"#;

const TEMPLATE_HELP: &str = r#"template: Define a template rule.

  template(template_name) { body }

  Invoking the template as template_name(target_name) { block } runs the
  block in a scope of its own, then runs body in a scope enclosed by the
  scope the template was defined in. Inside body, invoker refers to the
  block's scope and target_name to the invocation's argument.

  When the body finishes, variables set in the block that the template
  never read are reported, so templates should forward what they use and
  discard the rest with not_needed.

Example

  template("my_idl") {
    source_set(target_name) {
      forward_variables_from(invoker, [ "sources", "deps" ])
    }
  }

  my_idl("foo_idl_files") {
    sources = [ "a.idl", "b.idl" ]
  }
"#;

/// Which variables a transfer built-in applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Selector {
    /// `"*"`: every binding local to the source scope.
    All,
    /// An explicit list. Names the interner never saw are dropped, since
    /// nothing can be bound under them.
    Names(Vec<Name>),
}

impl Interpreter<'_> {
    /// Dispatch a built-in call.
    #[tracing::instrument(level = "debug", skip_all, fields(builtin = builtin.name()))]
    pub(crate) fn call_builtin(
        &mut self,
        builtin: BuiltinFunction,
        call: &Call,
        span: Span,
    ) -> Result<Option<Value>, EvalError> {
        match (builtin.takes_block(), call.block) {
            (true, None) => return Err(block_required(builtin.name()).with_span(span)),
            (false, Some(_)) => return Err(block_not_allowed(builtin.name()).with_span(span)),
            _ => {}
        }
        match builtin {
            BuiltinFunction::Defined => self.run_defined(&call.args, span).map(Some),
            BuiltinFunction::ForwardVariablesFrom => self
                .run_forward_variables_from(&call.args, span)
                .map(|()| None),
            BuiltinFunction::MarkUsedFrom => {
                self.run_mark_used_from(&call.args, span).map(|()| None)
            }
            BuiltinFunction::NotNeeded => self.run_not_needed(&call.args, span).map(|()| None),
            BuiltinFunction::Template => self.run_template(call, span).map(|()| None),
        }
    }

    /// Resolve the identifier naming a source scope.
    ///
    /// The identifier must be a bare name. Looking it up marks it used in
    /// the scope that defines it; the returned handle is the stored scope,
    /// not a copy.
    pub(crate) fn resolve_source_scope(
        &mut self,
        arg: ExprId,
    ) -> Result<LocalScope<Scope>, EvalError> {
        let expr = self.arena.expr(arg);
        let Some(name) = expr.as_ident() else {
            return Err(not_an_identifier("an identifier for the scope").with_span(expr.span));
        };
        let Some(value) = self.env.lookup(name) else {
            return Err(undefined_identifier(self.interner.lookup(name)).with_span(expr.span));
        };
        match value {
            Value::Scope(scope) => Ok(scope),
            other => Err(type_mismatch(ValueKind::Scope, &other, self.interner).with_span(expr.span)),
        }
    }

    /// Evaluate an exclusion list argument into a name set.
    pub(crate) fn eval_exclusions(&mut self, arg: ExprId) -> Result<FxHashSet<Name>, EvalError> {
        let span = self.arena.expr(arg).span;
        let Value::List(items) = self.eval_expr(arg)? else {
            return Err(invalid_exclusion_list().with_span(span));
        };
        let mut exclusions = FxHashSet::default();
        for item in &items {
            let Some(s) = item.as_str() else {
                return Err(type_mismatch(ValueKind::Str, item, self.interner).with_span(span));
            };
            if let Some(name) = self.interner.get(s) {
                exclusions.insert(name);
            }
        }
        Ok(exclusions)
    }

    /// Evaluate a `"*"`-or-list argument.
    ///
    /// `purpose` completes the error message "Not a valid list of
    /// variables to ...".
    pub(crate) fn eval_selector(
        &mut self,
        arg: ExprId,
        purpose: &'static str,
    ) -> Result<Selector, EvalError> {
        let span = self.arena.expr(arg).span;
        match self.eval_expr(arg)? {
            Value::Str(s) if s == "*" => Ok(Selector::All),
            Value::List(items) => {
                let mut names = Vec::with_capacity(items.len());
                for item in &items {
                    let Some(s) = item.as_str() else {
                        return Err(
                            type_mismatch(ValueKind::Str, item, self.interner).with_span(span)
                        );
                    };
                    if let Some(name) = self.interner.get(s) {
                        names.push(name);
                    }
                }
                Ok(Selector::Names(names))
            }
            _ => Err(invalid_selector(purpose).with_span(span)),
        }
    }
}
