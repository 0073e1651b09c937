//! `template("name") { body }`

use quill_ir::{Call, Span};

use crate::errors::{arity_mismatch, block_required, template_redefined, EvalError};
use crate::interpreter::Template;
use crate::Interpreter;

impl Interpreter<'_> {
    /// Record a template. The scope the definition runs in becomes the
    /// template's closure; the body is not evaluated until invocation.
    pub(crate) fn run_template(&mut self, call: &Call, span: Span) -> Result<(), EvalError> {
        let [arg] = call.args.as_slice() else {
            return Err(arity_mismatch("template", "exactly one argument").with_span(span));
        };
        let Some(body) = call.block else {
            return Err(block_required("template").with_span(span));
        };
        let template_name = self.eval_string_argument(*arg)?;
        let name = self.interner.intern(&template_name);

        if let Some(existing) = self.templates.get(&name) {
            return Err(template_redefined(&template_name, existing.span).with_span(span));
        }
        tracing::debug!(name = template_name.as_str(), "template defined");
        self.templates.insert(
            name,
            Template {
                body,
                closure: self.env.current(),
                span,
            },
        );
        Ok(())
    }
}
