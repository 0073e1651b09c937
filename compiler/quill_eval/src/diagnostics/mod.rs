//! The unused-variable pass output.
//!
//! `Scope::close` finds the bindings; this turns each one into an E6090
//! diagnostic at its definition site.

use quill_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use quill_ir::{Span, StringInterner};

use crate::UnusedBinding;

/// "assignment had no effect" for `name`, defined at `origin`.
#[cold]
pub fn unused_variable(name: &str, origin: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E6090)
        .with_message("assignment had no effect")
        .with_label(
            origin,
            format!("`{name}` was set here and never read before it went out of scope"),
        )
        .with_help("use the variable, or discard it with `not_needed`")
}

/// Queue one diagnostic per unused binding.
pub(crate) fn report_unused(
    queue: &mut DiagnosticQueue,
    interner: &StringInterner,
    unused: &[UnusedBinding],
) {
    for binding in unused {
        let name = interner.lookup(binding.name);
        tracing::debug!(name, origin = ?binding.origin, "assignment had no effect");
        queue.push(unused_variable(name, binding.origin));
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
