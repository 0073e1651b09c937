use super::*;
use crate::{Scope, Value};
use pretty_assertions::assert_eq;
use quill_diagnostic::DiagnosticConfig;

#[test]
fn test_unused_variable_shape() {
    let diag = unused_variable("extra_deps", Span::new(10, 20));
    assert_eq!(diag.code, ErrorCode::E6090);
    assert!(diag.is_error());
    assert_eq!(diag.message, "assignment had no effect");
    assert_eq!(diag.primary_span(), Some(Span::new(10, 20)));
    assert_eq!(
        diag.labels[0].message,
        "`extra_deps` was set here and never read before it went out of scope"
    );
    assert_eq!(
        diag.help,
        vec!["use the variable, or discard it with `not_needed`".to_string()]
    );
}

#[test]
fn test_report_unused_one_per_binding() {
    let interner = StringInterner::new();
    let a = interner.intern("a");
    let b = interner.intern("b");
    let c = interner.intern("c");

    let mut scope = Scope::new();
    scope.define(a, Value::Int(1), Span::new(0, 1)).unwrap();
    scope.define(b, Value::Int(2), Span::new(2, 3)).unwrap();
    scope.define(c, Value::Int(3), Span::new(4, 5)).unwrap();
    scope.lookup(a, crate::SearchMode::LocalOnly);
    scope.lookup(c, crate::SearchMode::LocalOnly);

    let unused = scope.close().unwrap();
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    report_unused(&mut queue, &interner, &unused);

    let diags = queue.flush();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].primary_span(), Some(Span::new(2, 3)));
    assert!(diags[0].labels[0].message.starts_with("`b`"));
}
