use super::*;
use crate::environment::SearchMode;
use crate::value::Value;
use pretty_assertions::assert_eq;
use quill_diagnostic::ErrorCode;
use quill_ir::{AstArena, Span, StringInterner};

#[test]
fn test_drop_abandons_scope() {
    let interner = StringInterner::new();
    let arena = AstArena::new();
    let mut interp = Interpreter::new(&interner, &arena);
    let x = interner.intern("x");
    {
        let scoped = interp.scoped();
        let _ = scoped
            .scope()
            .borrow_mut()
            .define(x, Value::Int(1), Span::new(0, 1));
        assert_eq!(scoped.env().depth(), 2);
    }
    assert_eq!(interp.env().depth(), 1);
    assert!(interp.take_diagnostics().is_empty());
}

#[test]
fn test_close_reports_unused() {
    let interner = StringInterner::new();
    let arena = AstArena::new();
    let mut interp = Interpreter::new(&interner, &arena);
    let x = interner.intern("x");
    let y = interner.intern("y");
    {
        let scoped = interp.scoped();
        {
            let mut scope = scoped.scope().borrow_mut();
            let _ = scope.define(x, Value::Int(1), Span::new(0, 1));
            let _ = scope.define(y, Value::Int(2), Span::new(2, 3));
            scope.lookup(y, SearchMode::LocalOnly);
        }
        scoped.close();
    }
    assert_eq!(interp.env().depth(), 1);
    let diags = interp.take_diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, ErrorCode::E6090);
    assert_eq!(diags[0].primary_span(), Some(Span::new(0, 1)));
}

#[test]
fn test_detach_returns_open_scope() {
    let interner = StringInterner::new();
    let arena = AstArena::new();
    let mut interp = Interpreter::new(&interner, &arena);
    let scope = interp.scoped().detach();
    assert_eq!(interp.env().depth(), 1);
    assert!(!scope.borrow().is_closed());
    assert!(interp.take_diagnostics().is_empty());
}

#[test]
fn test_scoped_with_parent_uses_given_parent() {
    let interner = StringInterner::new();
    let arena = AstArena::new();
    let mut interp = Interpreter::new(&interner, &arena);
    let closure = LocalScope::new(Scope::new());
    let scoped = interp.scoped_with_parent(closure.clone());
    let parent = scoped.scope().borrow().parent().cloned();
    assert!(parent.is_some_and(|p| LocalScope::ptr_eq(&p, &closure)));
}
