#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Template invocation end to end.
//!
//! Each test builds a file with `AstArena`, runs it through the public
//! `Interpreter` API and checks the targets that were declared and the
//! unused-variable diagnostics that came out.

use pretty_assertions::assert_eq;
use quill_diagnostic::{Diagnostic, ErrorCode};
use quill_eval::{init_tracing, CollectingSink, InterpreterBuilder, Target};
use quill_ir::{AssignOp, AstArena, BinaryOp, ExprId, StmtId, StringInterner};

struct File {
    interner: StringInterner,
    arena: AstArena,
}

struct Outcome {
    targets: Vec<Target>,
    diagnostics: Vec<Diagnostic>,
}

impl Outcome {
    fn codes(&self) -> Vec<ErrorCode> {
        self.diagnostics.iter().map(|d| d.code).collect()
    }

    /// Names reported by E6090, in report order.
    fn unused(&self) -> Vec<String> {
        self.diagnostics
            .iter()
            .filter(|d| d.code == ErrorCode::E6090)
            .map(|d| {
                let label = &d.labels[0].message;
                label
                    .trim_start_matches('`')
                    .split('`')
                    .next()
                    .unwrap()
                    .to_string()
            })
            .collect()
    }
}

impl File {
    fn new() -> Self {
        File {
            interner: StringInterner::new(),
            arena: AstArena::new(),
        }
    }

    fn ident(&mut self, s: &str) -> ExprId {
        let name = self.interner.intern(s);
        self.arena.ident(name)
    }

    fn string(&mut self, s: &str) -> ExprId {
        let name = self.interner.intern(s);
        self.arena.string(name)
    }

    fn strings(&mut self, items: &[&str]) -> ExprId {
        let items = items.iter().map(|s| self.string(s)).collect();
        self.arena.list(items)
    }

    fn accessor(&mut self, base: &str, member: &str) -> ExprId {
        let base = self.interner.intern(base);
        let member = self.interner.intern(member);
        self.arena.accessor(base, member)
    }

    fn set(&mut self, var: &str, value: ExprId) -> StmtId {
        let name = self.interner.intern(var);
        self.arena.assign(name, AssignOp::Assign, value)
    }

    fn append(&mut self, var: &str, value: ExprId) -> StmtId {
        let name = self.interner.intern(var);
        self.arena.assign(name, AssignOp::AddAssign, value)
    }

    fn call_expr(&mut self, func: &str, args: Vec<ExprId>) -> ExprId {
        let func = self.interner.intern(func);
        self.arena.call(func, args, None)
    }

    fn call(&mut self, func: &str, args: Vec<ExprId>) -> StmtId {
        let call = self.call_expr(func, args);
        self.arena.expr_stmt(call)
    }

    fn block_call(&mut self, func: &str, args: Vec<ExprId>, body: Vec<StmtId>) -> StmtId {
        let func = self.interner.intern(func);
        let block = self.arena.block_of(body);
        let call = self.arena.call(func, args, Some(block));
        self.arena.expr_stmt(call)
    }

    /// `template(name) { body }`
    fn template(&mut self, name: &str, body: Vec<StmtId>) -> StmtId {
        let name = self.string(name);
        self.block_call("template", vec![name], body)
    }

    /// `func(target) { body }`, for templates and target kinds alike.
    fn invoke(&mut self, func: &str, target: &str, body: Vec<StmtId>) -> StmtId {
        let target = self.string(target);
        self.block_call(func, vec![target], body)
    }

    /// `kind(target_name) { body }`, as written inside a template.
    fn declare_for_target_name(&mut self, kind: &str, body: Vec<StmtId>) -> StmtId {
        let target_name = self.ident("target_name");
        self.block_call(kind, vec![target_name], body)
    }

    fn run(mut self, stmts: Vec<StmtId>) -> Outcome {
        init_tracing();
        let program = self.arena.block_of(stmts);
        let sink = CollectingSink::new();
        let mut interp = InterpreterBuilder::new(&self.interner, &self.arena)
            .target_sink(Box::new(sink.clone()))
            .build();
        let _ = interp.run(program);
        Outcome {
            targets: sink.targets(),
            diagnostics: interp.take_diagnostics(),
        }
    }
}

/// template("my_group") {
///   group(target_name) {
///     forward_variables_from(invoker, [ "deps" ])
///   }
/// }
fn forwarding_template(file: &mut File, extra: Vec<StmtId>) -> StmtId {
    let invoker = file.ident("invoker");
    let names = file.strings(&["deps"]);
    let forward = file.call("forward_variables_from", vec![invoker, names]);
    let mut group_body = vec![forward];
    group_body.extend(extra);
    let group = file.declare_for_target_name("group", group_body);
    file.template("my_group", vec![group])
}

#[test]
fn forwarded_variables_reach_the_target() {
    let mut file = File::new();
    let template = forwarding_template(&mut file, vec![]);
    let deps = file.strings(&[":a", ":b"]);
    let set_deps = file.set("deps", deps);
    let invocation = file.invoke("my_group", "foo", vec![set_deps]);

    let outcome = file.run(vec![template, invocation]);
    assert_eq!(outcome.diagnostics, vec![]);
    assert_eq!(outcome.targets.len(), 1);
    assert_eq!(outcome.targets[0].kind, "group");
    assert_eq!(outcome.targets[0].name, "foo");
    assert_eq!(
        outcome.targets[0].variables,
        vec![("deps".to_string(), r#"[":a", ":b"]"#.to_string())]
    );
}

#[test]
fn unread_invoker_variable_is_reported() {
    let mut file = File::new();
    let template = forwarding_template(&mut file, vec![]);
    let deps = file.strings(&[":a"]);
    let set_deps = file.set("deps", deps);
    let typo = file.strings(&["a.cc"]);
    let set_typo = file.set("soruces", typo);
    let invocation = file.invoke("my_group", "foo", vec![set_deps, set_typo]);

    let outcome = file.run(vec![template, invocation]);
    assert_eq!(outcome.codes(), vec![ErrorCode::E6090]);
    assert_eq!(outcome.unused(), vec!["soruces".to_string()]);
    assert_eq!(outcome.diagnostics[0].message, "assignment had no effect");
    // The target is still declared; the diagnostic comes at scope close.
    assert_eq!(outcome.targets.len(), 1);
}

#[test]
fn mark_used_from_discards_invoker_variables() {
    let mut file = File::new();
    let invoker = file.ident("invoker");
    let names = file.strings(&["extra_deps"]);
    let discard = file.call("mark_used_from", vec![invoker, names]);
    let template = forwarding_template(&mut file, vec![discard]);
    let deps = file.strings(&[":a"]);
    let set_deps = file.set("deps", deps);
    let extra = file.strings(&[":foo"]);
    let set_extra = file.set("extra_deps", extra);
    let invocation = file.invoke("my_group", "foo", vec![set_deps, set_extra]);

    let outcome = file.run(vec![template, invocation]);
    assert_eq!(outcome.diagnostics, vec![]);
}

#[test]
fn not_needed_wildcard_with_exclusion() {
    // template("my_app") {
    //   group(target_name) {
    //     not_needed(invoker, "*", [ "bundle_name" ])
    //     deps = [ invoker.bundle_name ]
    //   }
    // }
    let mut file = File::new();
    let invoker = file.ident("invoker");
    let star = file.string("*");
    let keep = file.strings(&["bundle_name"]);
    let discard = file.call("not_needed", vec![invoker, star, keep]);
    let bundle = file.accessor("invoker", "bundle_name");
    let deps = file.arena.list(vec![bundle]);
    let set_deps = file.set("deps", deps);
    let group = file.declare_for_target_name("group", vec![discard, set_deps]);
    let template = file.template("my_app", vec![group]);

    let name = file.string("app_bundle");
    let set_name = file.set("bundle_name", name);
    let one = file.arena.int(1);
    let set_a = file.set("a", one);
    let two = file.arena.int(2);
    let set_b = file.set("b", two);
    let invocation = file.invoke("my_app", "app", vec![set_name, set_a, set_b]);

    let outcome = file.run(vec![template, invocation]);
    assert_eq!(outcome.diagnostics, vec![]);
    assert_eq!(
        outcome.targets[0].variables,
        vec![("deps".to_string(), r#"["app_bundle"]"#.to_string())]
    );
}

#[test]
fn excluded_and_unread_variable_is_reported() {
    let mut file = File::new();
    let invoker = file.ident("invoker");
    let star = file.string("*");
    let keep = file.strings(&["test_bundle_name"]);
    let discard = file.call("mark_used_from", vec![invoker, star, keep]);
    let template = file.template("my_test", vec![discard]);

    let one = file.arena.int(1);
    let set_a = file.set("a", one);
    let name = file.string("x");
    let set_name = file.set("test_bundle_name", name);
    let invocation = file.invoke("my_test", "t", vec![set_a, set_name]);

    let outcome = file.run(vec![template, invocation]);
    assert_eq!(outcome.unused(), vec!["test_bundle_name".to_string()]);
}

#[test]
fn template_body_variables_are_checked_too() {
    let mut file = File::new();
    let scratch = file.arena.int(0);
    let set_scratch = file.set("scratch", scratch);
    let template = file.template("t", vec![set_scratch]);
    let invocation = file.invoke("t", "x", vec![]);

    let outcome = file.run(vec![template, invocation]);
    assert_eq!(outcome.unused(), vec!["scratch".to_string()]);
}

#[test]
fn invoker_and_target_name_need_not_be_read() {
    let mut file = File::new();
    let template = file.template("empty", vec![]);
    let invocation = file.invoke("empty", "x", vec![]);

    let outcome = file.run(vec![template, invocation]);
    assert_eq!(outcome.diagnostics, vec![]);
}

#[test]
fn unused_reports_follow_source_order() {
    let mut file = File::new();
    let scratch = file.arena.int(0);
    let set_scratch = file.set("scratch", scratch);
    let template = file.template("t", vec![set_scratch]);
    let one = file.arena.int(1);
    let set_unread = file.set("unread", one);
    let invocation = file.invoke("t", "x", vec![set_unread]);

    let outcome = file.run(vec![template, invocation]);
    // Both scopes are reported; the template body comes first in the file.
    assert_eq!(
        outcome.unused(),
        vec!["scratch".to_string(), "unread".to_string()]
    );
}

#[test]
fn error_in_template_abandons_scopes() {
    let mut file = File::new();
    let bad = file.ident("no_such_variable");
    let set_bad = file.set("x", bad);
    let template = file.template("t", vec![set_bad]);
    let one = file.arena.int(1);
    let set_unread = file.set("unread", one);
    let invocation = file.invoke("t", "x", vec![set_unread]);

    let outcome = file.run(vec![template, invocation]);
    assert_eq!(outcome.codes(), vec![ErrorCode::E6003]);
    assert_eq!(
        outcome.diagnostics[0].message,
        "Undefined identifier `no_such_variable`."
    );
}

#[test]
fn template_body_sees_its_definition_scope() {
    let mut file = File::new();
    let prefix = file.string("lib");
    let set_prefix = file.set("prefix", prefix);
    let read_prefix = file.ident("prefix");
    let read_name = file.ident("target_name");
    let full = file.arena.binary(BinaryOp::Add, read_prefix, read_name);
    let list = file.arena.list(vec![full]);
    let set_outputs = file.set("outputs", list);
    let action = file.declare_for_target_name("action", vec![set_outputs]);
    let template = file.template("lib_action", vec![action]);
    let invocation = file.invoke("lib_action", "_foo", vec![]);

    let outcome = file.run(vec![set_prefix, template, invocation]);
    assert_eq!(outcome.diagnostics, vec![]);
    assert_eq!(
        outcome.targets[0].variables,
        vec![("outputs".to_string(), r#"["lib_foo"]"#.to_string())]
    );
}

#[test]
fn defined_guards_optional_invoker_variables() {
    // group(target_name) {
    //   deps = []
    //   if (defined(invoker.extra_deps)) { deps += invoker.extra_deps }
    // }
    let mut file = File::new();
    let empty = file.strings(&[]);
    let set_deps = file.set("deps", empty);
    let extra_deps = file.accessor("invoker", "extra_deps");
    let condition = file.call_expr("defined", vec![extra_deps]);
    let extra = file.accessor("invoker", "extra_deps");
    let append = file.append("deps", extra);
    let then_block = file.arena.block_of(vec![append]);
    let guarded = file.arena.if_stmt(condition, then_block, None);
    let group = file.declare_for_target_name("group", vec![set_deps, guarded]);
    let template = file.template("opt", vec![group]);

    let extra = file.strings(&[":x"]);
    let set_extra = file.set("extra_deps", extra);
    let with_extra = file.invoke("opt", "with", vec![set_extra]);
    let without_extra = file.invoke("opt", "without", vec![]);

    let outcome = file.run(vec![template, with_extra, without_extra]);
    assert_eq!(outcome.diagnostics, vec![]);
    assert_eq!(
        outcome.targets[0].variables,
        vec![("deps".to_string(), r#"[":x"]"#.to_string())]
    );
    assert_eq!(
        outcome.targets[1].variables,
        vec![("deps".to_string(), "[]".to_string())]
    );
}

#[test]
fn nested_templates_forward_through_both_invokers() {
    // template("inner") { group(target_name) { forward_variables_from(invoker, "*") } }
    // template("outer") { inner(target_name) { forward_variables_from(invoker, "*") } }
    let mut file = File::new();
    let invoker = file.ident("invoker");
    let star = file.string("*");
    let forward = file.call("forward_variables_from", vec![invoker, star]);
    let group = file.declare_for_target_name("group", vec![forward]);
    let inner = file.template("inner", vec![group]);

    let invoker = file.ident("invoker");
    let star = file.string("*");
    let forward = file.call("forward_variables_from", vec![invoker, star]);
    let call_inner = file.declare_for_target_name("inner", vec![forward]);
    let outer = file.template("outer", vec![call_inner]);

    let sources = file.strings(&["a.cc"]);
    let set_sources = file.set("sources", sources);
    let invocation = file.invoke("outer", "both", vec![set_sources]);

    let outcome = file.run(vec![inner, outer, invocation]);
    assert_eq!(outcome.diagnostics, vec![]);
    assert_eq!(outcome.targets[0].name, "both");
    assert_eq!(
        outcome.targets[0].variables,
        vec![("sources".to_string(), r#"["a.cc"]"#.to_string())]
    );
}

#[test]
fn invocation_needs_one_argument() {
    let mut file = File::new();
    let template = file.template("t", vec![]);
    let stmt = file.block_call("t", vec![], vec![]);

    let outcome = file.run(vec![template, stmt]);
    assert_eq!(outcome.codes(), vec![ErrorCode::E6001]);
}

#[test]
fn invoker_variable_forwarded_twice_clobbers() {
    let mut file = File::new();
    let invoker = file.ident("invoker");
    let names = file.strings(&["deps"]);
    let again = file.call("forward_variables_from", vec![invoker, names]);
    let template = forwarding_template(&mut file, vec![again]);
    let deps = file.strings(&[":a"]);
    let set_deps = file.set("deps", deps);
    let invocation = file.invoke("my_group", "foo", vec![set_deps]);

    let outcome = file.run(vec![template, invocation]);
    assert_eq!(outcome.codes(), vec![ErrorCode::E6020]);
    assert!(outcome.targets.is_empty());
    assert!(outcome.diagnostics[0].primary_span().is_some());
}
