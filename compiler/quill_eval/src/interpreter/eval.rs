//! Statements and expressions.

use quill_ir::{
    AssignOp, BinaryOp, BlockId, ExprId, ExprKind, Name, Span, StmtId, StmtKind, UnaryOp,
};
use rustc_hash::FxHashMap;

use super::Interpreter;
use crate::environment::SearchMode;
use crate::errors::{
    no_value, overwrote_unused_assignment, type_mismatch, undefined_identifier, EvalError,
    EvalResult,
};
use crate::operators::{apply_compound, evaluate_binary};
use crate::stack::ensure_sufficient_stack;
use crate::value::{Value, ValueKind};

impl Interpreter<'_> {
    /// Run a block's statements in the current scope.
    ///
    /// Stops at the first failing statement.
    pub fn eval_block(&mut self, block: BlockId) -> Result<(), EvalError> {
        let arena = self.arena;
        ensure_sufficient_stack(|| {
            for &stmt in &arena.block(block).stmts {
                self.eval_stmt(stmt)?;
            }
            Ok(())
        })
    }

    pub fn eval_stmt(&mut self, id: StmtId) -> Result<(), EvalError> {
        let arena = self.arena;
        let stmt = arena.stmt(id);
        match &stmt.kind {
            StmtKind::Assign { target, op, value } => {
                self.eval_assign(*target, *op, *value, stmt.span)
            }
            StmtKind::Expr(expr_id) => {
                let expr = arena.expr(*expr_id);
                if let ExprKind::Call(call) = &expr.kind {
                    self.eval_call(call, expr.span)?;
                } else {
                    self.eval_expr(*expr_id)?;
                }
                Ok(())
            }
            // Branches run in the current scope; `if` does not open one.
            StmtKind::If {
                condition,
                then_block,
                else_block,
            } => {
                let value = self.eval_expr(*condition)?;
                let Some(taken) = value.as_bool() else {
                    return Err(type_mismatch(ValueKind::Bool, &value, self.interner)
                        .with_span(arena.expr(*condition).span));
                };
                if taken {
                    self.eval_block(*then_block)
                } else if let Some(else_block) = else_block {
                    self.eval_block(*else_block)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// `target = value`, `target += value`, `target -= value`.
    fn eval_assign(
        &mut self,
        target: Name,
        op: AssignOp,
        value: ExprId,
        span: Span,
    ) -> Result<(), EvalError> {
        let rhs = self.eval_expr(value)?;
        let interner = self.interner;
        let scope = self.env.current();

        if op == AssignOp::Assign {
            let previous = {
                let scope = scope.borrow();
                if scope.is_set_but_unused(target) {
                    scope.origin(target)
                } else {
                    None
                }
            };
            if let Some(previous) = previous {
                return Err(
                    overwrote_unused_assignment(interner.lookup(target), previous).with_span(span)
                );
            }
            let defined = scope.borrow_mut().define(target, rhs, span);
            return defined.map_err(|e| EvalError::from(e).with_span(span));
        }

        // A local target is modified in place and stays used.
        if scope.borrow().contains_local(target) {
            let result = scope
                .borrow_mut()
                .with_mutable(target, SearchMode::LocalOnly, |current| {
                    apply_compound(op, current, rhs, interner)
                });
            return match result {
                Some(outcome) => outcome.map_err(|e| e.or_span(span)),
                None => Err(undefined_identifier(interner.lookup(target)).with_span(span)),
            };
        }

        // An inherited target is read from the enclosing scope and the
        // result is defined locally.
        let inherited = scope.borrow_mut().lookup(target, SearchMode::SearchNested);
        let Some(inherited) = inherited else {
            return Err(undefined_identifier(interner.lookup(target)).with_span(span));
        };
        let mut updated = inherited.detached();
        apply_compound(op, &mut updated, rhs, interner).map_err(|e| e.or_span(span))?;
        let defined = scope.borrow_mut().define(target, updated, span);
        defined.map_err(|e| EvalError::from(e).with_span(span))
    }

    pub fn eval_expr(&mut self, id: ExprId) -> EvalResult {
        let arena = self.arena;
        let expr = arena.expr(id);
        let span = expr.span;
        match &expr.kind {
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Int(n) => Ok(Value::Int(*n)),
            ExprKind::Str(s) => Ok(Value::string(self.interner.lookup(*s))),
            ExprKind::Ident(name) => match self.env.lookup(*name) {
                Some(value) => Ok(value.detached()),
                None => Err(undefined_identifier(self.interner.lookup(*name)).with_span(span)),
            },
            ExprKind::List(items) => {
                let mut values = Vec::with_capacity(items.len());
                for &item in items {
                    values.push(self.eval_expr(item)?);
                }
                Ok(Value::List(values))
            }
            ExprKind::Map(entries) => {
                let mut map = FxHashMap::default();
                for &(key, value) in entries {
                    let value = self.eval_expr(value)?;
                    map.insert(self.interner.lookup(key).to_string(), value);
                }
                Ok(Value::Map(map))
            }
            ExprKind::ScopeLit(block) => self.eval_scope_literal(*block),
            ExprKind::Accessor { base, member } => self.eval_accessor(*base, *member, span),
            ExprKind::Unary {
                op: UnaryOp::Not,
                operand,
            } => match self.eval_expr(*operand)? {
                Value::Bool(b) => Ok(Value::Bool(!b)),
                other => Err(type_mismatch(ValueKind::Bool, &other, self.interner)
                    .with_span(arena.expr(*operand).span)),
            },
            ExprKind::Binary { op, left, right } => match op {
                BinaryOp::And | BinaryOp::Or => self.eval_short_circuit(*op, *left, *right),
                _ => {
                    let left = self.eval_expr(*left)?;
                    let right = self.eval_expr(*right)?;
                    evaluate_binary(*op, left, right, self.interner).map_err(|e| e.or_span(span))
                }
            },
            ExprKind::Call(call) => match self.eval_call(call, span)? {
                Some(value) => Ok(value),
                None => Err(no_value(self.interner.lookup(call.func)).with_span(span)),
            },
        }
    }

    fn eval_short_circuit(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> EvalResult {
        let lhs = self.eval_bool(left)?;
        match (op, lhs) {
            (BinaryOp::And, false) | (BinaryOp::Or, true) => Ok(Value::Bool(lhs)),
            _ => self.eval_bool(right).map(Value::Bool),
        }
    }

    fn eval_bool(&mut self, id: ExprId) -> Result<bool, EvalError> {
        let value = self.eval_expr(id)?;
        value.as_bool().ok_or_else(|| {
            type_mismatch(ValueKind::Bool, &value, self.interner).with_span(self.arena.expr(id).span)
        })
    }

    /// `{ ... }` as a value: the block runs in a child scope, which is then
    /// cut loose from its parent and returned. It is never closed.
    fn eval_scope_literal(&mut self, block: BlockId) -> EvalResult {
        let scope = {
            let mut scoped = self.scoped();
            scoped.eval_block(block)?;
            scoped.detach()
        };
        scope.borrow_mut().take_parent();
        Ok(Value::Scope(scope))
    }

    /// `base.member`: reads `base` like an identifier, then `member` inside
    /// it. Both bindings are marked used.
    fn eval_accessor(&mut self, base: Name, member: Name, span: Span) -> EvalResult {
        let Some(base_value) = self.env.lookup(base) else {
            return Err(undefined_identifier(self.interner.lookup(base)).with_span(span));
        };
        let Value::Scope(scope) = &base_value else {
            return Err(type_mismatch(ValueKind::Scope, &base_value, self.interner).with_span(span));
        };
        let found = scope.borrow_mut().lookup(member, SearchMode::SearchNested);
        match found {
            Some(value) => Ok(value.detached()),
            None => Err(undefined_identifier(self.interner.lookup(member)).with_span(span)),
        }
    }

    /// Evaluate an argument that must be a string, such as a target name.
    pub(crate) fn eval_string_argument(&mut self, arg: ExprId) -> Result<String, EvalError> {
        match self.eval_expr(arg)? {
            Value::Str(s) => Ok(s),
            other => Err(type_mismatch(ValueKind::Str, &other, self.interner)
                .with_span(self.arena.expr(arg).span)),
        }
    }
}
