//! Binary operators and compound assignment.
//!
//! - `+`: integers, strings, list + list
//! - `-`: integers, list - list (every listed item must be present)
//! - `==` / `!=`: any two values
//!
//! `&&` and `||` short-circuit, so the interpreter handles them before
//! evaluating the right operand.
//!
//! `+=` also appends a single non-list item to a list, and `-=` removes a
//! single item.

use quill_ir::{AssignOp, BinaryOp, StringInterner};

use crate::errors::{integer_overflow, invalid_operands, item_not_found, EvalError, EvalResult};
use crate::value::Value;

/// Evaluate a non-short-circuiting binary operator.
pub fn evaluate_binary(
    op: BinaryOp,
    left: Value,
    right: Value,
    interner: &StringInterner,
) -> EvalResult {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::NotEq => Ok(Value::Bool(left != right)),
        BinaryOp::Add => add(left, right, false),
        BinaryOp::Sub => subtract(left, right, false, interner),
        BinaryOp::And | BinaryOp::Or => match (&left, &right) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(if op == BinaryOp::And {
                *a && *b
            } else {
                *a || *b
            })),
            _ => Err(invalid_operands(op.as_symbol(), left.kind(), right.kind())),
        },
    }
}

/// Apply `+=` or `-=` to `target` in place.
///
/// A plain `=` replaces the value.
pub fn apply_compound(
    op: AssignOp,
    target: &mut Value,
    rhs: Value,
    interner: &StringInterner,
) -> Result<(), EvalError> {
    let current = std::mem::replace(target, Value::Bool(false));
    let result = match op {
        AssignOp::Assign => Ok(rhs),
        AssignOp::AddAssign => add(current.clone(), rhs, true),
        AssignOp::SubAssign => subtract(current.clone(), rhs, true, interner),
    };
    match result {
        Ok(value) => {
            *target = value;
            Ok(())
        }
        Err(err) => {
            *target = current;
            Err(err)
        }
    }
}

fn add(left: Value, right: Value, single_item: bool) -> EvalResult {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a
            .checked_add(b)
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("+")),
        (Value::Str(mut a), Value::Str(b)) => {
            a.push_str(&b);
            Ok(Value::Str(a))
        }
        (Value::List(mut a), Value::List(b)) => {
            a.extend(b);
            Ok(Value::List(a))
        }
        (Value::List(mut a), item) if single_item => {
            a.push(item);
            Ok(Value::List(a))
        }
        (left, right) => Err(invalid_operands("+", left.kind(), right.kind())),
    }
}

fn subtract(
    left: Value,
    right: Value,
    single_item: bool,
    interner: &StringInterner,
) -> EvalResult {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a
            .checked_sub(b)
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("-")),
        (Value::List(mut a), Value::List(b)) => {
            for item in &b {
                remove_all(&mut a, item, interner)?;
            }
            Ok(Value::List(a))
        }
        (Value::List(mut a), item) if single_item => {
            remove_all(&mut a, &item, interner)?;
            Ok(Value::List(a))
        }
        (left, right) => Err(invalid_operands("-", left.kind(), right.kind())),
    }
}

/// Remove every occurrence of `item`; at least one must exist.
fn remove_all(
    list: &mut Vec<Value>,
    item: &Value,
    interner: &StringInterner,
) -> Result<(), EvalError> {
    let before = list.len();
    list.retain(|v| v != item);
    if list.len() == before {
        return Err(item_not_found(item, interner));
    }
    Ok(())
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
