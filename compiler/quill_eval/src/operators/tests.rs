use super::*;
use crate::errors::EvalErrorKind;
use crate::value::ValueKind;
use pretty_assertions::assert_eq;

fn binary(op: BinaryOp, left: Value, right: Value) -> EvalResult {
    evaluate_binary(op, left, right, &StringInterner::new())
}

fn compound(op: AssignOp, target: &mut Value, rhs: Value) -> Result<(), EvalError> {
    apply_compound(op, target, rhs, &StringInterner::new())
}

#[test]
fn test_add() {
    assert_eq!(binary(BinaryOp::Add, Value::Int(2), Value::Int(3)), Ok(Value::Int(5)));
    assert_eq!(
        binary(BinaryOp::Add, Value::string("lib"), Value::string(".a")),
        Ok(Value::string("lib.a"))
    );
    assert_eq!(
        binary(
            BinaryOp::Add,
            Value::string_list(["a"]),
            Value::string_list(["b"])
        ),
        Ok(Value::string_list(["a", "b"]))
    );
}

#[test]
fn test_binary_add_rejects_list_plus_item() {
    let err = binary(BinaryOp::Add, Value::string_list(["a"]), Value::string("b")).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::InvalidOperands {
            op: "+",
            left: ValueKind::List,
            right: ValueKind::Str,
        }
    );
}

#[test]
fn test_overflow_is_an_error() {
    let err = binary(BinaryOp::Add, Value::Int(i64::MAX), Value::Int(1)).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::IntegerOverflow { op: "+" });
    let err = binary(BinaryOp::Sub, Value::Int(i64::MIN), Value::Int(1)).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::IntegerOverflow { op: "-" });
}

#[test]
fn test_subtract_lists() {
    assert_eq!(
        binary(
            BinaryOp::Sub,
            Value::string_list(["a", "b", "a", "c"]),
            Value::string_list(["a"])
        ),
        Ok(Value::string_list(["b", "c"]))
    );
    let err = binary(
        BinaryOp::Sub,
        Value::string_list(["a"]),
        Value::string_list(["z"]),
    )
    .unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::ItemNotFound {
            item: "\"z\"".to_string()
        }
    );
}

#[test]
fn test_equality() {
    assert_eq!(
        binary(BinaryOp::Eq, Value::Int(1), Value::Int(1)),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        binary(BinaryOp::NotEq, Value::Int(1), Value::string("1")),
        Ok(Value::Bool(true))
    );
}

#[test]
fn test_logical_requires_bools() {
    assert_eq!(
        binary(BinaryOp::And, Value::Bool(true), Value::Bool(false)),
        Ok(Value::Bool(false))
    );
    assert_eq!(
        binary(BinaryOp::Or, Value::Bool(false), Value::Bool(true)),
        Ok(Value::Bool(true))
    );
    assert!(binary(BinaryOp::Or, Value::Int(0), Value::Bool(true)).is_err());
}

#[test]
fn test_compound_append_item() {
    let mut deps = Value::string_list(["a"]);
    compound(AssignOp::AddAssign, &mut deps, Value::string("b")).unwrap();
    assert_eq!(deps, Value::string_list(["a", "b"]));
}

#[test]
fn test_compound_remove_item() {
    let mut sources = Value::string_list(["a.cc", "b.cc"]);
    compound(AssignOp::SubAssign, &mut sources, Value::string("a.cc")).unwrap();
    assert_eq!(sources, Value::string_list(["b.cc"]));
}

#[test]
fn test_compound_restores_on_error() {
    let mut sources = Value::string_list(["a.cc"]);
    let err = compound(AssignOp::SubAssign, &mut sources, Value::string("z.cc")).unwrap_err();
    assert_eq!(err.kind.error_code(), quill_diagnostic::ErrorCode::E6025);
    assert_eq!(sources, Value::string_list(["a.cc"]));

    let mut count = Value::Int(1);
    assert!(compound(AssignOp::AddAssign, &mut count, Value::string("x")).is_err());
    assert_eq!(count, Value::Int(1));
}

#[test]
fn test_compound_plain_assign_replaces() {
    let mut value = Value::Int(1);
    compound(AssignOp::Assign, &mut value, Value::string("s")).unwrap();
    assert_eq!(value, Value::string("s"));
}
