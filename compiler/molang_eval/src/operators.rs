//! Operators over runtime values.
//!
//! Numbers go through the same `apply_numeric` functions the constant folder
//! uses. The only non-numeric cases are string concatenation with `+` and
//! string comparison with `==`/`!=`.

use molang_ir::{bool_to_f64, BinaryOp, UnaryOp};

use crate::Value;

/// Apply a binary operator to two evaluated operands.
///
/// Short-circuiting is the interpreter's job; here `&&`, `||` and `??` just
/// combine two values that were both evaluated.
pub(crate) fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match (op, left, right) {
        (BinaryOp::Add, Value::String(_), _) | (BinaryOp::Add, _, Value::String(_)) => {
            Value::from(format!("{left}{right}"))
        }
        (BinaryOp::Eq, Value::String(a), Value::String(b)) => Value::from(a == b),
        (BinaryOp::NotEq, Value::String(a), Value::String(b)) => Value::from(a != b),
        (BinaryOp::And, _, _) => Value::from(left.is_truthy() && right.is_truthy()),
        (BinaryOp::Or, _, _) => Value::from(left.is_truthy() || right.is_truthy()),
        (BinaryOp::Coalesce, _, _) => {
            if left.is_void() {
                right.clone()
            } else {
                left.clone()
            }
        }
        _ => Value::Number(op.apply_numeric(left.as_number(), right.as_number())),
    }
}

pub(crate) fn evaluate_unary(op: UnaryOp, operand: &Value) -> Value {
    match op {
        UnaryOp::Neg => Value::Number(-operand.as_number()),
        UnaryOp::Not => Value::Number(bool_to_f64(!operand.is_truthy())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> Value {
        Value::from(n)
    }

    #[test]
    fn test_numeric_ops() {
        assert_eq!(evaluate_binary(BinaryOp::Add, &num(2.0), &num(3.0)), num(5.0));
        assert_eq!(evaluate_binary(BinaryOp::Mod, &num(7.0), &num(4.0)), num(3.0));
        assert_eq!(evaluate_binary(BinaryOp::Lt, &num(1.0), &num(2.0)), num(1.0));
        assert_eq!(
            evaluate_binary(BinaryOp::Div, &num(1.0), &num(0.0)),
            num(f64::INFINITY)
        );
    }

    #[test]
    fn test_void_coerces_to_zero() {
        assert_eq!(evaluate_binary(BinaryOp::Add, &Value::Void, &num(3.0)), num(3.0));
        assert_eq!(evaluate_unary(UnaryOp::Neg, &Value::Void), num(-0.0));
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(
            evaluate_binary(BinaryOp::Add, &Value::from("hp: "), &num(20.0)),
            Value::from("hp: 20")
        );
        assert_eq!(
            evaluate_binary(BinaryOp::Add, &num(1.5), &Value::from("x")),
            Value::from("1.5x")
        );
    }

    #[test]
    fn test_string_comparison() {
        let a = Value::from("idle");
        let b = Value::from("walk");
        assert_eq!(evaluate_binary(BinaryOp::Eq, &a, &a.clone()), num(1.0));
        assert_eq!(evaluate_binary(BinaryOp::Eq, &a, &b), num(0.0));
        assert_eq!(evaluate_binary(BinaryOp::NotEq, &a, &b), num(1.0));
        // A string compared with a number compares as numbers.
        assert_eq!(evaluate_binary(BinaryOp::Eq, &a, &num(0.0)), num(1.0));
    }

    #[test]
    fn test_logic_uses_value_truthiness() {
        assert_eq!(
            evaluate_binary(BinaryOp::And, &Value::from("x"), &num(2.0)),
            num(1.0)
        );
        assert_eq!(evaluate_binary(BinaryOp::Or, &Value::Void, &num(0.0)), num(0.0));
        assert_eq!(evaluate_unary(UnaryOp::Not, &Value::from("")), num(1.0));
    }

    #[test]
    fn test_coalesce() {
        assert_eq!(
            evaluate_binary(BinaryOp::Coalesce, &Value::Void, &num(4.0)),
            num(4.0)
        );
        assert_eq!(
            evaluate_binary(BinaryOp::Coalesce, &num(0.0), &num(4.0)),
            num(0.0)
        );
    }
}
