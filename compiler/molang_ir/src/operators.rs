//! Operators and their numeric semantics.
//!
//! The numeric functions here are the single source of truth for arithmetic:
//! the resolver's constant folder and the interpreter both call them, so a
//! folded literal is bit-identical to what evaluation would have produced.

use std::fmt;

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    /// `??`
    Coalesce,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Coalesce => "??",
        }
    }

    /// Apply the operator to two numbers.
    ///
    /// Division and remainder follow IEEE-754 (`1 / 0` is `inf`, `0 / 0` is
    /// `NaN`). Comparisons and logical operators yield `1.0` or `0.0`. A number
    /// is always a resolved value, so `??` yields its left operand.
    pub fn apply_numeric(self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOp::Add => left + right,
            BinaryOp::Sub => left - right,
            BinaryOp::Mul => left * right,
            BinaryOp::Div => left / right,
            BinaryOp::Mod => left % right,
            BinaryOp::Eq => bool_to_f64(numbers_equal(left, right)),
            BinaryOp::NotEq => bool_to_f64(!numbers_equal(left, right)),
            BinaryOp::Lt => bool_to_f64(left < right),
            BinaryOp::LtEq => bool_to_f64(left <= right),
            BinaryOp::Gt => bool_to_f64(left > right),
            BinaryOp::GtEq => bool_to_f64(left >= right),
            BinaryOp::And => bool_to_f64(is_truthy(left) && is_truthy(right)),
            BinaryOp::Or => bool_to_f64(is_truthy(left) || is_truthy(right)),
            BinaryOp::Coalesce => left,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }

    pub fn apply_numeric(self, operand: f64) -> f64 {
        match self {
            UnaryOp::Neg => -operand,
            UnaryOp::Not => bool_to_f64(!is_truthy(operand)),
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Numeric truthiness: every non-zero value, including `NaN`, is true.
#[inline]
pub fn is_truthy(value: f64) -> bool {
    value != 0.0
}

#[inline]
pub fn bool_to_f64(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

#[inline]
#[allow(clippy::float_cmp)]
fn numbers_equal(left: f64, right: f64) -> bool {
    left == right
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_num(actual: f64, expected: f64) {
        assert!(
            actual == expected || (actual.is_nan() && expected.is_nan()),
            "{actual} != {expected}"
        );
    }

    #[test]
    fn test_arithmetic() {
        assert_num(BinaryOp::Add.apply_numeric(2.0, 3.0), 5.0);
        assert_num(BinaryOp::Sub.apply_numeric(2.0, 3.0), -1.0);
        assert_num(BinaryOp::Mul.apply_numeric(2.5, 4.0), 10.0);
        assert_num(BinaryOp::Div.apply_numeric(7.0, 2.0), 3.5);
        assert_num(BinaryOp::Mod.apply_numeric(7.0, 3.0), 1.0);
        assert_num(BinaryOp::Mod.apply_numeric(-7.0, 3.0), -1.0);
    }

    #[test]
    fn test_division_by_zero_is_ieee() {
        assert_num(BinaryOp::Div.apply_numeric(1.0, 0.0), f64::INFINITY);
        assert_num(BinaryOp::Div.apply_numeric(-1.0, 0.0), f64::NEG_INFINITY);
        assert_num(BinaryOp::Div.apply_numeric(0.0, 0.0), f64::NAN);
        assert_num(BinaryOp::Mod.apply_numeric(1.0, 0.0), f64::NAN);
    }

    #[test]
    fn test_comparisons_yield_zero_or_one() {
        assert_num(BinaryOp::Lt.apply_numeric(1.0, 2.0), 1.0);
        assert_num(BinaryOp::GtEq.apply_numeric(1.0, 2.0), 0.0);
        assert_num(BinaryOp::Eq.apply_numeric(3.0, 3.0), 1.0);
        assert_num(BinaryOp::NotEq.apply_numeric(f64::NAN, f64::NAN), 1.0);
    }

    #[test]
    fn test_logic() {
        assert_num(BinaryOp::And.apply_numeric(2.0, -1.0), 1.0);
        assert_num(BinaryOp::And.apply_numeric(2.0, 0.0), 0.0);
        assert_num(BinaryOp::Or.apply_numeric(0.0, 0.0), 0.0);
        assert_num(BinaryOp::Coalesce.apply_numeric(0.0, 9.0), 0.0);
        assert_num(UnaryOp::Not.apply_numeric(0.0), 1.0);
        assert_num(UnaryOp::Not.apply_numeric(0.25), 0.0);
        assert_num(UnaryOp::Neg.apply_numeric(4.0), -4.0);
    }
}
