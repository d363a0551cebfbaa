use std::cmp::Ordering;

use golog_types::{Expr, ExprOp, ExprOpCode};
use thiserror::Error;

use crate::state::State;
use crate::value::Value;

pub type EvalResult<T = Value> = Result<T, EvalError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("type error in '{op}': expected {expected}, got {actual}")]
    TypeError {
        op: &'static str,
        expected: &'static str,
        actual: String,
    },
    #[error("numeric overflow in '{0}'")]
    NumericOverflow(&'static str),
    #[error("division by zero in '{0}'")]
    DivideByZero(&'static str),
    #[error("condition '{expr}' evaluated to {actual}, expected bool")]
    NotBoolean { expr: String, actual: &'static str },
}

/// Evaluate an expression against `state`.
///
/// Identifiers resolve against `state.vars` first, then domain facts; a leading
/// `state.` segment addresses facts directly. Unresolved identifiers yield `null`.
pub fn eval_expr(expr: &Expr, state: &State) -> EvalResult {
    match expr {
        Expr::Ref(eref) => Ok(resolve_ref(&eref.reference, state)),
        Expr::Const(lit) => Ok(Value::from(&lit.value)),
        Expr::Op(op) => eval_op(op, state),
    }
}

/// Evaluate a condition; anything but a bool is a programmer error.
pub fn eval_bool(expr: &Expr, state: &State) -> EvalResult<bool> {
    let value = eval_expr(expr, state)?;
    value.as_bool().ok_or_else(|| EvalError::NotBoolean {
        expr: expr.to_string(),
        actual: value.kind(),
    })
}

fn resolve_ref(reference: &str, state: &State) -> Value {
    let (head, tail) = match reference.split_once('.') {
        Some((head, tail)) => (head, tail),
        None => (reference, ""),
    };
    if let Some(value) = state.vars.get(head) {
        return access_path(value, tail);
    }
    if head == "state" && !tail.is_empty() {
        let (key, rest) = match tail.split_once('.') {
            Some((key, rest)) => (key, rest),
            None => (tail, ""),
        };
        return state
            .facts
            .get(key)
            .map(|value| access_path(value, rest))
            .unwrap_or_default();
    }
    state
        .facts
        .get(head)
        .map(|value| access_path(value, tail))
        .unwrap_or_default()
}

fn access_path(root: &Value, path: &str) -> Value {
    let mut current = root;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        current = match current {
            Value::Record(fields) => match fields.get(segment) {
                Some(value) => value,
                None => return Value::Null,
            },
            _ => return Value::Null,
        };
    }
    current.clone()
}

fn eval_op(op: &ExprOp, state: &State) -> EvalResult {
    let code = op.op;
    let left = eval_expr(&op.left, state)?;
    // Logical operators short-circuit; evaluation is pure so only the result differs.
    match code {
        ExprOpCode::And => {
            if !as_bool(code, &left)? {
                return Ok(Value::Bool(false));
            }
            let right = eval_expr(&op.right, state)?;
            return Ok(Value::Bool(as_bool(code, &right)?));
        }
        ExprOpCode::Or => {
            if as_bool(code, &left)? {
                return Ok(Value::Bool(true));
            }
            let right = eval_expr(&op.right, state)?;
            return Ok(Value::Bool(as_bool(code, &right)?));
        }
        _ => {}
    }
    let right = eval_expr(&op.right, state)?;
    apply_op(code, &left, &right)
}

fn apply_op(op: ExprOpCode, lhs: &Value, rhs: &Value) -> EvalResult {
    use ExprOpCode::*;
    match op {
        Eq => Ok(Value::Bool(lhs.loosely_equals(rhs))),
        Ne => Ok(Value::Bool(!lhs.loosely_equals(rhs))),
        Lt => Ok(Value::Bool(compare_orderable(op, lhs, rhs)?.is_lt())),
        Le => Ok(Value::Bool(compare_orderable(op, lhs, rhs)?.is_le())),
        Gt => Ok(Value::Bool(compare_orderable(op, lhs, rhs)?.is_gt())),
        Ge => Ok(Value::Bool(compare_orderable(op, lhs, rhs)?.is_ge())),
        Add => match (lhs, rhs) {
            (Value::Text(a), Value::Text(b)) => Ok(Value::Text(format!("{a}{b}"))),
            _ => arithmetic(op, lhs, rhs, i64::checked_add, |a, b| a + b),
        },
        Sub => arithmetic(op, lhs, rhs, i64::checked_sub, |a, b| a - b),
        Mul => arithmetic(op, lhs, rhs, i64::checked_mul, |a, b| a * b),
        Div => {
            if is_zero(rhs) {
                return Err(EvalError::DivideByZero(op.symbol()));
            }
            arithmetic(op, lhs, rhs, i64::checked_div, |a, b| a / b)
        }
        Mod => {
            if is_zero(rhs) {
                return Err(EvalError::DivideByZero(op.symbol()));
            }
            arithmetic(op, lhs, rhs, i64::checked_rem, |a, b| a % b)
        }
        And | Or => Ok(Value::Bool(as_bool(op, lhs)? && as_bool(op, rhs)?)),
    }
}

fn arithmetic(
    op: ExprOpCode,
    lhs: &Value,
    rhs: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> EvalResult {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => int_op(*a, *b)
            .map(Value::Int)
            .ok_or(EvalError::NumericOverflow(op.symbol())),
        _ => {
            let a = as_number(op, lhs)?;
            let b = as_number(op, rhs)?;
            Ok(Value::Float(float_op(a, b)))
        }
    }
}

fn compare_orderable(op: ExprOpCode, a: &Value, b: &Value) -> EvalResult<Ordering> {
    match (a, b) {
        (Value::Int(lhs), Value::Int(rhs)) => Ok(lhs.cmp(rhs)),
        (Value::Text(lhs), Value::Text(rhs)) => Ok(lhs.cmp(rhs)),
        _ => {
            let lhs = as_number(op, a)?;
            let rhs = as_number(op, b)?;
            lhs.partial_cmp(&rhs).ok_or_else(|| EvalError::TypeError {
                op: op.symbol(),
                expected: "comparable pair",
                actual: "NaN".into(),
            })
        }
    }
}

fn is_zero(value: &Value) -> bool {
    matches!(value, Value::Int(0)) || matches!(value, Value::Float(x) if *x == 0.0)
}

fn as_number(op: ExprOpCode, value: &Value) -> EvalResult<f64> {
    value.as_f64().ok_or_else(|| EvalError::TypeError {
        op: op.symbol(),
        expected: "number",
        actual: value.kind().into(),
    })
}

fn as_bool(op: ExprOpCode, value: &Value) -> EvalResult<bool> {
    value.as_bool().ok_or_else(|| EvalError::TypeError {
        op: op.symbol(),
        expected: "bool",
        actual: value.kind().into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use golog_types::Literal;

    fn sample_state() -> State {
        let mut state = State::from_facts([
            ("location", Value::from("l1")),
            ("fuel", Value::Int(4)),
            (
                "truck",
                Value::record([("cargo", Value::from("boxes")), ("load", Value::Int(2))]),
            ),
        ]);
        state.bind_var("x", Value::Int(1));
        state
    }

    fn eval(expr: Expr) -> EvalResult {
        eval_expr(&expr, &sample_state())
    }

    #[test]
    fn bare_identifier_reads_fact() {
        let value = eval(Expr::reference("location")).unwrap();
        assert_eq!(value, Value::from("l1"));
    }

    #[test]
    fn state_prefix_reads_fact_path() {
        let value = eval(Expr::reference("state.truck.cargo")).unwrap();
        assert_eq!(value, Value::from("boxes"));
    }

    #[test]
    fn vars_shadow_facts() {
        let mut state = sample_state();
        state.bind_var("location", Value::from("shadow"));
        let value = eval_expr(&Expr::reference("location"), &state).unwrap();
        assert_eq!(value, Value::from("shadow"));
        let fact = eval_expr(&Expr::reference("state.location"), &state).unwrap();
        assert_eq!(fact, Value::from("l1"));
    }

    #[test]
    fn unresolved_identifier_is_null() {
        assert_eq!(eval(Expr::reference("missing")).unwrap(), Value::Null);
        assert_eq!(eval(Expr::reference("truck.nothing")).unwrap(), Value::Null);
    }

    #[test]
    fn equality_compares_ints_and_floats_numerically() {
        let expr = Expr::eq(Expr::reference("x"), Expr::lit(1.0));
        assert_eq!(eval(expr).unwrap(), Value::Bool(true));
        let expr = Expr::ne(Expr::reference("location"), Expr::lit("l2"));
        assert_eq!(eval(expr).unwrap(), Value::Bool(true));
    }

    #[test]
    fn comparing_missing_identifier_is_false() {
        let expr = Expr::eq(Expr::reference("nobody"), Expr::lit(1));
        assert_eq!(eval(expr).unwrap(), Value::Bool(false));
    }

    #[test]
    fn arithmetic_mixes_ints_and_floats() {
        let expr = Expr::binary(ExprOpCode::Add, Expr::reference("fuel"), Expr::lit(0.5));
        assert_eq!(eval(expr).unwrap(), Value::Float(4.5));
        let expr = Expr::binary(ExprOpCode::Mul, Expr::reference("fuel"), Expr::lit(3));
        assert_eq!(eval(expr).unwrap(), Value::Int(12));
    }

    #[test]
    fn text_addition_concatenates() {
        let expr = Expr::binary(ExprOpCode::Add, Expr::lit("l"), Expr::lit("4"));
        assert_eq!(eval(expr).unwrap(), Value::from("l4"));
    }

    #[test]
    fn less_than_over_texts_and_numbers() {
        let expr = Expr::binary(ExprOpCode::Lt, Expr::lit("l1"), Expr::lit("l2"));
        assert_eq!(eval(expr).unwrap(), Value::Bool(true));
        let expr = Expr::binary(ExprOpCode::Ge, Expr::lit(2.5), Expr::reference("fuel"));
        assert_eq!(eval(expr).unwrap(), Value::Bool(false));
    }

    #[test]
    fn orderings_include_equal_operands() {
        let fuel = || Expr::reference("fuel");
        let cases = [
            (ExprOpCode::Lt, false),
            (ExprOpCode::Le, true),
            (ExprOpCode::Gt, false),
            (ExprOpCode::Ge, true),
        ];
        for (op, expected) in cases {
            let expr = Expr::binary(op, fuel(), Expr::lit(4));
            assert_eq!(eval(expr).unwrap(), Value::Bool(expected), "{}", op.symbol());
        }
    }

    #[test]
    fn divide_by_zero_errors() {
        let expr = Expr::binary(ExprOpCode::Div, Expr::lit(7), Expr::lit(0));
        assert_eq!(eval(expr).unwrap_err(), EvalError::DivideByZero("/"));
    }

    #[test]
    fn integer_overflow_errors() {
        let expr = Expr::binary(ExprOpCode::Add, Expr::lit(i64::MAX), Expr::lit(1));
        assert_eq!(eval(expr).unwrap_err(), EvalError::NumericOverflow("+"));
    }

    #[test]
    fn boolean_ops_require_bool_args() {
        let expr = Expr::and(Expr::lit(true), Expr::lit(1));
        let err = eval(expr).unwrap_err();
        assert!(matches!(err, EvalError::TypeError { expected, .. } if expected == "bool"));
    }

    #[test]
    fn or_short_circuits_past_malformed_right_side() {
        let bad = Expr::binary(ExprOpCode::Div, Expr::lit(1), Expr::lit(0));
        let expr = Expr::binary(ExprOpCode::Or, Expr::lit(true), bad);
        assert_eq!(eval(expr).unwrap(), Value::Bool(true));
    }

    #[test]
    fn condition_must_be_boolean() {
        let err = eval_bool(&Expr::lit(Literal::Null), &sample_state()).unwrap_err();
        assert!(matches!(err, EvalError::NotBoolean { actual: "null", .. }));
    }
}
