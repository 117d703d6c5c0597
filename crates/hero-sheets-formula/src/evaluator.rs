//! Formula evaluator
//!
//! Evaluates expression trees against an [`Environment`] to produce values.
//! Evaluation is total: every failure (unbound or cyclic names, type mismatch,
//! overflow, strict division by zero) yields [`Value::Undefined`].

use crate::ast::{CompareOperator, Expression, RoundingMode};
use crate::environment::Environment;
use crate::value::{DiceSum, NumberKind, Value};

/// Evaluate an expression
///
/// `ancestors` are names already being resolved further up the call chain;
/// referencing one of them again yields `Undefined`. Pass `&[]` at the top level.
pub fn evaluate<'a>(env: &'a Environment, expr: &'a Expression, ancestors: &[&'a str]) -> Value {
    let mut stack = ancestors.to_vec();
    eval(env, expr, &mut stack)
}

fn eval<'a>(env: &'a Environment, expr: &'a Expression, stack: &mut Vec<&'a str>) -> Value {
    match expr {
        // === Literals ===
        Expression::Integer(n) => Value::Integer(*n),
        Expression::Modifier(n) => Value::Modifier(*n),
        Expression::Dice { count, sides } => Value::DiceSum(DiceSum::single(*count, *sides)),
        Expression::Bool(b) => Value::Bool(*b),
        Expression::String(s) => Value::String(s.clone()),

        // === References ===
        Expression::Variable(name) => evaluate_variable(env, name, stack),

        // === Arithmetic ===
        Expression::Add(operands) => evaluate_add(env, operands, stack),
        Expression::Multiply(operands) => {
            fold_numeric(env, operands, stack, Some(1), i64::checked_mul)
        }
        Expression::Max(operands) => {
            fold_numeric(env, operands, stack, None, |a, b| Some(a.max(b)))
        }
        Expression::Min(operands) => {
            fold_numeric(env, operands, stack, None, |a, b| Some(a.min(b)))
        }
        Expression::Divide(left, right) => evaluate_divide(env, left, right, stack),
        Expression::Round { mode, operand } => match operand.as_ref() {
            Expression::Divide(left, right) => evaluate_rounded_divide(env, *mode, left, right, stack),
            other => eval(env, other, stack),
        },

        // === Control ===
        Expression::If {
            condition,
            then,
            otherwise,
        } => match eval(env, condition, stack).truthiness() {
            Some(true) => eval(env, then, stack),
            Some(false) => eval(env, otherwise, stack),
            None => Value::Undefined,
        },

        Expression::Compare { op, left, right } => {
            let left = eval(env, left, stack);
            let right = eval(env, right, stack);
            compare_values(*op, &left, &right)
        }
    }
}

/// Resolve a variable, rejecting names already on the resolution path
fn evaluate_variable<'a>(env: &'a Environment, name: &'a str, stack: &mut Vec<&'a str>) -> Value {
    if stack.contains(&name) {
        return Value::Undefined;
    }
    let Some(bound) = env.get(name) else {
        return Value::Undefined;
    };

    stack.push(name);
    let value = eval(env, bound, stack);
    stack.pop();
    value
}

/// Sum operands; any dice operand turns the whole sum into a `DiceSum`
fn evaluate_add<'a>(
    env: &'a Environment,
    operands: &'a [Expression],
    stack: &mut Vec<&'a str>,
) -> Value {
    let mut total: i64 = 0;
    let mut kind = NumberKind::Integer;
    let mut dice: Option<DiceSum> = None;

    for operand in operands {
        let addend = match eval(env, operand, stack) {
            Value::Integer(n) => n,
            Value::Modifier(n) => {
                kind = NumberKind::Modifier;
                n
            }
            Value::DiceSum(sum) => {
                dice.get_or_insert_with(DiceSum::default)
                    .terms
                    .extend(sum.terms);
                sum.flat
            }
            Value::Bool(_) | Value::String(_) | Value::Undefined => return Value::Undefined,
        };
        total = match total.checked_add(addend) {
            Some(t) => t,
            None => return Value::Undefined,
        };
    }

    match dice {
        Some(mut sum) => {
            sum.flat = total;
            Value::DiceSum(sum)
        }
        None => kind.value(total),
    }
}

/// Fold numeric operands; the first operand fixes the result kind
fn fold_numeric<'a, F>(
    env: &'a Environment,
    operands: &'a [Expression],
    stack: &mut Vec<&'a str>,
    empty: Option<i64>,
    combine: F,
) -> Value
where
    F: Fn(i64, i64) -> Option<i64>,
{
    let mut acc: Option<(i64, NumberKind)> = None;

    for operand in operands {
        let Some((n, operand_kind)) = eval(env, operand, stack).as_numeric() else {
            return Value::Undefined;
        };
        acc = match acc {
            None => Some((n, operand_kind)),
            Some((current, kind)) => match combine(current, n) {
                Some(next) => Some((next, kind)),
                None => return Value::Undefined,
            },
        };
    }

    match (acc, empty) {
        (Some((n, kind)), _) => kind.value(n),
        (None, Some(n)) => Value::Integer(n),
        (None, None) => Value::Undefined,
    }
}

fn numeric_operands<'a>(
    env: &'a Environment,
    left: &'a Expression,
    right: &'a Expression,
    stack: &mut Vec<&'a str>,
) -> Option<((i64, NumberKind), i64)> {
    let dividend = eval(env, left, stack).as_numeric()?;
    let divisor = eval(env, right, stack).as_number()?;
    Some((dividend, divisor))
}

/// Truncating integer division; dividing by zero gives `Integer(0)`
fn evaluate_divide<'a>(
    env: &'a Environment,
    left: &'a Expression,
    right: &'a Expression,
    stack: &mut Vec<&'a str>,
) -> Value {
    let Some(((a, kind), b)) = numeric_operands(env, left, right, stack) else {
        return Value::Undefined;
    };
    if b == 0 {
        return Value::Integer(0);
    }
    a.checked_div(b)
        .map(|q| kind.value(q))
        .unwrap_or(Value::Undefined)
}

/// Float division followed by rounding; dividing by zero is `Undefined`
fn evaluate_rounded_divide<'a>(
    env: &'a Environment,
    mode: RoundingMode,
    left: &'a Expression,
    right: &'a Expression,
    stack: &mut Vec<&'a str>,
) -> Value {
    let Some(((a, kind), b)) = numeric_operands(env, left, right, stack) else {
        return Value::Undefined;
    };
    if b == 0 {
        return Value::Undefined;
    }

    let rounded = mode.apply(a as f64 / b as f64);
    if !rounded.is_finite() || rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
        return Value::Undefined;
    }
    kind.value(rounded as i64)
}

fn compare_values(op: CompareOperator, left: &Value, right: &Value) -> Value {
    if let (Some(l), Some(r)) = (left.as_number(), right.as_number()) {
        return Value::Bool(op.holds(l.cmp(&r)));
    }
    match (left, right) {
        // Strings only support equality; orderings are always false
        (Value::String(l), Value::String(r)) => {
            Value::Bool(op == CompareOperator::Equal && l == r)
        }
        _ => Value::Undefined,
    }
}
