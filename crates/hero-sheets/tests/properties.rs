//! Property tests for evaluation over arbitrary expressions and environments

use hero_sheets::{evaluate, CompareOperator, Environment, Expression, Value};
use proptest::prelude::*;

const NAMES: &[&str] = &["a", "b", "c", "d", "e"];

fn leaf() -> impl Strategy<Value = Expression> {
    prop_oneof![
        (-50i64..50).prop_map(Expression::Integer),
        (-5i64..5).prop_map(Expression::Modifier),
        (1u32..4, prop::sample::select(vec![4u32, 6, 8, 10, 12, 20]))
            .prop_map(|(count, sides)| Expression::dice(count, sides)),
        any::<bool>().prop_map(Expression::Bool),
        prop::sample::select(vec!["elf", "dwarf"]).prop_map(|s| Expression::string(s)),
        prop::sample::select(NAMES.to_vec()).prop_map(|name| Expression::var(name)),
    ]
}

/// Expressions of bounded depth and size
fn expression_sized(depth: u32, size: u32) -> impl Strategy<Value = Expression> {
    leaf().prop_recursive(depth, size, 4, |inner| {
        let operands = prop::collection::vec(inner.clone(), 0..4);
        prop_oneof![
            operands.clone().prop_map(Expression::Add),
            operands.clone().prop_map(Expression::Multiply),
            operands.clone().prop_map(Expression::Max),
            operands.prop_map(Expression::Min),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expression::divide(l, r)),
            (inner.clone(), inner.clone())
                .prop_map(|(l, r)| Expression::floor(Expression::divide(l, r))),
            inner.clone().prop_map(Expression::ceil),
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(c, t, o)| Expression::if_then_else(c, t, o)),
            (inner.clone(), inner).prop_map(|(l, r)| Expression::compare(
                CompareOperator::LessOrEqual,
                l,
                r
            )),
        ]
    })
}

fn expression() -> impl Strategy<Value = Expression> {
    expression_sized(4, 48)
}

// Bound expressions stay small so that path enumeration through shared names stays cheap
fn environment() -> impl Strategy<Value = Environment> {
    prop::collection::vec(
        (prop::sample::select(NAMES.to_vec()), expression_sized(2, 8)),
        0..8,
    )
    .prop_map(|bindings| {
        bindings
            .into_iter()
            .map(|(name, expr)| (name.to_string(), expr))
            .collect::<Environment>()
    })
}

proptest! {
    // Cyclic environments are common here; every evaluation must still finish
    #[test]
    fn evaluation_terminates_and_is_deterministic(env in environment(), expr in expression()) {
        let before = env.clone();
        let first = evaluate(&env, &expr, &[]);
        let second = evaluate(&env, &expr, &[]);
        prop_assert_eq!(first, second);
        prop_assert_eq!(env, before);
    }

    #[test]
    fn every_binding_evaluates(env in environment()) {
        for name in env.names() {
            let value = env.evaluate_name(name);
            prop_assert_eq!(value.clone(), env.evaluate_name(name));
        }
    }

    #[test]
    fn self_binding_is_undefined(name in prop::sample::select(NAMES.to_vec())) {
        let env: Environment = [(name.to_string(), Expression::var(name))].into_iter().collect();
        prop_assert_eq!(env.evaluate_name(name), Value::Undefined);
    }

    #[test]
    fn modifier_tag_ignores_operand_order(m in -20i64..20, n in -20i64..20) {
        let env = Environment::new();
        let left = evaluate(&env, &Expression::add([Expression::Modifier(m), Expression::Integer(n)]), &[]);
        let right = evaluate(&env, &Expression::add([Expression::Integer(n), Expression::Modifier(m)]), &[]);
        prop_assert_eq!(left.clone(), Value::Modifier(m + n));
        prop_assert_eq!(left, right);
    }

    #[test]
    fn first_binding_wins(first in -9i64..9, second in -9i64..9) {
        let env = Environment::from_bindings([
            ("x".to_string(), Expression::Integer(first)),
            ("x".to_string(), Expression::Integer(second)),
        ]);
        prop_assert_eq!(env.len(), 1);
        prop_assert_eq!(env.evaluate_name("x"), Value::Integer(first));
    }
}
