//! # hero-sheets-formula
//!
//! Expression language for hero-sheets character sheets.
//!
//! This crate provides:
//! - Expression trees built in code ([`Expression`])
//! - A typed value algebra with symbolic dice ([`Value`], [`DiceSum`])
//! - First-wins name environments ([`Environment`])
//! - A total, cycle-safe evaluator ([`evaluate`])
//! - Dependency tracking between bindings
//!
//! ## Example
//!
//! ```rust
//! use hero_sheets_formula::{evaluate, Environment, Expression, Value};
//!
//! let env = Environment::from_bindings([
//!     ("prof".to_string(), Expression::Modifier(2)),
//!     ("str".to_string(), Expression::Integer(3)),
//! ]);
//! let attack = Expression::add([Expression::var("str"), Expression::var("prof")]);
//! assert_eq!(evaluate(&env, &attack, &[]), Value::Modifier(5));
//! ```

pub mod ast;
pub mod dependency;
pub mod environment;
pub mod evaluator;
pub mod value;

pub use ast::{CompareOperator, Expression, RoundingMode};
pub use dependency::DependencyGraph;
pub use environment::{Binding, BindingSource, Environment};
pub use evaluator::evaluate;
pub use value::{DiceSum, DiceTerm, NumberKind, Value};
