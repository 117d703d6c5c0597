//! Formula expression tree types

use serde::{Deserialize, Serialize};

/// Formula expression tree
///
/// Expressions are plain immutable data. They are built in code (there is no
/// text syntax) and interpreted by [`crate::evaluate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "args")]
pub enum Expression {
    // === Literals ===
    /// Integer literal
    Integer(i64),
    /// Symbolic dice literal (`count`d`sides`), never rolled
    Dice { count: u32, sides: u32 },
    /// Boolean literal
    Bool(bool),
    /// String literal
    String(String),
    /// Signed adjustment literal, e.g. an ability modifier
    Modifier(i64),

    // === References ===
    /// Reference to a name bound in the environment
    Variable(String),

    // === Arithmetic ===
    Add(Vec<Expression>),
    Multiply(Vec<Expression>),
    Max(Vec<Expression>),
    Min(Vec<Expression>),
    /// Integer division, truncating toward zero
    Divide(Box<Expression>, Box<Expression>),
    /// Rounded division. Only has an effect when `operand` is a [`Expression::Divide`].
    Round {
        mode: RoundingMode,
        operand: Box<Expression>,
    },

    // === Control ===
    If {
        condition: Box<Expression>,
        then: Box<Expression>,
        otherwise: Box<Expression>,
    },

    /// Binary comparison
    Compare {
        op: CompareOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

/// Rounding rule applied to a wrapped division
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundingMode {
    Floor,
    /// Half away from zero
    Round,
    Ceil,
}

impl RoundingMode {
    /// Apply the rounding rule to a float quotient
    pub fn apply(self, quotient: f64) -> f64 {
        match self {
            RoundingMode::Floor => quotient.floor(),
            RoundingMode::Round => quotient.round(),
            RoundingMode::Ceil => quotient.ceil(),
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOperator {
    Equal,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl CompareOperator {
    /// Whether an ordering between the two operands satisfies this operator
    pub fn holds(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            CompareOperator::Equal => ordering == Equal,
            CompareOperator::GreaterThan => ordering == Greater,
            CompareOperator::GreaterOrEqual => ordering != Less,
            CompareOperator::LessThan => ordering == Less,
            CompareOperator::LessOrEqual => ordering != Greater,
        }
    }
}

impl Expression {
    /// Reference a bound name
    pub fn var(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    /// Symbolic dice term
    pub fn dice(count: u32, sides: u32) -> Self {
        Expression::Dice { count, sides }
    }

    pub fn string(s: impl Into<String>) -> Self {
        Expression::String(s.into())
    }

    pub fn add(operands: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Add(operands.into_iter().collect())
    }

    pub fn multiply(operands: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Multiply(operands.into_iter().collect())
    }

    pub fn max(operands: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Max(operands.into_iter().collect())
    }

    pub fn min(operands: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Min(operands.into_iter().collect())
    }

    pub fn divide(dividend: Expression, divisor: Expression) -> Self {
        Expression::Divide(Box::new(dividend), Box::new(divisor))
    }

    pub fn floor(operand: Expression) -> Self {
        Self::rounded(RoundingMode::Floor, operand)
    }

    pub fn round(operand: Expression) -> Self {
        Self::rounded(RoundingMode::Round, operand)
    }

    pub fn ceil(operand: Expression) -> Self {
        Self::rounded(RoundingMode::Ceil, operand)
    }

    fn rounded(mode: RoundingMode, operand: Expression) -> Self {
        Expression::Round {
            mode,
            operand: Box::new(operand),
        }
    }

    /// Conditional with short-circuit branches
    pub fn if_then_else(condition: Expression, then: Expression, otherwise: Expression) -> Self {
        Expression::If {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    pub fn compare(op: CompareOperator, left: Expression, right: Expression) -> Self {
        Expression::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn equal(left: Expression, right: Expression) -> Self {
        Self::compare(CompareOperator::Equal, left, right)
    }

    pub fn greater_than(left: Expression, right: Expression) -> Self {
        Self::compare(CompareOperator::GreaterThan, left, right)
    }

    pub fn greater_or_equal(left: Expression, right: Expression) -> Self {
        Self::compare(CompareOperator::GreaterOrEqual, left, right)
    }

    pub fn less_than(left: Expression, right: Expression) -> Self {
        Self::compare(CompareOperator::LessThan, left, right)
    }

    pub fn less_or_equal(left: Expression, right: Expression) -> Self {
        Self::compare(CompareOperator::LessOrEqual, left, right)
    }

    /// Names referenced by this expression, in encounter order, without duplicates
    pub fn variables(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expression::Integer(_)
            | Expression::Dice { .. }
            | Expression::Bool(_)
            | Expression::String(_)
            | Expression::Modifier(_) => {}
            Expression::Variable(name) => {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
            Expression::Add(operands)
            | Expression::Multiply(operands)
            | Expression::Max(operands)
            | Expression::Min(operands) => {
                for operand in operands {
                    operand.collect_variables(names);
                }
            }
            Expression::Divide(left, right) | Expression::Compare { left, right, .. } => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
            Expression::Round { operand, .. } => operand.collect_variables(names),
            Expression::If {
                condition,
                then,
                otherwise,
            } => {
                condition.collect_variables(names);
                then.collect_variables(names);
                otherwise.collect_variables(names);
            }
        }
    }
}

impl From<i64> for Expression {
    fn from(n: i64) -> Self {
        Expression::Integer(n)
    }
}

impl From<bool> for Expression {
    fn from(b: bool) -> Self {
        Expression::Bool(b)
    }
}

impl From<&str> for Expression {
    fn from(s: &str) -> Self {
        Expression::String(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_variables_in_encounter_order() {
        let expr = Expression::if_then_else(
            Expression::greater_than(Expression::var("level"), Expression::Integer(4)),
            Expression::add([Expression::var("str"), Expression::var("level")]),
            Expression::floor(Expression::divide(Expression::var("dex"), Expression::Integer(2))),
        );
        assert_eq!(expr.variables(), vec!["level", "str", "dex"]);
    }

    #[test]
    fn test_compare_operator_holds() {
        use std::cmp::Ordering;
        assert!(CompareOperator::GreaterOrEqual.holds(Ordering::Equal));
        assert!(!CompareOperator::GreaterThan.holds(Ordering::Equal));
        assert!(CompareOperator::LessOrEqual.holds(Ordering::Less));
        assert!(!CompareOperator::Equal.holds(Ordering::Less));
    }

    #[test]
    fn test_rounding_modes() {
        assert_eq!(RoundingMode::Floor.apply(-0.5), -1.0);
        assert_eq!(RoundingMode::Ceil.apply(-0.5), -0.0);
        assert_eq!(RoundingMode::Round.apply(2.5), 3.0);
        assert_eq!(RoundingMode::Round.apply(-2.5), -3.0);
    }

    #[test]
    fn test_serialized_tag() {
        let json = serde_json::to_value(Expression::dice(2, 6)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "Dice", "args": {"count": 2, "sides": 6}})
        );
    }
}
