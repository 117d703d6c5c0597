//! Read-only stat display and ability scores

use hero_sheets_formula::{evaluate, Environment, Expression, Value};
use serde::{Deserialize, Serialize};

/// A named formula shown on the sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDisplay {
    pub name: String,
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StatMessage {
    SetExpression { expression: Expression },
    Rename { name: String },
}

impl StatDisplay {
    pub fn new(name: impl Into<String>, expression: Expression) -> Self {
        Self {
            name: name.into(),
            expression,
        }
    }

    pub fn update(&self, message: StatMessage) -> StatDisplay {
        let mut next = self.clone();
        match message {
            StatMessage::SetExpression { expression } => next.expression = expression,
            StatMessage::Rename { name } => next.name = name,
        }
        next
    }

    /// Value of this stat's own expression
    ///
    /// The stat's name counts as an ancestor, so a formula that refers back to
    /// itself is `Undefined` even when an earlier field shadows the name.
    pub fn evaluate(&self, env: &Environment) -> Value {
        evaluate(env, &self.expression, &[self.name.as_str()])
    }

    pub(crate) fn contributed_bindings(&self) -> Vec<(String, Expression)> {
        vec![(self.name.clone(), self.expression.clone())]
    }
}

/// An ability score with an optional derived modifier name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScore {
    pub name: String,
    pub value: i64,
    /// Name the derived modifier is bound under, e.g. `"STR mod"`
    #[serde(default)]
    pub modifier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScoreMessage {
    SetValue { value: i64 },
}

impl AbilityScore {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
            modifier: None,
        }
    }

    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifier = Some(modifier.into());
        self
    }

    pub fn update(&self, message: ScoreMessage) -> AbilityScore {
        let mut next = self.clone();
        match message {
            ScoreMessage::SetValue { value } => next.value = value,
        }
        next
    }

    /// `floor((score - 10) / 2)`, tagged as a modifier
    pub fn modifier_expression(&self) -> Expression {
        Expression::add([
            Expression::Modifier(0),
            Expression::floor(Expression::divide(
                Expression::add([Expression::var(self.name.clone()), Expression::Integer(-10)]),
                Expression::Integer(2),
            )),
        ])
    }

    pub(crate) fn contributed_bindings(&self) -> Vec<(String, Expression)> {
        let mut bindings = vec![(self.name.clone(), Expression::Integer(self.value))];
        if let Some(modifier) = &self.modifier {
            bindings.push((modifier.clone(), self.modifier_expression()));
        }
        bindings
    }
}
