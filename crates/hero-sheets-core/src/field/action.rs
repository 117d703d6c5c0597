//! Expandable action/ability blocks and rest triggers

use hero_sheets_formula::{Environment, Expression, Value};
use serde::{Deserialize, Serialize};

/// A labelled formula inside an action block (attack bonus, damage, DC, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub label: String,
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionBlock {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub expanded: bool,
    #[serde(default)]
    pub entries: Vec<ActionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActionMessage {
    ToggleExpanded,
}

impl ActionBlock {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            expanded: false,
            entries: Vec::new(),
        }
    }

    pub fn with_entry(mut self, label: impl Into<String>, expression: Expression) -> Self {
        self.entries.push(ActionEntry {
            label: label.into(),
            expression,
        });
        self
    }

    pub fn update(&self, message: ActionMessage) -> ActionBlock {
        let mut next = self.clone();
        match message {
            ActionMessage::ToggleExpanded => next.expanded = !next.expanded,
        }
        next
    }

    /// Evaluate every entry for display
    pub fn evaluate_entries(&self, env: &Environment) -> Vec<(&str, Value)> {
        self.entries
            .iter()
            .map(|entry| (entry.label.as_str(), env.evaluate(&entry.expression)))
            .collect()
    }
}

/// Kind of rest taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RestKind {
    Short,
    Long,
}

/// Button-like field that triggers a rest for the whole sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestControl {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RestMessage {
    TakeRest { kind: RestKind },
}

impl RestControl {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hero_sheets_formula::DiceSum;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_toggle_expanded() {
        let block = ActionBlock::new("Longsword", "Melee weapon attack");
        let opened = block.update(ActionMessage::ToggleExpanded);
        assert!(opened.expanded);
        assert!(!opened.update(ActionMessage::ToggleExpanded).expanded);
    }

    #[test]
    fn test_evaluate_entries() {
        let block = ActionBlock::new("Longsword", "")
            .with_entry(
                "To hit",
                Expression::add([Expression::var("STR mod"), Expression::var("prof")]),
            )
            .with_entry(
                "Damage",
                Expression::add([Expression::dice(1, 8), Expression::var("STR mod")]),
            );
        let env = Environment::from_bindings([
            ("STR mod".to_string(), Expression::Modifier(3)),
            ("prof".to_string(), Expression::Modifier(2)),
        ]);

        assert_eq!(
            block.evaluate_entries(&env),
            vec![
                ("To hit", Value::Modifier(5)),
                ("Damage", Value::DiceSum(DiceSum::new([(1, 8)], 3))),
            ]
        );
    }
}
