//! Flat points tracker (e.g. sorcery points, ki)

use hero_sheets_formula::Expression;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsTracker {
    pub name: String,
    pub current: u32,
    pub max: u32,
    #[serde(default)]
    pub resets_on_long_rest: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PointsMessage {
    SetCurrent { value: u32 },
    SetMax { value: u32 },
    ToggleLongRestReset,
}

impl PointsTracker {
    pub fn new(name: impl Into<String>, current: u32, max: u32) -> Self {
        Self {
            name: name.into(),
            current: current.min(max),
            max,
            resets_on_long_rest: false,
        }
    }

    /// Mark the tracker as refilled by a long rest
    pub fn with_long_rest_reset(mut self) -> Self {
        self.resets_on_long_rest = true;
        self
    }

    /// Name the maximum is bound under, e.g. `"Ki max"`
    pub fn max_name(&self) -> String {
        format!("{} max", self.name)
    }

    pub fn update(&self, message: PointsMessage) -> PointsTracker {
        let mut next = self.clone();
        match message {
            PointsMessage::SetCurrent { value } => next.current = value.min(next.max),
            PointsMessage::SetMax { value } => {
                next.max = value;
                next.current = next.current.min(value);
            }
            PointsMessage::ToggleLongRestReset => {
                next.resets_on_long_rest = !next.resets_on_long_rest;
            }
        }
        next
    }

    /// Copy with `amount` points added. Conversions may exceed the maximum.
    pub(crate) fn gain(&self, amount: u32) -> PointsTracker {
        let mut next = self.clone();
        next.current = next.current.saturating_add(amount);
        next
    }

    /// Copy with `cost` points removed, if enough are available
    pub(crate) fn pay(&self, cost: u32) -> Option<PointsTracker> {
        let remaining = self.current.checked_sub(cost)?;
        let mut next = self.clone();
        next.current = remaining;
        Some(next)
    }

    pub(crate) fn reset(&self) -> PointsTracker {
        let mut next = self.clone();
        next.current = next.max;
        next
    }

    pub(crate) fn contributed_bindings(&self) -> Vec<(String, Expression)> {
        vec![
            (self.name.clone(), Expression::Integer(i64::from(self.current))),
            (self.max_name(), Expression::Integer(i64::from(self.max))),
        ]
    }
}
