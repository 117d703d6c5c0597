//! Leveled slot tracker (e.g. spell slots)

use crate::modifier::SheetModifier;
use crate::sheet::SheetSettings;
use hero_sheets_formula::{Environment, Expression, Value};
use serde::{Deserialize, Serialize};

/// Remaining and maximum slots at one level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotLevel {
    pub current: u32,
    pub max: u32,
}

impl SlotLevel {
    /// Create a level; `current` is clamped to `max`
    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }
}

/// Ordered list of per-level slot counters
///
/// Level indices are 0-based: index `0` holds 1st-level slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTracker {
    pub name: String,
    pub levels: Vec<SlotLevel>,
    #[serde(default)]
    pub resets_on_long_rest: bool,
    /// Name of the points tracker slots convert to and from
    #[serde(default)]
    pub points: Option<String>,
}

/// Edits and actions for a [`SlotTracker`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SlotsMessage {
    SetCurrent { level: usize, value: u32 },
    SetMax { level: usize, value: u32 },
    AddLevel,
    RemoveLevel,
    ToggleLongRestReset,
    LinkPoints { points: Option<String> },
    /// Spend a slot to gain points
    BurnAtLevel { level: usize },
    /// Spend points to regain a slot
    BuyAtLevel { level: usize },
}

impl SlotTracker {
    /// Create a tracker with no levels
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            levels: Vec::new(),
            resets_on_long_rest: false,
            points: None,
        }
    }

    /// Append a level
    pub fn with_level(mut self, current: u32, max: u32) -> Self {
        self.levels.push(SlotLevel::new(current, max));
        self
    }

    /// Link the tracker to a points tracker by name
    pub fn linked_to(mut self, points: impl Into<String>) -> Self {
        self.points = Some(points.into());
        self
    }

    /// Mark the tracker as refilled by a long rest
    pub fn with_long_rest_reset(mut self) -> Self {
        self.resets_on_long_rest = true;
        self
    }

    pub fn level(&self, level: usize) -> Option<&SlotLevel> {
        self.levels.get(level)
    }

    /// Name the remaining slots of a level are bound under, e.g. `"Spell Slots 1"`
    pub fn level_name(&self, level: usize) -> String {
        format!("{} {}", self.name, level + 1)
    }

    pub fn update(&self, message: SlotsMessage) -> (SlotTracker, Option<SheetModifier>) {
        let mut next = self.clone();
        match message {
            SlotsMessage::SetCurrent { level, value } => match next.levels.get_mut(level) {
                Some(slot) => slot.current = value.min(slot.max),
                None => log::debug!("{}: no slot level {}", self.name, level),
            },
            SlotsMessage::SetMax { level, value } => match next.levels.get_mut(level) {
                Some(slot) => *slot = SlotLevel::new(slot.current, value),
                None => log::debug!("{}: no slot level {}", self.name, level),
            },
            SlotsMessage::AddLevel => next.levels.push(SlotLevel::default()),
            SlotsMessage::RemoveLevel => {
                next.levels.pop();
            }
            SlotsMessage::ToggleLongRestReset => {
                next.resets_on_long_rest = !next.resets_on_long_rest;
            }
            SlotsMessage::LinkPoints { points } => next.points = points,
            SlotsMessage::BurnAtLevel { level } => {
                let modifier = self.has_level(level).then(|| SheetModifier::BurnSlot {
                    tracker: self.name.clone(),
                    level,
                    points: self.points.clone(),
                });
                return (next, modifier);
            }
            SlotsMessage::BuyAtLevel { level } => {
                let modifier = self.has_level(level).then(|| SheetModifier::BuySlot {
                    tracker: self.name.clone(),
                    level,
                    points: self.points.clone(),
                });
                return (next, modifier);
            }
        }
        (next, None)
    }

    fn has_level(&self, level: usize) -> bool {
        let exists = level < self.levels.len();
        if !exists {
            log::debug!("{}: no slot level {}", self.name, level);
        }
        exists
    }

    /// Copy with one slot spent at `level`, if one is available
    pub(crate) fn spend(&self, level: usize) -> Option<SlotTracker> {
        let slot = self.levels.get(level)?;
        if slot.current == 0 {
            return None;
        }
        let mut next = self.clone();
        next.levels[level].current -= 1;
        Some(next)
    }

    /// Copy with one slot regained at `level`, if the level is not full
    pub(crate) fn restore(&self, level: usize) -> Option<SlotTracker> {
        let slot = self.levels.get(level)?;
        if slot.is_full() {
            return None;
        }
        let mut next = self.clone();
        next.levels[level].current += 1;
        Some(next)
    }

    /// Copy with every level refilled
    pub(crate) fn reset(&self) -> SlotTracker {
        let mut next = self.clone();
        for slot in &mut next.levels {
            slot.current = slot.max;
        }
        next
    }

    /// Points available to the linked tracker, read through the environment
    pub fn available_points(&self, env: &Environment) -> Value {
        match &self.points {
            Some(points) => env.evaluate_name(points),
            None => Value::Undefined,
        }
    }

    /// Whether a slot at `level` can currently be bought back
    pub fn can_buy(&self, level: usize, env: &Environment, settings: &SheetSettings) -> bool {
        let Some(slot) = self.level(level) else {
            return false;
        };
        let Some(cost) = settings.slot_purchase_cost(level) else {
            return false;
        };
        let affordable = self
            .available_points(env)
            .as_number()
            .is_some_and(|available| available >= i64::from(cost));
        affordable && !slot.is_full()
    }

    /// Whether a slot at `level` can currently be converted to points
    pub fn can_burn(&self, level: usize) -> bool {
        self.level(level).is_some_and(|slot| slot.current > 0)
    }

    pub(crate) fn contributed_bindings(&self) -> Vec<(String, Expression)> {
        let mut bindings = Vec::with_capacity(self.levels.len() * 2);
        for (level, slot) in self.levels.iter().enumerate() {
            let name = self.level_name(level);
            bindings.push((
                format!("{} max", name),
                Expression::Integer(i64::from(slot.max)),
            ));
            bindings.push((name, Expression::Integer(i64::from(slot.current))));
        }
        bindings
    }
}
