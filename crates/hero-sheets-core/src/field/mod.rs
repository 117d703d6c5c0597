//! Sheet fields and their local update messages
//!
//! This module contains:
//! - [`Field`] - The closed set of field kinds a sheet is made of
//! - [`FieldMessage`] - An edit or action addressed to one field
//! - One state type and message type per field kind
//!
//! A field only ever changes its own state. Effects on other fields are
//! returned as a [`SheetModifier`] for the sheet to apply.

mod action;
mod points;
mod slots;
mod stat;

pub use action::{ActionBlock, ActionEntry, ActionMessage, RestControl, RestKind, RestMessage};
pub use points::{PointsMessage, PointsTracker};
pub use slots::{SlotLevel, SlotTracker, SlotsMessage};
pub use stat::{AbilityScore, ScoreMessage, StatDisplay, StatMessage};

use crate::error::{Error, Result};
use crate::modifier::SheetModifier;
use hero_sheets_formula::{BindingSource, Expression};
use serde::{Deserialize, Serialize};

/// One independently editable unit of sheet state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Field {
    Rest(RestControl),
    Slots(SlotTracker),
    Points(PointsTracker),
    Stat(StatDisplay),
    Action(ActionBlock),
    Score(AbilityScore),
}

/// Message addressed to a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message")]
pub enum FieldMessage {
    Rest(RestMessage),
    Slots(SlotsMessage),
    Points(PointsMessage),
    Stat(StatMessage),
    Action(ActionMessage),
    Score(ScoreMessage),
}

impl Field {
    /// Apply a local message
    ///
    /// Returns the field's new state and, for actions that reach beyond this
    /// field, the modifier the sheet should apply afterwards.
    pub fn update(&self, message: FieldMessage) -> Result<(Field, Option<SheetModifier>)> {
        let updated = match (self, message) {
            (Field::Rest(rest), FieldMessage::Rest(RestMessage::TakeRest { kind })) => {
                return Ok((
                    Field::Rest(rest.clone()),
                    Some(SheetModifier::Rest { kind }),
                ))
            }
            (Field::Slots(slots), FieldMessage::Slots(message)) => {
                let (slots, modifier) = slots.update(message);
                return Ok((Field::Slots(slots), modifier));
            }
            (Field::Points(points), FieldMessage::Points(message)) => {
                Field::Points(points.update(message))
            }
            (Field::Stat(stat), FieldMessage::Stat(message)) => Field::Stat(stat.update(message)),
            (Field::Action(action), FieldMessage::Action(message)) => {
                Field::Action(action.update(message))
            }
            (Field::Score(score), FieldMessage::Score(message)) => {
                Field::Score(score.update(message))
            }
            (field, message) => {
                return Err(Error::MessageMismatch {
                    field: field.kind_name(),
                    message: message.kind_name(),
                })
            }
        };
        Ok((updated, None))
    }

    /// State after a rest; only fields flagged to reset on a long rest change
    pub fn after_rest(&self, kind: RestKind) -> Field {
        match (kind, self) {
            (RestKind::Long, Field::Slots(slots)) if slots.resets_on_long_rest => {
                Field::Slots(slots.reset())
            }
            (RestKind::Long, Field::Points(points)) if points.resets_on_long_rest => {
                Field::Points(points.reset())
            }
            _ => self.clone(),
        }
    }

    /// Display name of the field
    pub fn name(&self) -> &str {
        match self {
            Field::Rest(rest) => &rest.label,
            Field::Slots(slots) => &slots.name,
            Field::Points(points) => &points.name,
            Field::Stat(stat) => &stat.name,
            Field::Action(action) => &action.title,
            Field::Score(score) => &score.name,
        }
    }

    /// Get the kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Field::Rest(_) => "rest",
            Field::Slots(_) => "slots",
            Field::Points(_) => "points",
            Field::Stat(_) => "stat",
            Field::Action(_) => "action",
            Field::Score(_) => "score",
        }
    }
}

impl FieldMessage {
    /// Get the kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldMessage::Rest(_) => "rest",
            FieldMessage::Slots(_) => "slots",
            FieldMessage::Points(_) => "points",
            FieldMessage::Stat(_) => "stat",
            FieldMessage::Action(_) => "action",
            FieldMessage::Score(_) => "score",
        }
    }
}

impl BindingSource for Field {
    fn contributed_bindings(&self) -> Vec<(String, Expression)> {
        match self {
            Field::Rest(_) | Field::Action(_) => Vec::new(),
            Field::Slots(slots) => slots.contributed_bindings(),
            Field::Points(points) => points.contributed_bindings(),
            Field::Stat(stat) => stat.contributed_bindings(),
            Field::Score(score) => score.contributed_bindings(),
        }
    }
}

impl From<RestControl> for Field {
    fn from(rest: RestControl) -> Self {
        Field::Rest(rest)
    }
}

impl From<SlotTracker> for Field {
    fn from(slots: SlotTracker) -> Self {
        Field::Slots(slots)
    }
}

impl From<PointsTracker> for Field {
    fn from(points: PointsTracker) -> Self {
        Field::Points(points)
    }
}

impl From<StatDisplay> for Field {
    fn from(stat: StatDisplay) -> Self {
        Field::Stat(stat)
    }
}

impl From<ActionBlock> for Field {
    fn from(action: ActionBlock) -> Self {
        Field::Action(action)
    }
}

impl From<AbilityScore> for Field {
    fn from(score: AbilityScore) -> Self {
        Field::Score(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mismatched_message() {
        let field = Field::from(PointsTracker::new("Ki", 1, 2));
        let err = field
            .update(FieldMessage::Action(ActionMessage::ToggleExpanded))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot deliver action message to points field"
        );
    }

    #[test]
    fn test_rest_emits_modifier() {
        let field = Field::from(RestControl::new("Rest"));
        let (next, modifier) = field
            .update(FieldMessage::Rest(RestMessage::TakeRest {
                kind: RestKind::Short,
            }))
            .unwrap();
        assert_eq!(next, field);
        assert_eq!(
            modifier,
            Some(SheetModifier::Rest {
                kind: RestKind::Short
            })
        );
    }

    #[test]
    fn test_after_long_rest_respects_flag() {
        let flagged = Field::from(PointsTracker::new("Ki", 0, 4).with_long_rest_reset());
        let unflagged = Field::from(PointsTracker::new("Luck", 0, 3));

        assert_eq!(
            flagged.after_rest(RestKind::Long),
            Field::from(PointsTracker::new("Ki", 4, 4).with_long_rest_reset())
        );
        assert_eq!(unflagged.after_rest(RestKind::Long), unflagged);
        assert_eq!(flagged.after_rest(RestKind::Short), flagged);
    }

    #[test]
    fn test_rest_and_action_contribute_nothing() {
        assert!(Field::from(RestControl::new("Rest"))
            .contributed_bindings()
            .is_empty());
        assert!(Field::from(ActionBlock::new("Dash", ""))
            .contributed_bindings()
            .is_empty());
    }
}
