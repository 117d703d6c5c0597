//! Sheet type - the main document structure

use crate::error::{Error, Result};
use crate::field::{Field, FieldMessage};
use hero_sheets_formula::{Environment, Expression, Value};
use serde::{Deserialize, Serialize};

/// A character sheet
///
/// A sheet is an ordered list of fields plus settings. It is never edited in
/// place: every edit and every dispatched message returns a new sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name
    name: String,
    /// Fields in display and binding order
    fields: Vec<Field>,
    /// Sheet settings
    #[serde(default)]
    settings: SheetSettings,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            settings: SheetSettings::default(),
        }
    }

    /// Append a field while building a sheet
    pub fn with_field(mut self, field: impl Into<Field>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Replace the settings while building a sheet
    pub fn with_settings(mut self, settings: SheetSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Same sheet with a different field list
    pub(crate) fn with_replaced_fields(&self, fields: Vec<Field>) -> Sheet {
        Sheet {
            name: self.name.clone(),
            fields,
            settings: self.settings.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Get a field by position
    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Get the position of the first field with the given name
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }

    pub fn settings(&self) -> &SheetSettings {
        &self.settings
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.fields.len() {
            return Err(Error::FieldOutOfBounds(index, self.fields.len()));
        }
        Ok(())
    }

    /// Deliver a message to the field at `index`
    ///
    /// The field's new state is committed first; any modifier it emits is then
    /// applied exactly once to the whole updated sheet.
    pub fn dispatch(&self, index: usize, message: FieldMessage) -> Result<Sheet> {
        self.check_index(index)?;
        let field = &self.fields[index];
        log::debug!(
            "dispatching {} message to {} field {:?} at {}",
            message.kind_name(),
            field.kind_name(),
            field.name(),
            index
        );

        let (updated, modifier) = field.update(message)?;
        let committed = self.replace_field(index, updated)?;

        Ok(match modifier {
            Some(modifier) => {
                log::debug!("applying {:?}", modifier);
                modifier.apply_from(&committed, Some(index))
            }
            None => committed,
        })
    }

    /// Replace the field at `index`
    pub fn replace_field(&self, index: usize, field: Field) -> Result<Sheet> {
        self.check_index(index)?;
        let mut fields = self.fields.clone();
        fields[index] = field;
        Ok(self.with_replaced_fields(fields))
    }

    /// Add a field at the end
    pub fn push_field(&self, field: impl Into<Field>) -> Sheet {
        let mut fields = self.fields.clone();
        fields.push(field.into());
        self.with_replaced_fields(fields)
    }

    /// Insert a field at `index`, shifting later fields down
    pub fn insert_field(&self, index: usize, field: impl Into<Field>) -> Result<Sheet> {
        if index > self.fields.len() {
            return Err(Error::FieldOutOfBounds(index, self.fields.len()));
        }
        let mut fields = self.fields.clone();
        fields.insert(index, field.into());
        Ok(self.with_replaced_fields(fields))
    }

    /// Remove the field at `index`
    pub fn remove_field(&self, index: usize) -> Result<Sheet> {
        self.check_index(index)?;
        let mut fields = self.fields.clone();
        fields.remove(index);
        Ok(self.with_replaced_fields(fields))
    }

    /// Move the field at `from` so that it ends up at position `to`
    pub fn move_field(&self, from: usize, to: usize) -> Result<Sheet> {
        self.check_index(from)?;
        self.check_index(to)?;
        let mut fields = self.fields.clone();
        let field = fields.remove(from);
        fields.insert(to, field);
        Ok(self.with_replaced_fields(fields))
    }

    /// Build the environment from every field's bindings, earlier fields winning
    pub fn environment(&self) -> Environment {
        Environment::from_sources(&self.fields)
    }

    /// Evaluate an expression against this sheet's current environment
    pub fn evaluate(&self, expr: &Expression) -> Value {
        self.environment().evaluate(expr)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Sheet> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Sheet settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSettings {
    /// Points needed to buy back one slot, by 0-based slot level.
    /// Levels past the end of the list cannot be bought.
    pub slot_purchase_costs: Vec<u32>,
}

impl SheetSettings {
    /// Purchase cost of a slot at a 0-based level
    pub fn slot_purchase_cost(&self, level: usize) -> Option<u32> {
        self.slot_purchase_costs.get(level).copied()
    }
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            slot_purchase_costs: vec![2, 3, 5, 6, 7],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{
        PointsMessage, PointsTracker, RestControl, RestKind, RestMessage, SlotTracker,
        SlotsMessage, StatDisplay,
    };
    use pretty_assertions::assert_eq;

    fn sorcerer(points: u32, third_level_slots: u32) -> Sheet {
        Sheet::new("Sorcerer")
            .with_field(RestControl::new("Rest"))
            .with_field(PointsTracker::new("Sorcery Points", points, 10).with_long_rest_reset())
            .with_field(
                SlotTracker::new("Spell Slots")
                    .with_level(4, 4)
                    .with_level(3, 3)
                    .with_level(third_level_slots, 2)
                    .linked_to("Sorcery Points")
                    .with_long_rest_reset(),
            )
    }

    fn slots_message(message: SlotsMessage) -> FieldMessage {
        FieldMessage::Slots(message)
    }

    #[test]
    fn test_new_sheet() {
        let sheet = Sheet::new("Empty");
        assert_eq!(sheet.name(), "Empty");
        assert_eq!(sheet.field_count(), 0);
        assert!(sheet.environment().is_empty());
        assert_eq!(sheet.settings(), &SheetSettings::default());
    }

    #[test]
    fn test_dispatch_local_update() {
        let sheet = sorcerer(4, 1);
        let next = sheet
            .dispatch(1, FieldMessage::Points(PointsMessage::SetCurrent { value: 6 }))
            .unwrap();

        assert_eq!(next.environment().evaluate_name("Sorcery Points"), Value::Integer(6));
        // The original snapshot is untouched
        assert_eq!(sheet.environment().evaluate_name("Sorcery Points"), Value::Integer(4));
    }

    #[test]
    fn test_dispatch_burn_with_empty_slot_is_noop() {
        let sheet = sorcerer(4, 0);
        let next = sheet
            .dispatch(2, slots_message(SlotsMessage::BurnAtLevel { level: 2 }))
            .unwrap();
        assert_eq!(next, sheet);
    }

    #[test]
    fn test_dispatch_burn_commits_slot_and_points() {
        let sheet = sorcerer(4, 1);
        let next = sheet
            .dispatch(2, slots_message(SlotsMessage::BurnAtLevel { level: 2 }))
            .unwrap();

        let env = next.environment();
        assert_eq!(env.evaluate_name("Spell Slots 3"), Value::Integer(0));
        assert_eq!(env.evaluate_name("Sorcery Points"), Value::Integer(7));
    }

    #[test]
    fn test_dispatch_long_rest() {
        let sheet = sorcerer(0, 0)
            .push_field(PointsTracker::new("Inspiration", 0, 1))
            .dispatch(2, slots_message(SlotsMessage::SetCurrent { level: 0, value: 1 }))
            .unwrap();

        let rested = sheet
            .dispatch(
                0,
                FieldMessage::Rest(RestMessage::TakeRest {
                    kind: RestKind::Long,
                }),
            )
            .unwrap();
        let env = rested.environment();
        assert_eq!(env.evaluate_name("Sorcery Points"), Value::Integer(10));
        assert_eq!(env.evaluate_name("Spell Slots 1"), Value::Integer(4));
        assert_eq!(env.evaluate_name("Spell Slots 3"), Value::Integer(2));
        assert_eq!(env.evaluate_name("Inspiration"), Value::Integer(0));

        let short = sheet
            .dispatch(
                0,
                FieldMessage::Rest(RestMessage::TakeRest {
                    kind: RestKind::Short,
                }),
            )
            .unwrap();
        assert_eq!(short, sheet);
    }

    #[test]
    fn test_dispatch_out_of_bounds() {
        let err = sorcerer(1, 1)
            .dispatch(9, slots_message(SlotsMessage::AddLevel))
            .unwrap_err();
        assert!(matches!(err, Error::FieldOutOfBounds(9, 3)));
    }

    #[test]
    fn test_dispatch_mismatch() {
        let err = sorcerer(1, 1)
            .dispatch(0, slots_message(SlotsMessage::AddLevel))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MessageMismatch {
                field: "rest",
                message: "slots"
            }
        ));
    }

    #[test]
    fn test_first_field_wins_binding() {
        let sheet = Sheet::new("Dup")
            .with_field(StatDisplay::new("X", Expression::Integer(1)))
            .with_field(StatDisplay::new("X", Expression::Integer(2)));
        assert_eq!(sheet.environment().get("X"), Some(&Expression::Integer(1)));

        let swapped = sheet.move_field(1, 0).unwrap();
        assert_eq!(swapped.environment().get("X"), Some(&Expression::Integer(2)));
    }

    #[test]
    fn test_insert_and_remove_fields() {
        let sheet = Sheet::new("Edits").with_field(StatDisplay::new("A", Expression::Integer(1)));
        let sheet = sheet
            .insert_field(0, StatDisplay::new("B", Expression::Integer(2)))
            .unwrap();
        assert_eq!(sheet.field_index("B"), Some(0));
        assert_eq!(sheet.field_index("A"), Some(1));

        let sheet = sheet.remove_field(0).unwrap();
        assert_eq!(sheet.field_count(), 1);
        assert!(sheet.remove_field(1).is_err());
        assert!(sheet
            .insert_field(3, StatDisplay::new("C", Expression::Integer(3)))
            .is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let sheet = sorcerer(3, 1).with_settings(SheetSettings {
            slot_purchase_costs: vec![1, 2],
        });
        let json = sheet.to_json().unwrap();
        assert_eq!(Sheet::from_json(&json).unwrap(), sheet);
    }

    #[test]
    fn test_unknown_field_kind_is_decode_error() {
        let json = r#"{"name":"Bad","fields":[{"kind":"Spaceship"}]}"#;
        assert!(matches!(
            Sheet::from_json(json),
            Err(Error::Serialization(_))
        ));
    }
}
