//! Whole-sheet effects emitted by field updates
//!
//! A [`SheetModifier`] is applied once by the sheet, after the emitting field's
//! new state has been committed. Coupled effects (a slot and the points it
//! converts to) are computed on a fresh copy of the sheet and only returned when
//! the required half of the change actually happened; otherwise the input sheet
//! comes back unchanged. Each spent or regained slot moves points in exactly one
//! points tracker.

use crate::field::{Field, RestKind};
use crate::sheet::Sheet;
use serde::{Deserialize, Serialize};

/// A pure `Sheet -> Sheet` transform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SheetModifier {
    /// Let every field react to a rest
    Rest { kind: RestKind },
    /// Spend one slot at `level` of `tracker` and credit `level + 1` points
    BurnSlot {
        tracker: String,
        level: usize,
        points: Option<String>,
    },
    /// Pay the configured cost in points to regain one slot at `level`
    BuySlot {
        tracker: String,
        level: usize,
        points: Option<String>,
    },
}

impl SheetModifier {
    /// Apply the modifier, producing a new sheet
    ///
    /// Slot trackers are resolved by name; the first matching tracker is used.
    pub fn apply(&self, sheet: &Sheet) -> Sheet {
        self.apply_from(sheet, None)
    }

    /// Apply a modifier emitted by the field at `source`
    ///
    /// Slot effects target the emitting tracker itself when it matches, so
    /// trackers sharing a name never move together.
    pub(crate) fn apply_from(&self, sheet: &Sheet, source: Option<usize>) -> Sheet {
        match self {
            SheetModifier::Rest { kind } => take_rest(sheet, *kind),
            SheetModifier::BurnSlot {
                tracker,
                level,
                points,
            } => match slots_index(sheet, tracker, source) {
                Some(index) => burn_slot(sheet, index, *level, points.as_deref()),
                None => {
                    log::debug!("no slot tracker named {:?}; sheet unchanged", tracker);
                    sheet.clone()
                }
            },
            SheetModifier::BuySlot {
                tracker,
                level,
                points,
            } => match slots_index(sheet, tracker, source) {
                Some(index) => buy_slot(sheet, index, *level, points.as_deref()),
                None => {
                    log::debug!("no slot tracker named {:?}; sheet unchanged", tracker);
                    sheet.clone()
                }
            },
        }
    }
}

fn slots_index(sheet: &Sheet, tracker: &str, source: Option<usize>) -> Option<usize> {
    let is_tracker = |index: usize| {
        matches!(sheet.field(index), Some(Field::Slots(slots)) if slots.name == tracker)
    };
    match source {
        Some(index) if is_tracker(index) => Some(index),
        _ => (0..sheet.field_count()).find(|&index| is_tracker(index)),
    }
}

/// First points tracker with the given name, matching the visible binding
fn points_index(sheet: &Sheet, points: Option<&str>) -> Option<usize> {
    let points = points?;
    sheet
        .fields()
        .iter()
        .position(|field| matches!(field, Field::Points(pool) if pool.name == points))
}

fn take_rest(sheet: &Sheet, kind: RestKind) -> Sheet {
    match kind {
        RestKind::Long => {
            log::debug!("long rest on sheet {:?}", sheet.name());
            sheet.with_replaced_fields(sheet.fields().iter().map(|f| f.after_rest(kind)).collect())
        }
        // Short rests have no sheet-wide effect yet
        RestKind::Short => sheet.clone(),
    }
}

fn burn_slot(sheet: &Sheet, index: usize, level: usize, points: Option<&str>) -> Sheet {
    let Some(Field::Slots(slots)) = sheet.field(index) else {
        return sheet.clone();
    };
    let Some(spent) = slots.spend(level) else {
        log::debug!(
            "{}: no level {} slot to burn; sheet unchanged",
            slots.name,
            level.saturating_add(1)
        );
        return sheet.clone();
    };

    // `level` indexes an existing slot level, so this cannot overflow
    let gain = u32::try_from(level + 1).unwrap_or(u32::MAX);
    let mut fields = sheet.fields().to_vec();
    fields[index] = Field::Slots(spent);
    if let Some(pool_index) = points_index(sheet, points) {
        if let Some(Field::Points(pool)) = sheet.field(pool_index) {
            fields[pool_index] = Field::Points(pool.gain(gain));
        }
    }

    log::debug!("{}: burned level {} slot for {} points", slots.name, level + 1, gain);
    sheet.with_replaced_fields(fields)
}

fn buy_slot(sheet: &Sheet, index: usize, level: usize, points: Option<&str>) -> Sheet {
    let Some(Field::Slots(slots)) = sheet.field(index) else {
        return sheet.clone();
    };
    let Some(cost) = sheet.settings().slot_purchase_cost(level) else {
        log::debug!(
            "{}: level {} slots cannot be bought",
            slots.name,
            level.saturating_add(1)
        );
        return sheet.clone();
    };

    let restored = slots.restore(level);
    let paid = points_index(sheet, points).and_then(|pool_index| match sheet.field(pool_index) {
        Some(Field::Points(pool)) => pool.pay(cost).map(|rest| (pool_index, rest)),
        _ => None,
    });

    match (restored, paid) {
        (Some(regained), Some((pool_index, rest))) => {
            let mut fields = sheet.fields().to_vec();
            fields[index] = Field::Slots(regained);
            fields[pool_index] = Field::Points(rest);
            log::debug!("{}: bought level {} slot for {} points", slots.name, level + 1, cost);
            sheet.with_replaced_fields(fields)
        }
        (restored, paid) => {
            log::debug!(
                "{}: level {} slot purchase rejected (paid: {}, restored: {})",
                slots.name,
                level.saturating_add(1),
                paid.is_some(),
                restored.is_some()
            );
            sheet.clone()
        }
    }
}
