//! # hero-sheets-core
//!
//! Core data structures for the hero-sheets character sheet library.
//!
//! This crate provides the fundamental types used throughout hero-sheets:
//! - [`Field`] and [`FieldMessage`] - The editable units of a sheet and their edits
//! - [`SheetModifier`] - Whole-sheet effects emitted by field actions
//! - [`Sheet`], [`SheetSettings`] - The main document structure
//!
//! ## Example
//!
//! ```rust
//! use hero_sheets_core::{FieldMessage, PointsTracker, Sheet, SlotTracker, SlotsMessage};
//! use hero_sheets_formula::Value;
//!
//! let sheet = Sheet::new("Sorcerer")
//!     .with_field(PointsTracker::new("Sorcery Points", 2, 5))
//!     .with_field(
//!         SlotTracker::new("Spell Slots")
//!             .with_level(4, 4)
//!             .with_level(2, 3)
//!             .linked_to("Sorcery Points"),
//!     );
//!
//! // Convert a 2nd-level slot into two sorcery points
//! let sheet = sheet
//!     .dispatch(1, FieldMessage::Slots(SlotsMessage::BurnAtLevel { level: 1 }))
//!     .unwrap();
//!
//! let env = sheet.environment();
//! assert_eq!(env.evaluate_name("Sorcery Points"), Value::Integer(4));
//! assert_eq!(env.evaluate_name("Spell Slots 2"), Value::Integer(1));
//! ```

pub mod error;
pub mod field;
pub mod modifier;
pub mod sheet;

// Re-exports for convenience
pub use error::{Error, Result};
pub use field::{
    AbilityScore, ActionBlock, ActionEntry, ActionMessage, Field, FieldMessage, PointsMessage,
    PointsTracker, RestControl, RestKind, RestMessage, ScoreMessage, SlotLevel, SlotTracker,
    SlotsMessage, StatDisplay, StatMessage,
};
pub use modifier::SheetModifier;
pub use sheet::{Sheet, SheetSettings};
