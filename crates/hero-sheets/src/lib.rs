//! # hero-sheets
//!
//! A Rust library for tabletop RPG character sheets.
//!
//! A sheet is an ordered list of fields. Fields contribute named formulas to a
//! shared environment, and every displayed number is computed from that
//! environment on demand.
//!
//! ## Features
//!
//! - Total formula evaluation: errors and reference cycles become `Undefined`
//! - Dice pools and signed modifiers as first-class values
//! - Spell slot and points trackers linked by transactional sheet modifiers
//! - Short and long rests
//! - Lossless JSON persistence via serde
//!
//! ## Example
//!
//! ```rust
//! use hero_sheets::prelude::*;
//!
//! let sheet = Sheet::new("Sorcerer")
//!     .with_field(RestControl::new("Rest"))
//!     .with_field(PointsTracker::new("Sorcery Points", 0, 5).with_long_rest_reset())
//!     .with_field(StatDisplay::new(
//!         "Fire Bolt",
//!         Expression::add([Expression::dice(2, 10), Expression::Modifier(1)]),
//!     ));
//!
//! let sheet = sheet
//!     .dispatch(0, FieldMessage::Rest(RestMessage::TakeRest { kind: RestKind::Long }))
//!     .unwrap();
//!
//! let report = sheet.calculate();
//! assert_eq!(report.value("Sorcery Points"), Some(&Value::Integer(5)));
//! assert_eq!(report.value("Fire Bolt").unwrap().to_string(), "2d10 + 1");
//! ```

pub mod calculation;
pub mod prelude;

// Re-export calculation types
pub use calculation::{
    CalculationOptions, CalculationReport, CalculationStats, SheetCalculationExt,
};

// Re-export core types
pub use hero_sheets_core::{
    // Field types
    AbilityScore,
    ActionBlock,
    ActionEntry,
    ActionMessage,
    // Error types
    Error,
    Field,
    FieldMessage,
    PointsMessage,
    PointsTracker,
    RestControl,
    RestKind,
    RestMessage,
    Result,
    ScoreMessage,
    // Main types
    Sheet,
    SheetModifier,
    SheetSettings,
    SlotLevel,
    SlotTracker,
    SlotsMessage,
    StatDisplay,
    StatMessage,
};

// Re-export formula types
pub use hero_sheets_formula::{
    evaluate, Binding, BindingSource, CompareOperator, DependencyGraph, DiceSum, DiceTerm,
    Environment, Expression, NumberKind, RoundingMode, Value,
};
