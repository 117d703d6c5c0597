//! Prelude module - common imports for hero-sheets users
//!
//! ```rust
//! use hero_sheets::prelude::*;
//! ```

pub use crate::{
    // Field types
    AbilityScore,
    ActionBlock,
    // Calculation types
    CalculationOptions,
    CalculationReport,
    CalculationStats,
    // Formula types
    DiceSum,
    Environment,
    // Error types
    Error,
    Expression,
    Field,
    FieldMessage,
    PointsMessage,
    PointsTracker,
    RestControl,
    RestKind,
    RestMessage,
    Result,
    // Main types
    Sheet,
    // Extension traits
    SheetCalculationExt,
    SheetModifier,
    SheetSettings,
    SlotTracker,
    SlotsMessage,
    StatDisplay,
    Value,
};
