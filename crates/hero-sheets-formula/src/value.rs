//! Evaluation result values

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value produced by evaluating an [`Expression`](crate::Expression)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Integer(i64),
    /// Integer tagged as a relative adjustment; always rendered with a sign
    Modifier(i64),
    /// Unrolled dice terms plus a flat addend
    DiceSum(DiceSum),
    Bool(bool),
    String(String),
    /// Evaluation failed (unbound name, cycle, type mismatch, ...)
    Undefined,
}

/// Kind tag carried by numeric values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    Integer,
    Modifier,
}

impl NumberKind {
    /// Wrap a number in a value of this kind
    pub fn value(self, n: i64) -> Value {
        match self {
            NumberKind::Integer => Value::Integer(n),
            NumberKind::Modifier => Value::Modifier(n),
        }
    }
}

/// One `NdS` dice term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceTerm {
    pub count: u32,
    pub sides: u32,
}

/// Symbolic dice accumulation
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceSum {
    /// Terms in encounter order; equal terms are not merged
    pub terms: Vec<DiceTerm>,
    pub flat: i64,
}

impl DiceSum {
    /// A single dice term with no flat addend
    pub fn single(count: u32, sides: u32) -> Self {
        Self {
            terms: vec![DiceTerm { count, sides }],
            flat: 0,
        }
    }

    pub fn new(terms: impl IntoIterator<Item = (u32, u32)>, flat: i64) -> Self {
        Self {
            terms: terms
                .into_iter()
                .map(|(count, sides)| DiceTerm { count, sides })
                .collect(),
            flat,
        }
    }
}

impl Value {
    /// Numeric payload and kind, for `Integer` and `Modifier` only
    pub fn as_numeric(&self) -> Option<(i64, NumberKind)> {
        match self {
            Value::Integer(n) => Some((*n, NumberKind::Integer)),
            Value::Modifier(n) => Some((*n, NumberKind::Modifier)),
            _ => None,
        }
    }

    /// Numeric payload, ignoring kind
    pub fn as_number(&self) -> Option<i64> {
        self.as_numeric().map(|(n, _)| n)
    }

    /// Condition coercion used by `If`
    ///
    /// Booleans pass through. Numbers are true when they equal zero.
    /// Everything else has no truth value.
    pub fn truthiness(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Integer(n) | Value::Modifier(n) => Some(*n == 0),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Get the type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Modifier(_) => "modifier",
            Value::DiceSum(_) => "dice",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::Undefined => "undefined",
        }
    }
}

impl fmt::Display for DiceTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

impl fmt::Display for DiceSum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "{}", self.flat);
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}", term)?;
        }
        match self.flat {
            0 => Ok(()),
            n if n < 0 => write!(f, " - {}", n.unsigned_abs()),
            n => write!(f, " + {}", n),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Modifier(n) => write!(f, "{:+}", n),
            Value::DiceSum(sum) => write!(f, "{}", sum),
            Value::Bool(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{}", s),
            Value::Undefined => write!(f, "undefined"),
        }
    }
}
