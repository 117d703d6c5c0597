//! Sheet calculation
//!
//! Evaluates every binding a sheet contributes, for display, and reports
//! bindings caught in reference cycles.
//!
//! # Example
//!
//! ```rust
//! use hero_sheets::prelude::*;
//!
//! let sheet = Sheet::new("Fighter")
//!     .with_field(AbilityScore::new("STR", 16).with_modifier("STR mod"))
//!     .with_field(StatDisplay::new(
//!         "Attack",
//!         Expression::add([Expression::var("STR mod"), Expression::Modifier(2)]),
//!     ));
//!
//! let report = sheet.calculate();
//! assert_eq!(report.value("Attack"), Some(&Value::Modifier(5)));
//! assert_eq!(report.stats.binding_count, 3);
//! ```

use crate::{DependencyGraph, Environment, Sheet, Value};
use std::collections::BTreeSet;

/// Options for sheet calculation
#[derive(Debug, Clone)]
pub struct CalculationOptions {
    /// Walk the dependency graph to find bindings undefined because of a cycle
    pub detect_cycles: bool,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        Self {
            detect_cycles: true,
        }
    }
}

/// Statistics from a calculation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculationStats {
    /// Number of visible bindings (shadowed duplicates excluded)
    pub binding_count: usize,
    /// Number of bindings that evaluated to `Undefined`
    pub undefined: usize,
    /// Number of bindings left `Undefined` by a reference cycle
    pub circular_references: usize,
}

/// Result of calculating a sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculationReport {
    /// Every binding's value, in environment order
    pub values: Vec<(String, Value)>,
    /// Names of bindings left `Undefined` by a reference cycle, sorted
    pub circular: Vec<String>,
    pub stats: CalculationStats,
}

impl CalculationReport {
    /// Look up the calculated value of a binding
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(binding, _)| binding == name)
            .map(|(_, value)| value)
    }

    /// Whether the binding is left `Undefined` by a reference cycle
    pub fn is_circular(&self, name: &str) -> bool {
        self.circular.iter().any(|c| c == name)
    }
}

/// Extension trait for Sheet to add calculation methods
pub trait SheetCalculationExt {
    /// Calculate all bindings with default options
    fn calculate(&self) -> CalculationReport;

    /// Calculate all bindings with custom options
    fn calculate_with_options(&self, options: &CalculationOptions) -> CalculationReport;

    /// Recalculate only the bindings that may change when `changed` change,
    /// precedents before dependents
    fn recalculate(&self, changed: &[&str]) -> Vec<(String, Value)>;
}

impl SheetCalculationExt for Sheet {
    fn calculate(&self) -> CalculationReport {
        self.calculate_with_options(&CalculationOptions::default())
    }

    fn calculate_with_options(&self, options: &CalculationOptions) -> CalculationReport {
        CalculationEngine::new(self.environment(), options.clone()).calculate_all()
    }

    fn recalculate(&self, changed: &[&str]) -> Vec<(String, Value)> {
        CalculationEngine::new(self.environment(), CalculationOptions::default())
            .calculate_order(changed)
    }
}

/// The calculation engine
struct CalculationEngine {
    options: CalculationOptions,
    environment: Environment,
    /// Dependency graph built from binding expressions
    dependency_graph: DependencyGraph,
}

impl CalculationEngine {
    fn new(environment: Environment, options: CalculationOptions) -> Self {
        let dependency_graph = DependencyGraph::from_environment(&environment);
        Self {
            options,
            environment,
            dependency_graph,
        }
    }

    fn calculate_all(&self) -> CalculationReport {
        let mut report = CalculationReport::default();
        report.stats.binding_count = self.environment.len();

        for name in self.environment.names() {
            let value = self.environment.evaluate_name(name);
            if value.is_undefined() {
                report.stats.undefined += 1;
            }
            report.values.push((name.to_string(), value));
        }

        if self.options.detect_cycles {
            // A reference loop only counts when evaluation actually follows it
            let circular: Vec<String> = self
                .dependency_graph
                .circular_names()
                .into_iter()
                .filter(|name| report.value(name).is_some_and(Value::is_undefined))
                .map(str::to_string)
                .collect();
            report.stats.circular_references = circular.len();
            report.circular = circular;
            if !report.circular.is_empty() {
                log::debug!("reference cycles through {:?}", report.circular);
            }
        }

        log::debug!(
            "calculated {} bindings ({} undefined)",
            report.stats.binding_count,
            report.stats.undefined
        );
        report
    }

    fn calculate_order(&self, changed: &[&str]) -> Vec<(String, Value)> {
        let mut order = self.dependency_graph.get_recalc_order(changed);
        // Dependents come first; reverse so precedents are evaluated first
        order.reverse();

        let mut seen = BTreeSet::new();
        order
            .into_iter()
            .filter(|name| self.environment.contains(name) && seen.insert(name.clone()))
            .map(|name| {
                let value = self.environment.evaluate_name(&name);
                (name, value)
            })
            .collect()
    }
}
