//! Dependency tracking between environment bindings
//!
//! The evaluator rejects cycles lazily by returning `Undefined`. This graph
//! lets callers find out *why* a binding is undefined and which bindings need
//! to be redisplayed when a name changes.

use crate::environment::Environment;
use std::collections::{BTreeMap, BTreeSet};

/// Dependency graph for environment bindings
///
/// Tracks which bindings reference which other names.
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    /// Name → bindings that reference it (dependents)
    dependents: BTreeMap<String, BTreeSet<String>>,
    /// Binding → names it references (precedents)
    precedents: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for every binding in an environment
    pub fn from_environment(env: &Environment) -> Self {
        let mut graph = Self::new();
        for binding in env.iter() {
            for name in binding.expression.variables() {
                graph.add_dependency(name, &binding.name);
            }
        }
        graph
    }

    /// Add a dependency: `dependent` references `precedent`
    pub fn add_dependency(&mut self, precedent: &str, dependent: &str) {
        self.dependents
            .entry(precedent.to_string())
            .or_default()
            .insert(dependent.to_string());
        self.precedents
            .entry(dependent.to_string())
            .or_default()
            .insert(precedent.to_string());
    }

    /// Get bindings that reference the given name
    pub fn get_dependents<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.dependents
            .get(name)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Get names the given binding references
    pub fn get_precedents<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.precedents
            .get(name)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Every binding whose value may change when the given names change,
    /// dependents first in reverse topological order
    pub fn get_recalc_order(&self, changed: &[&str]) -> Vec<String> {
        let mut result = Vec::new();
        let mut visited = BTreeSet::new();
        let mut in_stack = BTreeSet::new();

        for &name in changed {
            self.topological_sort(name, &mut result, &mut visited, &mut in_stack);
        }

        result
    }

    fn topological_sort(
        &self,
        name: &str,
        result: &mut Vec<String>,
        visited: &mut BTreeSet<String>,
        in_stack: &mut BTreeSet<String>,
    ) {
        if visited.contains(name) || in_stack.contains(name) {
            return;
        }

        in_stack.insert(name.to_string());

        if let Some(dependents) = self.dependents.get(name) {
            for dependent in dependents {
                self.topological_sort(dependent, result, visited, in_stack);
            }
        }

        in_stack.remove(name);
        visited.insert(name.to_string());
        result.push(name.to_string());
    }

    /// Detect whether a binding takes part in a reference cycle
    pub fn has_circular_reference(&self, name: &str) -> bool {
        let mut visited = BTreeSet::new();
        self.detect_cycle(name, name, &mut visited)
    }

    /// Whether walking precedents from `name` leads back to `origin`
    fn detect_cycle(
        &self,
        origin: &str,
        name: &str,
        visited: &mut BTreeSet<String>,
    ) -> bool {
        if !visited.insert(name.to_string()) {
            return false;
        }

        if let Some(precedents) = self.precedents.get(name) {
            for precedent in precedents {
                if precedent == origin || self.detect_cycle(origin, precedent, visited) {
                    return true;
                }
            }
        }

        false
    }

    /// All bindings that take part in a reference cycle, sorted by name
    pub fn circular_names(&self) -> Vec<&str> {
        self.precedents
            .keys()
            .filter(|name| self.has_circular_reference(name))
            .map(String::as_str)
            .collect()
    }
}
