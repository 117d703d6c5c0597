//! Name → expression table used to resolve variables
//!
//! An [`Environment`] is a projection of the current sheet: it is assembled from
//! the bindings each field contributes and rebuilt whenever field state changes.
//! When two sources contribute the same name the earlier one wins and the later
//! binding is dropped.

use crate::ast::Expression;
use crate::evaluator::evaluate;
use crate::value::Value;
use ahash::AHashMap;

/// Anything that contributes named expressions to an environment
pub trait BindingSource {
    /// Bindings in the order they should be considered
    fn contributed_bindings(&self) -> Vec<(String, Expression)>;
}

/// A single name binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub expression: Expression,
}

/// Ordered, first-wins collection of bindings
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: Vec<Binding>,
    /// Name → position in `bindings`
    index: AHashMap<String, usize>,
}

impl Environment {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge bindings in order; the first binding for a name wins
    pub fn from_bindings<I>(bindings: I) -> Self
    where
        I: IntoIterator<Item = (String, Expression)>,
    {
        let mut env = Self::new();
        for (name, expression) in bindings {
            env.bind_first(name, expression);
        }
        env
    }

    /// Collect and merge the bindings of every source, in source order
    pub fn from_sources<'s, S, I>(sources: I) -> Self
    where
        S: BindingSource + 's,
        I: IntoIterator<Item = &'s S>,
    {
        Self::from_bindings(
            sources
                .into_iter()
                .flat_map(|source| source.contributed_bindings()),
        )
    }

    fn bind_first(&mut self, name: String, expression: Expression) {
        if self.index.contains_key(&name) {
            log::trace!("binding {:?} already defined; later contribution dropped", name);
            return;
        }
        self.index.insert(name.clone(), self.bindings.len());
        self.bindings.push(Binding { name, expression });
    }

    /// Look up the expression bound to a name
    pub fn get(&self, name: &str) -> Option<&Expression> {
        self.index.get(name).map(|&i| &self.bindings[i].expression)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate over bindings in merge order
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    /// Bound names in merge order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.name.as_str())
    }

    /// Evaluate an expression against this environment with no ancestors
    pub fn evaluate(&self, expr: &Expression) -> Value {
        evaluate(self, expr, &[])
    }

    /// Evaluate the expression bound to `name`
    pub fn evaluate_name(&self, name: &str) -> Value {
        self.evaluate(&Expression::Variable(name.to_string()))
    }
}

impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        self.bindings == other.bindings
    }
}

impl Eq for Environment {}

impl FromIterator<(String, Expression)> for Environment {
    fn from_iter<I: IntoIterator<Item = (String, Expression)>>(iter: I) -> Self {
        Self::from_bindings(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Source(Vec<(&'static str, Expression)>);

    impl BindingSource for Source {
        fn contributed_bindings(&self) -> Vec<(String, Expression)> {
            self.0
                .iter()
                .map(|(name, expr)| (name.to_string(), expr.clone()))
                .collect()
        }
    }

    #[test]
    fn test_first_binding_wins() {
        let env = Environment::from_bindings([
            ("X".to_string(), Expression::Integer(1)),
            ("Y".to_string(), Expression::Integer(2)),
            ("X".to_string(), Expression::Integer(3)),
        ]);
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("X"), Some(&Expression::Integer(1)));
        assert_eq!(env.names().collect::<Vec<_>>(), vec!["X", "Y"]);
    }

    #[test]
    fn test_from_sources_keeps_earlier_source() {
        let sources = vec![
            Source(vec![("X", Expression::var("a"))]),
            Source(vec![("b", Expression::Bool(true)), ("X", Expression::Integer(9))]),
        ];
        let env = Environment::from_sources(&sources);
        assert_eq!(env.get("X"), Some(&Expression::var("a")));
        assert_eq!(env.get("b"), Some(&Expression::Bool(true)));
        assert!(env.get("missing").is_none());
    }

    #[test]
    fn test_evaluate_name() {
        let env: Environment = [("hp".to_string(), Expression::Integer(12))]
            .into_iter()
            .collect();
        assert_eq!(env.evaluate_name("hp"), Value::Integer(12));
        assert_eq!(env.evaluate_name("ac"), Value::Undefined);
    }
}
