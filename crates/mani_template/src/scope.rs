//! Scoped name resolution.
//!
//! Lookup order for the first path segment: innermost loop binding
//! first, then the root descriptor mapping. Remaining segments walk
//! nested mappings; a numeric segment indexes a sequence.

use mani_descriptor::{Mapping, Value};

use crate::ast::PathExpr;

/// Resolution scope: the root descriptor plus active loop bindings.
pub struct Scope<'a> {
    root: &'a Mapping,
    frames: Vec<(&'a str, &'a Value)>,
}

impl<'a> Scope<'a> {
    pub fn new(root: &'a Mapping) -> Self {
        Self {
            root,
            frames: Vec::new(),
        }
    }

    /// Bind a loop variable for the duration of one iteration.
    pub fn push(&mut self, name: &'a str, value: &'a Value) {
        self.frames.push((name, value));
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Resolve a dotted path against the current scope.
    pub fn resolve(&self, path: &PathExpr) -> Option<&'a Value> {
        let mut segments = path.segments.iter();
        let first = segments.next()?;

        let mut current = self
            .frames
            .iter()
            .rev()
            .find(|(name, _)| name == first)
            .map(|(_, value)| *value)
            .or_else(|| self.root.get(first.as_str()))?;

        for segment in segments {
            current = index(current, segment)?;
        }
        Some(current)
    }
}

fn index<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Mapping(map) => map.get(segment),
        Value::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Span;

    fn path(dotted: &str) -> PathExpr {
        PathExpr {
            segments: dotted.split('.').map(str::to_string).collect(),
            span: Span { line: 1, column: 1 },
        }
    }

    fn root() -> Mapping {
        let mut ports_entry = Mapping::new();
        ports_entry.insert("name".to_string(), Value::from("http"));

        let mut map = Mapping::new();
        map.insert("name".to_string(), Value::from("my-api"));
        map.insert(
            "ports".to_string(),
            Value::Sequence(vec![Value::Mapping(ports_entry)]),
        );
        map
    }

    #[test]
    fn test_resolve_root_field() {
        let root = root();
        let scope = Scope::new(&root);
        assert_eq!(scope.resolve(&path("name")), Some(&Value::from("my-api")));
    }

    #[test]
    fn test_resolve_sequence_index() {
        let root = root();
        let scope = Scope::new(&root);
        assert_eq!(
            scope.resolve(&path("ports.0.name")),
            Some(&Value::from("http"))
        );
    }

    #[test]
    fn test_loop_binding_shadows_root() {
        let root = root();
        let shadow = Value::from("loop-bound");
        let mut scope = Scope::new(&root);
        scope.push("name", &shadow);
        assert_eq!(scope.resolve(&path("name")), Some(&shadow));
        scope.pop();
        assert_eq!(scope.resolve(&path("name")), Some(&Value::from("my-api")));
    }

    #[test]
    fn test_unresolved_path() {
        let root = root();
        let scope = Scope::new(&root);
        assert_eq!(scope.resolve(&path("missing")), None);
        assert_eq!(scope.resolve(&path("name.deeper")), None);
    }
}
