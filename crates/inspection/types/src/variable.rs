//! Process variables: scalar values, typed records and the name→value bag

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Variable Value ───────────────────────────────────────────────────

/// A scalar variable value as delivered by the query service
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum VariableValue {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl VariableValue {
    /// Declared type tag for a value synthesized without one
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Boolean(_) => "Boolean",
            Self::Integer(_) => "Integer",
            Self::Float(_) => "Float",
            Self::Text(_) => "String",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Boolean(_))
    }

    /// Null or the empty string
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Borrow the text payload, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for VariableValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for VariableValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for VariableValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for VariableValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for VariableValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for VariableValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

// ── Variable ─────────────────────────────────────────────────────────

/// One named, typed process variable
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub name: String,
    /// Declared type tag (e.g. `Integer`, `Boolean`, `String`)
    #[serde(rename = "type")]
    pub type_name: String,
    pub value: VariableValue,
}

impl Variable {
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        value: impl Into<VariableValue>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            value: value.into(),
        }
    }

    /// Build a variable whose type tag is derived from the value itself
    pub fn inferred(name: impl Into<String>, value: impl Into<VariableValue>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            type_name: value.type_name().to_string(),
            value,
        }
    }
}

// ── Variable Bag ─────────────────────────────────────────────────────

/// The variables of one process instance, keyed by name.
///
/// Insertion order is the order names first appeared on the wire; a name
/// that appears again is ignored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VariableBag {
    entries: Vec<Variable>,
    index: HashMap<String, usize>,
}

impl VariableBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize the parallel-array wire encoding into a bag.
    ///
    /// Arrays of unequal length are truncated to the shorter one.
    pub fn from_parallel(names: Vec<String>, values: Vec<VariableValue>) -> Self {
        if names.len() != values.len() {
            tracing::warn!(
                names = names.len(),
                values = values.len(),
                "Variable arrays differ in length; truncating"
            );
        }

        names
            .into_iter()
            .zip(values)
            .map(|(name, value)| Variable::inferred(name, value))
            .collect()
    }

    /// Insert a variable unless its name is already present.
    ///
    /// Returns `false` when the name was taken.
    pub fn insert(&mut self, variable: Variable) -> bool {
        if self.index.contains_key(&variable.name) {
            return false;
        }
        self.index
            .insert(variable.name.clone(), self.entries.len());
        self.entries.push(variable);
        true
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<VariableValue>) -> Self {
        self.insert(Variable::inferred(name, value));
        self
    }

    /// Value for an exact name match
    pub fn lookup(&self, name: &str) -> Option<&VariableValue> {
        self.get(name).map(|v| &v.value)
    }

    /// Display string for an exact name match, or `""` if absent
    pub fn lookup_display(&self, name: &str) -> String {
        self.lookup(name).map(|v| v.to_string()).unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Variables in first-occurrence order
    pub fn variables(&self) -> &[Variable] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split back into the parallel-array wire encoding
    pub fn to_parallel(&self) -> (Vec<String>, Vec<VariableValue>) {
        self.entries
            .iter()
            .map(|v| (v.name.clone(), v.value.clone()))
            .unzip()
    }
}

impl FromIterator<Variable> for VariableBag {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        let mut bag = Self::new();
        for variable in iter {
            bag.insert(variable);
        }
        bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_parallel_keeps_first_occurrence() {
        let bag = VariableBag::from_parallel(
            names(&["b", "a", "a"]),
            vec!["first-b".into(), "first-a".into(), "dup".into()],
        );

        assert_eq!(bag.len(), 2);
        assert_eq!(bag.lookup_display("a"), "first-a");
        let order: Vec<_> = bag.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn test_from_parallel_truncates_mismatch() {
        let bag = VariableBag::from_parallel(names(&["x", "y", "z"]), vec![1i64.into()]);
        assert_eq!(bag.len(), 1);
        assert!(!bag.contains("y"));
    }

    #[test]
    fn test_lookup_miss_is_empty_string() {
        let bag = VariableBag::new().with("userName", "alice");
        assert_eq!(bag.lookup_display("userName"), "alice");
        assert_eq!(bag.lookup_display("idpName"), "");
        assert!(bag.lookup("idpName").is_none());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(VariableValue::Null.to_string(), "");
        assert_eq!(VariableValue::Integer(42).to_string(), "42");
        assert_eq!(VariableValue::Float(2.5).to_string(), "2.5");
        assert_eq!(VariableValue::Boolean(false).to_string(), "false");
        assert_eq!(VariableValue::from("Soil Map").to_string(), "Soil Map");
    }

    #[test]
    fn test_value_untagged_json() {
        let values: Vec<VariableValue> =
            serde_json::from_str(r#"[null, true, 7, 1.5, "text"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                VariableValue::Null,
                VariableValue::Boolean(true),
                VariableValue::Integer(7),
                VariableValue::Float(1.5),
                VariableValue::Text("text".into()),
            ]
        );
    }

    #[test]
    fn test_inferred_type_names() {
        assert_eq!(Variable::inferred("n", 3i64).type_name, "Integer");
        assert_eq!(Variable::inferred("b", true).type_name, "Boolean");
        assert_eq!(Variable::inferred("s", "x").type_name, "String");
        assert_eq!(
            Variable::inferred("z", VariableValue::Null).type_name,
            "Null"
        );
    }

    #[test]
    fn test_is_empty() {
        assert!(VariableValue::Null.is_empty());
        assert!(VariableValue::from("").is_empty());
        assert!(!VariableValue::Integer(0).is_empty());
        assert!(!VariableValue::Boolean(false).is_empty());
    }

    #[test]
    fn test_to_parallel_round_trips_order() {
        let bag = VariableBag::new().with("b", 1i64).with("a", "x");
        let (names, values) = bag.to_parallel();
        assert_eq!(names, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(values[1], VariableValue::from("x"));
    }
}
