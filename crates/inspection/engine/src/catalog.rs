//! Variable catalog: the variable list shown for a process instance
//!
//! Internal variables are hidden, duplicates collapse to their first
//! occurrence and the rest is sorted by name (ordinal comparison).

use crate::config::CatalogConfig;
use inspection_types::{Variable, VariableBag, VariableValue};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Display category derived from a variable's declared type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCategory {
    Numeric,
    Boolean,
    Text,
}

impl TypeCategory {
    /// Classify a declared type tag, ignoring case
    pub fn classify(type_name: &str) -> Self {
        match type_name.to_ascii_lowercase().as_str() {
            "number" | "numeric" | "integer" | "float" | "long" => Self::Numeric,
            "boolean" => Self::Boolean,
            _ => Self::Text,
        }
    }
}

/// A variable ready for a list view
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayVariable {
    pub name: String,
    pub type_category: TypeCategory,
    pub value: VariableValue,
}

impl DisplayVariable {
    pub fn display_value(&self) -> String {
        self.value.to_string()
    }
}

/// Builds display lists from process variables
#[derive(Clone, Debug)]
pub struct VariableCatalog {
    hidden: HashSet<String>,
}

impl VariableCatalog {
    pub fn new(hidden: impl IntoIterator<Item = String>) -> Self {
        Self {
            hidden: hidden.into_iter().collect(),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.hidden_variables.iter().cloned())
    }

    pub fn is_hidden(&self, name: &str) -> bool {
        self.hidden.contains(name)
    }

    /// Filter, deduplicate (first wins), sort and classify.
    pub fn catalog<'a>(
        &self,
        variables: impl IntoIterator<Item = &'a Variable>,
    ) -> Vec<DisplayVariable> {
        let mut seen = HashSet::new();
        let mut list: Vec<DisplayVariable> = variables
            .into_iter()
            .filter(|v| !self.is_hidden(&v.name))
            .filter(|v| seen.insert(v.name.as_str()))
            .map(|v| DisplayVariable {
                name: v.name.clone(),
                type_category: TypeCategory::classify(&v.type_name),
                value: v.value.clone(),
            })
            .collect();

        // Stable sort keeps the retained entry for equal names
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    /// Catalog a normalized variable bag
    pub fn catalog_bag(&self, bag: &VariableBag) -> Vec<DisplayVariable> {
        self.catalog(bag.iter())
    }

    /// Catalog the parallel-array wire encoding directly
    pub fn catalog_parallel(&self, names: &[String], values: &[VariableValue]) -> Vec<DisplayVariable> {
        let variables: Vec<Variable> = names
            .iter()
            .zip(values)
            .map(|(name, value)| Variable::inferred(name.clone(), value.clone()))
            .collect();
        self.catalog(&variables)
    }
}

impl Default for VariableCatalog {
    fn default() -> Self {
        Self::from_config(&CatalogConfig::default())
    }
}
