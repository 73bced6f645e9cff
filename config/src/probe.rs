use serde::{
    Deserialize,
    Serialize,
};

/// A user supplied query exported as its own gauge family.
///
/// The query must return rows with exactly one numeric column. `label` is
/// used both as the name and the value of the family's second label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeDefinition {
    pub name: String,
    pub query: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
}

impl ProbeDefinition {
    pub fn new(name: impl Into<String>, query: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            query: query.into(),
            label: label.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Help text of the family. Prometheus rejects empty help strings, so the
    /// probe name stands in for a missing description.
    pub fn help(&self) -> &str {
        if self.description.trim().is_empty() {
            &self.name
        } else {
            &self.description
        }
    }
}
