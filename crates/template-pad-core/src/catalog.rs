//! Variable catalog: the fixed list of placeholders a template may use.
//!
//! The catalog is owned by the caller and read-only to the editor. Order is
//! preserved, so the dropdown shows candidates in the order they were
//! supplied.

use serde::{Deserialize, Serialize};

/// One selectable template variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Identifier inserted between the braces, e.g. `clientName`.
    pub name: String,
    /// Human readable explanation shown next to the name.
    #[serde(default)]
    pub description: String,
}

impl Candidate {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Case-insensitive substring match against name or description.
    /// `needle` must already be lowercase.
    fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Ordered, read-only collection of candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableCatalog {
    candidates: Vec<Candidate>,
}

impl From<Vec<Candidate>> for VariableCatalog {
    fn from(candidates: Vec<Candidate>) -> Self {
        Self::new(candidates)
    }
}

impl VariableCatalog {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Looks up a candidate by exact name.
    pub fn get(&self, name: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.name == name)
    }

    /// Returns true if `name` is one of the catalog's variables.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the candidates whose name or description contains `query`,
    /// ignoring case. An empty query matches everything.
    pub fn matching(&self, query: &str) -> Vec<Candidate> {
        let needle = query.to_lowercase();
        self.candidates
            .iter()
            .filter(|c| c.matches_lowercase(&needle))
            .cloned()
            .collect()
    }
}

/// Returns true if `s` is a valid variable identifier: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
