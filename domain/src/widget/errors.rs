//! Field path → message map produced by validation.

use super::field::Field;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-field validation messages keyed by document path.
///
/// Keys are normally [`Field::path`] values, but server-reported errors may
/// name fields the client doesn't know about; those are kept verbatim and
/// rank after every known field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorMap {
    entries: BTreeMap<String, String>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a server field → messages structure, keeping the first
    /// message per field and mapping storage keys to document paths.
    pub fn from_remote(errors: &BTreeMap<String, Vec<String>>) -> Self {
        let mut map = Self::new();
        for (key, messages) in errors {
            if let Some(message) = messages.iter().find(|m| !m.trim().is_empty()) {
                let path = Field::from_path(key)
                    .map(|f| f.path().to_string())
                    .unwrap_or_else(|| key.clone());
                map.insert(path, message.clone());
            }
        }
        map
    }

    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.entries.insert(path.into(), message.into());
    }

    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.entries.remove(path)
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Overwrite entries with those of `other`
    pub fn merge(&mut self, other: ErrorMap) {
        self.entries.extend(other.entries);
    }

    /// Entries in field declaration order, unknown paths last
    pub fn ordered(&self) -> Vec<(&str, &str)> {
        let mut items: Vec<_> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        items.sort_by_key(|(path, _)| rank(path));
        items
    }

    /// Path of the first failing field in declaration order
    pub fn first_field(&self) -> Option<&str> {
        self.entries
            .keys()
            .min_by_key(|path| rank(path))
            .map(String::as_str)
    }

    /// Message of the first failing field in declaration order
    pub fn first_message(&self) -> Option<&str> {
        self.first_field().and_then(|path| self.get(path))
    }

    /// Single aggregated notification text: the lone message when there is
    /// exactly one error, a count otherwise.
    pub fn summary(&self) -> Option<String> {
        match self.len() {
            0 => None,
            1 => self.first_message().map(str::to_string),
            n => Some(format!("Please fix {n} validation errors before saving")),
        }
    }
}

fn rank(path: &str) -> (usize, String) {
    let index = Field::from_path(path)
        .map(|f| f.index())
        .unwrap_or(usize::MAX);
    (index, path.to_string())
}
