//! Alias tables
//!
//! An alias table maps a canonical reference-data name to the spellings
//! humans actually type. Reverse lookup is built by the runtime resolver.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical name -> aliases
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a canonical name with its aliases. Registering the same
    /// canonical twice appends aliases.
    pub fn insert<I, S>(&mut self, canonical: impl Into<String>, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.entries.entry(canonical.into()).or_default();
        for alias in aliases {
            let alias = alias.into();
            if !entry.contains(&alias) {
                entry.push(alias);
            }
        }
    }

    /// Builder-style `insert`
    pub fn with<I, S>(mut self, canonical: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(canonical, aliases);
        self
    }

    pub fn aliases(&self, canonical: &str) -> Option<&[String]> {
        self.entries.get(canonical).map(|v| v.as_slice())
    }

    pub fn contains_canonical(&self, canonical: &str) -> bool {
        self.entries.contains_key(canonical)
    }

    /// Entries in canonical-name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fold another table in, appending aliases of shared canonicals
    pub fn merge(&mut self, other: AliasTable) {
        for (canonical, aliases) in other.entries {
            self.insert(canonical, aliases);
        }
    }
}

/// The three alias tables an engine is built with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AliasRegistry {
    #[serde(default)]
    pub institutions: AliasTable,
    #[serde(default)]
    pub majors: AliasTable,
    #[serde(default)]
    pub subjects: AliasTable,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_institutions(mut self, table: AliasTable) -> Self {
        self.institutions = table;
        self
    }

    pub fn with_majors(mut self, table: AliasTable) -> Self {
        self.majors = table;
        self
    }

    pub fn with_subjects(mut self, table: AliasTable) -> Self {
        self.subjects = table;
        self
    }

    /// Merge all three tables of `other` into this registry
    pub fn merge(&mut self, other: AliasRegistry) {
        self.institutions.merge(other.institutions);
        self.majors.merge(other.majors);
        self.subjects.merge(other.subjects);
    }
}
