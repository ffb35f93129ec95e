//! Reverse alias index

use super::normalize::Normalizer;
use super::AliasKind;
use crate::error::{Result, RuntimeError};
use admit_core::AliasTable;
use std::collections::BTreeMap;
use tracing::debug;

/// Immutable normalized-alias -> canonical map for one alias table.
/// Each canonical name is also registered under its own normalized form.
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    reverse: BTreeMap<String, String>,
    names: BTreeMap<String, Vec<String>>,
}

impl AliasIndex {
    /// Build the reverse map. A normalized key claimed by two different
    /// canonical names is rejected.
    pub fn build(kind: AliasKind, table: &AliasTable, normalizer: &Normalizer) -> Result<Self> {
        let mut reverse: BTreeMap<String, String> = BTreeMap::new();
        let mut names = BTreeMap::new();

        for (canonical, aliases) in table.iter() {
            let mut spellings = vec![canonical.clone()];
            spellings.extend(aliases.iter().cloned());

            for spelling in &spellings {
                let key = normalizer.normalize(spelling);
                if key.is_empty() {
                    debug!(kind = kind.as_str(), spelling = %spelling, "skipping alias with empty key");
                    continue;
                }
                match reverse.get(&key) {
                    Some(existing) if existing != canonical => {
                        return Err(RuntimeError::config(
                            format!("{} aliases", kind.as_str()),
                            format!(
                                "'{}' normalizes to '{}', already registered for '{}' (conflicts with '{}')",
                                spelling, key, existing, canonical
                            ),
                        ));
                    }
                    Some(_) => {}
                    None => {
                        reverse.insert(key, canonical.clone());
                    }
                }
            }

            names.insert(canonical.clone(), spellings);
        }

        Ok(Self { reverse, names })
    }

    /// Canonical name for an already-normalized key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.reverse.get(key).map(String::as_str)
    }

    /// (normalized key, canonical) pairs in key order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.reverse.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Canonical name followed by its registered aliases
    pub fn names_of(&self, canonical: &str) -> Option<&[String]> {
        self.names.get(canonical).map(Vec::as_slice)
    }

    pub fn canonicals(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }
}
