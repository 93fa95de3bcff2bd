//! Resolver table from any state designation to its canonical id.
//!
//! Content and hosts refer to states by id, abbreviation, FIPS code or
//! display name. The directory indexes every designation once per match so
//! resolution is a single hash lookup.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::usa::usa_states;
use crate::core::StateId;

/// One map state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateInfo {
    pub id: StateId,
    pub name: String,
    /// Pressure needed to capture at match start.
    pub defense: u32,
    /// Extra designations (FIPS code, old ids).
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl StateInfo {
    #[must_use]
    pub fn new(id: impl Into<StateId>, name: impl Into<String>, defense: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            defense,
            aliases: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("designation '{key}' maps to both {first} and {second}")]
    Ambiguous {
        key: String,
        first: StateId,
        second: StateId,
    },
}

/// Lookup table for map states.
#[derive(Clone, Debug)]
pub struct StateDirectory {
    states: Vec<StateInfo>,
    index: FxHashMap<String, usize>,
}

impl StateDirectory {
    /// Build from a state list. Designations are matched case-insensitively.
    pub fn new(states: Vec<StateInfo>) -> Result<Self, DirectoryError> {
        let mut index: FxHashMap<String, usize> = FxHashMap::default();

        for (slot, state) in states.iter().enumerate() {
            let keys = std::iter::once(state.id.as_str())
                .chain(std::iter::once(state.name.as_str()))
                .chain(state.aliases.iter().map(String::as_str));

            for key in keys {
                let key = normalize(key);
                if key.is_empty() {
                    continue;
                }
                match index.get(&key) {
                    Some(&existing) if existing != slot => {
                        return Err(DirectoryError::Ambiguous {
                            key,
                            first: states[existing].id.clone(),
                            second: state.id.clone(),
                        });
                    }
                    _ => {
                        index.insert(key, slot);
                    }
                }
            }
        }

        Ok(Self { states, index })
    }

    /// The built-in fifty-one state map.
    #[must_use]
    pub fn usa() -> Self {
        let states = usa_states();
        let index = states
            .iter()
            .enumerate()
            .flat_map(|(slot, s)| {
                std::iter::once(normalize(s.id.as_str()))
                    .chain(std::iter::once(normalize(&s.name)))
                    .chain(s.aliases.iter().map(|a| normalize(a)))
                    .map(move |key| (key, slot))
            })
            .collect();
        Self { states, index }
    }

    /// Find a state by id, abbreviation, alias or name.
    #[must_use]
    pub fn resolve(&self, designation: &str) -> Option<&StateInfo> {
        self.index.get(&normalize(designation)).map(|&slot| &self.states[slot])
    }

    /// Canonical id for a designation.
    #[must_use]
    pub fn resolve_id(&self, designation: &str) -> Option<StateId> {
        self.resolve(designation).map(|s| s.id.clone())
    }

    /// Display name, or `None` for unknown designations.
    #[must_use]
    pub fn display_name(&self, designation: &str) -> Option<&str> {
        self.resolve(designation).map(|s| s.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateInfo> {
        self.states.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl Default for StateDirectory {
    fn default() -> Self {
        Self::usa()
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}
