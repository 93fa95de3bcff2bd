//! Event catalog: global events plus per-state capture events.
//!
//! ```json
//! {
//!   "events": [ { "id": "ufo_sighting", ... } ],
//!   "stateEvents": { "CA": [ { "id": "ca_truth_1", ... } ] }
//! }
//! ```

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use tracing::debug;

use super::event::Event;
use crate::core::{ConfigError, StateId};
use crate::map::StateDirectory;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCatalog {
    #[serde(default)]
    events: Vec<Event>,
    #[serde(default)]
    state_events: FxHashMap<String, Vec<Event>>,
}

/// Read-only event content for one match.
#[derive(Clone, Debug, Default)]
pub struct EventCatalog {
    events: Vec<Event>,
    state_events: FxHashMap<StateId, Vec<Event>>,
}

impl EventCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog, rejecting non-positive weights and duplicate ids.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for event in raw.events {
            catalog.push_event(event)?;
        }
        for (state, events) in raw.state_events {
            for event in events {
                catalog.push_state_event(state.as_str(), event)?;
            }
        }
        debug!(
            events = catalog.events.len(),
            states = catalog.state_events.len(),
            "event catalog loaded"
        );
        Ok(catalog)
    }

    /// Add a global event.
    pub fn push_event(&mut self, event: Event) -> Result<(), ConfigError> {
        check_weight(&event)?;
        if self.events.iter().any(|e| e.id == event.id) {
            return Err(duplicate(&event));
        }
        self.events.push(event);
        Ok(())
    }

    /// Add a capture event for one state.
    pub fn push_state_event(&mut self, state: impl Into<StateId>, event: Event) -> Result<(), ConfigError> {
        check_weight(&event)?;
        let pool = self.state_events.entry(state.into()).or_default();
        if pool.iter().any(|e| e.id == event.id) {
            return Err(duplicate(&event));
        }
        pool.push(event);
        Ok(())
    }

    /// Builder form of `push_event`.
    pub fn with_event(mut self, event: Event) -> Result<Self, ConfigError> {
        self.push_event(event)?;
        Ok(self)
    }

    /// Builder form of `push_state_event`.
    pub fn with_state_event(mut self, state: impl Into<StateId>, event: Event) -> Result<Self, ConfigError> {
        self.push_state_event(state, event)?;
        Ok(self)
    }

    /// Re-key per-state pools by canonical id (`"California"` → `"CA"`).
    /// Keys the directory does not know are kept as written.
    #[must_use]
    pub fn resolve_states(mut self, directory: &StateDirectory) -> Self {
        let pools = std::mem::take(&mut self.state_events);
        for (key, events) in pools {
            let id = directory.resolve_id(key.as_str()).unwrap_or(key);
            let pool = self.state_events.entry(id).or_default();
            let mut seen: FxHashSet<_> = pool.iter().map(|e| e.id.clone()).collect();
            pool.extend(events.into_iter().filter(|e| seen.insert(e.id.clone())));
        }
        self
    }

    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Capture events for a state (empty when none are authored).
    #[must_use]
    pub fn state_events(&self, state: &str) -> &[Event] {
        self.state_events.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Look up a global event by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id.as_str() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

fn check_weight(event: &Event) -> Result<(), ConfigError> {
    if event.weight.is_finite() && event.weight > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field: "weight",
            reason: format!("event {} has weight {}", event.id, event.weight),
        })
    }
}

fn duplicate(event: &Event) -> ConfigError {
    ConfigError::Invalid {
        field: "id",
        reason: format!("duplicate event id {}", event.id),
    }
}
