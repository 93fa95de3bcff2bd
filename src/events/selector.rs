//! Weighted event selection with short-term anti-repetition.
//!
//! ## State
//!
//! `EventSelector` is immutable content plus tuning. Everything that
//! changes between selections lives in a `SelectorState` value the caller
//! owns and passes in, one per session:
//!
//! - global history, batch-trimmed (`> 20` entries keeps the last 15)
//! - per-state capture history, the 3 most recently used ids
//! - the current turn, for turn gates
//!
//! ## Odds
//!
//! Every `SelectedEvent` reports `conditional_chance` (its weight over the
//! pool's total weight) and `trigger_chance` (the gate that let selection
//! happen times `conditional_chance`).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use super::catalog::EventCatalog;
use super::context::SelectionContext;
use super::event::{Event, EventFaction, SelectedEvent};
use super::fallback::fallback_event;
use crate::core::{EventId, RandomSource, SelectorConfig, StateId};
use crate::map::StateDirectory;

/// Per-session selection history.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorState {
    history: Vec<EventId>,
    state_history: FxHashMap<StateId, SmallVec<[EventId; 3]>>,
    turn: u32,
}

impl SelectorState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the turn used by `minTurn`/`maxTurn` gates.
    pub fn update_turn(&mut self, turn: u32) {
        self.turn = turn;
    }

    /// Forget all history (new match).
    pub fn reset(&mut self) {
        self.history.clear();
        self.state_history.clear();
        self.turn = 0;
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Global selections, oldest first.
    #[must_use]
    pub fn history(&self) -> &[EventId] {
        &self.history
    }

    /// Recent capture events for a state, oldest first.
    #[must_use]
    pub fn state_history(&self, state: &str) -> &[EventId] {
        self.state_history.get(state).map(|h| h.as_slice()).unwrap_or(&[])
    }

    fn recently_selected(&self, id: &EventId, window: usize) -> bool {
        self.history.iter().rev().take(window).any(|h| h == id)
    }

    fn record(&mut self, id: EventId, config: &SelectorConfig) {
        self.history.push(id);
        if self.history.len() > config.history_trim_threshold {
            let excess = self.history.len() - config.history_trim_to.min(self.history.len());
            self.history.drain(..excess);
        }
    }

    fn record_state(&mut self, state: StateId, id: EventId, cap: usize) {
        let recent = self.state_history.entry(state).or_default();
        recent.retain(|h| *h != id);
        recent.push(id);
        while recent.len() > cap {
            recent.remove(0);
        }
    }
}

/// Weighted draw: each event is picked with probability `weight / total`.
///
/// Returns the event and its conditional chance, or `None` for an empty
/// pool.
pub fn pick_weighted<'a>(pool: &[&'a Event], rng: &mut impl RandomSource) -> Option<(&'a Event, f64)> {
    let total: f64 = pool.iter().map(|e| e.weight).sum();
    let last = *pool.last()?;
    if total <= 0.0 || !total.is_finite() {
        return None;
    }

    let draw = rng.next_f64();
    trace!(draw, total, pool = pool.len(), "weighted draw");
    let mut remaining = draw * total;
    for &event in pool {
        remaining -= event.weight;
        if remaining <= 0.0 {
            return Some((event, event.weight / total));
        }
    }
    Some((last, last.weight / total))
}

/// Event content and tuning for one match.
#[derive(Clone, Debug, Default)]
pub struct EventSelector {
    catalog: EventCatalog,
    config: SelectorConfig,
    directory: StateDirectory,
}

impl EventSelector {
    #[must_use]
    pub fn new(catalog: EventCatalog, config: SelectorConfig) -> Self {
        Self {
            catalog,
            config,
            directory: StateDirectory::default(),
        }
    }

    /// Use `directory` to canonicalize state ids and name fallbacks.
    #[must_use]
    pub fn with_directory(mut self, directory: StateDirectory) -> Self {
        self.catalog = self.catalog.resolve_states(&directory);
        self.directory = directory;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn directory(&self) -> &StateDirectory {
        &self.directory
    }

    #[must_use]
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SelectorConfig) {
        self.config = config;
    }

    /// Global events eligible for `ctx` right now.
    ///
    /// Excludes the last `recent_exclusion` selections, events whose gates
    /// fail, and events tagged for the other faction.
    #[must_use]
    pub fn get_available_events(&self, state: &SelectorState, ctx: &SelectionContext) -> Vec<&Event> {
        self.catalog
            .events()
            .iter()
            .filter(|e| !state.recently_selected(&e.id, self.config.recent_exclusion))
            .filter(|e| e.conditions.as_ref().map_or(true, |c| ctx.satisfies(c, state.turn)))
            .filter(|e| e.faction.unwrap_or(EventFaction::Neutral).admits(ctx.faction))
            .collect()
    }

    /// Per-turn roll: hotspot events first, then the base chance.
    ///
    /// While the hotspot director is enabled, hotspots are spawned elsewhere
    /// and only the base roll happens.
    pub fn maybe_select_random_event(
        &self,
        state: &mut SelectorState,
        ctx: &SelectionContext,
        rng: &mut impl RandomSource,
    ) -> Option<SelectedEvent> {
        let pool = self.get_available_events(state, ctx);
        if pool.is_empty() {
            return None;
        }

        let hotspot_chance = self.config.hotspot_chance.clamp(0.0, 1.0);
        if !self.config.hotspot_director_enabled {
            let hotspots: Vec<&Event> = pool.iter().copied().filter(|e| e.is_hotspot()).collect();
            if !hotspots.is_empty() && rng.chance(hotspot_chance) {
                return self.select_from_pool(state, &hotspots, hotspot_chance, rng);
            }
        }

        let base_chance = self.config.base_event_chance.clamp(0.0, 1.0);
        if !rng.chance(base_chance) {
            trace!(turn = state.turn, base_chance, "no event this turn");
            return None;
        }
        self.select_from_pool(state, &pool, base_chance, rng)
    }

    /// Weighted selection over every eligible event, no gate roll.
    pub fn select_random_event(
        &self,
        state: &mut SelectorState,
        ctx: &SelectionContext,
        rng: &mut impl RandomSource,
    ) -> Option<SelectedEvent> {
        let pool = self.get_available_events(state, ctx);
        self.select_from_pool(state, &pool, 1.0, rng)
    }

    fn select_from_pool(
        &self,
        state: &mut SelectorState,
        pool: &[&Event],
        gate: f64,
        rng: &mut impl RandomSource,
    ) -> Option<SelectedEvent> {
        let (event, conditional_chance) = pick_weighted(pool, rng)?;
        state.record(event.id.clone(), &self.config);
        debug!(event = %event.id, conditional_chance, gate, turn = state.turn, "event selected");
        Some(SelectedEvent {
            event: event.clone(),
            conditional_chance,
            trigger_chance: gate * conditional_chance,
        })
    }

    /// Event following a capture of `state_id` by `captured_by`.
    ///
    /// Draws from the state's capture events that match the capturing side,
    /// skipping the state's recent history. When history covers every match
    /// the least recently used one is reused. Only a state with no matching
    /// content gets a synthesized fallback, so this always returns an event.
    pub fn select_state_event(
        &self,
        state: &mut SelectorState,
        state_id: &str,
        captured_by: EventFaction,
        ctx: &SelectionContext,
        rng: &mut impl RandomSource,
    ) -> SelectedEvent {
        let canonical = self
            .directory
            .resolve_id(state_id)
            .unwrap_or_else(|| StateId::from(state_id));

        let matches: Vec<&Event> = self
            .catalog
            .state_events(canonical.as_str())
            .iter()
            .filter(|e| e.follows_capture_by(captured_by))
            .filter(|e| e.conditions.as_ref().map_or(true, |c| ctx.satisfies(c, state.turn)))
            .collect();

        if matches.is_empty() {
            let event = fallback_event(&canonical, self.directory.display_name(canonical.as_str()), captured_by);
            warn!(state = %canonical, faction = ?captured_by, event = %event.id, "no capture content, using fallback");
            return SelectedEvent {
                event,
                conditional_chance: 1.0,
                trigger_chance: 1.0,
            };
        }

        let recent = state.state_history(canonical.as_str());
        let fresh: Vec<&Event> = matches.iter().copied().filter(|e| !recent.contains(&e.id)).collect();

        let picked = if fresh.is_empty() {
            matches
                .iter()
                .copied()
                .min_by_key(|e| recent.iter().position(|id| *id == e.id))
                .map(|e| (e, 1.0))
        } else {
            pick_weighted(&fresh, rng)
        };
        let Some((event, conditional_chance)) = picked else {
            let event = fallback_event(&canonical, self.directory.display_name(canonical.as_str()), captured_by);
            return SelectedEvent {
                event,
                conditional_chance: 1.0,
                trigger_chance: 1.0,
            };
        };

        state.record_state(canonical.clone(), event.id.clone(), self.config.state_history_cap);
        debug!(state = %canonical, event = %event.id, conditional_chance, reused = fresh.is_empty(), "capture event selected");
        SelectedEvent {
            event: event.clone(),
            conditional_chance,
            trigger_chance: conditional_chance,
        }
    }

    /// Force a global event into history. Returns `None` for unknown ids.
    pub fn trigger_event(&self, state: &mut SelectorState, id: &str) -> Option<Event> {
        let event = self.catalog.get(id)?;
        state.record(event.id.clone(), &self.config);
        debug!(event = %event.id, "event triggered");
        Some(event.clone())
    }
}
