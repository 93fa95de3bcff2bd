//! Event content and selection.
//!
//! ## Key Types
//!
//! - `Event`: authored content with weight, gates and an effects bundle
//! - `EventCatalog`: global events plus per-state capture events
//! - `EventSelector`: weighted selection over a catalog
//! - `SelectorState`: per-session history the selector reads and updates
//! - `SelectionContext`: the player-facing slice of `GameState` gates read
//!
//! Selection never touches `GameState`; `apply_event_effects` is the helper
//! hosts use to apply a chosen event's deltas.

pub mod apply;
pub mod catalog;
pub mod context;
pub mod event;
pub mod fallback;
pub mod selector;

pub use apply::{apply_event_effects, apply_event_effects_with};
pub use catalog::EventCatalog;
pub use context::SelectionContext;
pub use event::{
    CampaignRef, Event, EventConditions, EventEffects, EventFaction, EventType, HotspotPayload, SelectedEvent,
    StateEffects,
};
pub use fallback::{fallback_event, FALLBACK_PREFIX};
pub use selector::{pick_weighted, EventSelector, SelectorState};
