//! # shadow-rules
//!
//! Deterministic rules engine for a two-faction card game of influence
//! over a map of states, plus the content layer around it.
//!
//! ## Design Principles
//!
//! 1. **Pure Transitions**: Every rule takes a `GameState` snapshot and
//!    returns a new one. Nothing is mutated in place, so hosts can keep
//!    history, replay turns and run many matches side by side.
//!
//! 2. **Injected Randomness**: Every random draw goes through a
//!    `RandomSource`. Seeded `GameRng` for play, `ScriptedRng` for tests.
//!
//! 3. **Untrusted Content**: Cards and events arrive as JSON. Cards are
//!    repaired into a canonical shape with a derived cost before they ever
//!    reach the engine.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) snapshot cloning via `im-rs`.
//!
//! - **Session Ownership**: A `Match` owns the state, selector history and
//!   RNG of one game. Nothing is shared between matches.
//!
//! ## Modules
//!
//! - `core`: Ids, players, state, play records, RNG, configuration
//! - `cards`: Card shape, cost table, repair/validation, registry
//! - `map`: State directory and the built-in US map
//! - `rules`: Turn engine (income, plays, resolution, end of turn, wins)
//! - `audit`: Structural consistency checks over a snapshot
//! - `events`: Event catalog, weighted selection, capture events
//! - `session`: `Match` and `MatchBuilder`

pub mod audit;
pub mod cards;
pub mod core;
pub mod events;
pub mod map;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    CardId, EventId, StateId,
    Faction, PlayerId, PlayerPair,
    GameRng, GameRngState, RandomSource, ScriptedRng,
    EngineConfig, SelectorConfig, ConfigError,
    PlayMetadata, PlayStage, TurnPlay,
    GameState, PlayerState,
};

pub use crate::cards::{Card, CardEffects, CardRegistry, CardType, CardValidator, CostTable, Rarity};

pub use crate::map::{StateDirectory, StateInfo};

pub use crate::rules::{PlayBlock, PlayError, TurnEngine, WinReason, WinResult};

pub use crate::audit::{AuditError, Finding, StateAuditor};

pub use crate::events::{
    Event, EventCatalog, EventEffects, EventFaction, EventSelector, EventType,
    SelectedEvent, SelectionContext, SelectorState,
};

pub use crate::session::{Match, MatchBuilder, SessionError};
