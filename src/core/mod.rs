//! Core engine types: players, ids, state, play records, RNG, configuration.
//!
//! Everything here is plain data. Transitions live in `rules`, checks in
//! `audit`, content selection in `events`.

pub mod action;
pub mod config;
pub mod ids;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{PlayMetadata, PlayStage, TurnPlay};
pub use config::{ConfigError, EngineConfig, SelectorConfig};
pub use ids::{CardId, EventId, StateId};
pub use player::{Faction, PlayerId, PlayerPair};
pub use rng::{GameRng, GameRngState, RandomSource, ScriptedRng};
pub use state::{GameState, PlayerState, STARTING_TRUTH};
