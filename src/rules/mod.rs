//! Turn rules.
//!
//! `TurnEngine` owns the rule constants (`EngineConfig`) and exposes the
//! transitions hosts drive a match with:
//! - `start_turn`: income and draw
//! - `can_play` / `play_card` / `resolve`: card plays
//! - `end_turn`: discard settlement and handoff
//! - `win_check`: victory conditions

pub mod engine;
pub mod error;

pub use engine::{
    DiscardSummary, EndTurnSummary, ResolveOptions, TruthSign, TurnEngine, TurnOutcome, WinReason, WinResult,
};
pub use error::{PlayBlock, PlayError};
