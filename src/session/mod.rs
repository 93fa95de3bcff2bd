//! Session layer: one `Match` per running game.
//!
//! A `Match` owns the `GameState`, the `SelectorState` and the `GameRng`
//! of one session and routes captures into capture-event selection. Nothing
//! is shared between matches, so anti-repeat history and RNG streams never
//! leak across sessions.

mod builder;
mod game;

pub use builder::MatchBuilder;
pub use game::{CaptureNotice, Match, PlayOutcome, TurnReport};

use crate::audit::AuditError;
use crate::core::ConfigError;
use crate::rules::{PlayError, WinResult};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Play(#[from] PlayError),

    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("match is over: {} won by {:?}", .0.winner, .0.reason)]
    MatchOver(WinResult),
}
