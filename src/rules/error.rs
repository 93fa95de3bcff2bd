//! Play legality codes and engine errors.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{CardId, StateId};

/// Why a card cannot be played right now.
///
/// Codes are stable strings so hosts can key UI messages on them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayBlock {
    /// The turn's play allowance is used up.
    PlayLimit,
    InsufficientIp,
    /// ZONE card without a target state.
    MissingTarget,
    /// ZONE target is not a tracked state, or is already the actor's.
    InvalidTarget,
}

impl PlayBlock {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PlayBlock::PlayLimit => "play-limit",
            PlayBlock::InsufficientIp => "insufficient-ip",
            PlayBlock::MissingTarget => "missing-target",
            PlayBlock::InvalidTarget => "invalid-target",
        }
    }
}

impl fmt::Display for PlayBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A caller asked the engine for an illegal transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayError {
    #[error("card {card_id} not found in hand")]
    CardNotInHand { card_id: CardId },

    #[error("cannot play: {0}")]
    Blocked(PlayBlock),

    #[error("ZONE card requires a target state")]
    MissingTarget,

    #[error("state {0} is not on the map")]
    UnknownState(StateId),
}

impl From<PlayBlock> for PlayError {
    fn from(block: PlayBlock) -> Self {
        PlayError::Blocked(block)
    }
}
