//! Per-turn play records.
//!
//! Every card play leaves two records in `GameState::turn_plays`: a `Play`
//! record when the card leaves the hand and a `Resolve` record carrying
//! what actually happened. Downstream systems (combo detection, turn
//! summaries, newspaper generation) read these; the engine only writes them.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::ids::{CardId, StateId};
use super::player::PlayerId;
use crate::cards::{Card, CardType, Rarity};

/// Which half of a play a record describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayStage {
    Play,
    Resolve,
}

/// Realized outcome of a resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayMetadata {
    /// IP actually removed from the opponent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<u32>,

    /// Cards actually discarded from the opponent's hand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discarded: Option<u32>,

    /// Signed truth change after clamping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truth: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<u32>,

    /// States that changed hands. SmallVec since a play captures at most one.
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub captured: SmallVec<[StateId; 1]>,
}

/// One entry in the turn's play log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnPlay {
    /// Position within the turn's records.
    pub sequence: u32,
    pub stage: PlayStage,
    pub owner: PlayerId,
    pub card_id: CardId,
    pub card_name: String,
    pub card_type: CardType,
    pub card_rarity: Rarity,
    pub cost: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_state_id: Option<StateId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PlayMetadata>,
}

impl TurnPlay {
    /// Record describing `card` at `stage`.
    #[must_use]
    pub fn new(sequence: u32, stage: PlayStage, owner: PlayerId, card: &Card, target: Option<&StateId>) -> Self {
        Self {
            sequence,
            stage,
            owner,
            card_id: card.id.clone(),
            card_name: card.name.clone(),
            card_type: card.card_type(),
            card_rarity: card.rarity,
            cost: card.cost,
            target_state_id: target.cloned(),
            metadata: None,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: PlayMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// States captured by this record (empty for `Play` records).
    pub fn captured(&self) -> impl Iterator<Item = &StateId> {
        self.metadata.iter().flat_map(|m| m.captured.iter())
    }
}
