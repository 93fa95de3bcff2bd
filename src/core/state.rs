//! Game state: players, map control and the per-turn record.
//!
//! ## Snapshots
//!
//! Every collection is an `im` persistent structure, so `GameState::clone`
//! is O(1) and shares structure with the original. Engine transitions take
//! `&GameState`, clone it, edit the clone and return it: the input snapshot
//! is never touched, and old snapshots stay valid for replays and undo.
//!
//! ## Invariants (checked by `audit::StateAuditor`)
//!
//! - `truth` within the configured meter bounds
//! - a state id is owned by at most one player
//! - an owned state has zero pressure recorded for both players
//! - `plays_this_turn` never exceeds the per-turn limit

use im::{OrdMap, OrdSet, Vector};
use serde::{Deserialize, Serialize};

use super::action::TurnPlay;
use super::ids::StateId;
use super::player::{Faction, PlayerId, PlayerPair};
use crate::cards::Card;
use crate::map::StateDirectory;

/// Truth meter value at match start.
pub const STARTING_TRUTH: i32 = 50;

/// One seat's resources.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub faction: Faction,

    /// Front is the next draw.
    pub deck: Vector<Card>,
    pub hand: Vector<Card>,
    pub discard: Vector<Card>,

    /// Influence points. Unsigned: every deduction floors at zero.
    pub ip: u32,

    /// Controlled states.
    pub states: OrdSet<StateId>,
}

impl PlayerState {
    #[must_use]
    pub fn new(id: PlayerId, faction: Faction) -> Self {
        Self {
            id,
            faction,
            deck: Vector::new(),
            hand: Vector::new(),
            discard: Vector::new(),
            ip: 0,
            states: OrdSet::new(),
        }
    }

    #[must_use]
    pub fn with_deck(mut self, deck: impl IntoIterator<Item = Card>) -> Self {
        self.deck = deck.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_hand(mut self, hand: impl IntoIterator<Item = Card>) -> Self {
        self.hand = hand.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_ip(mut self, ip: u32) -> Self {
        self.ip = ip;
        self
    }

    #[must_use]
    pub fn with_states<S: Into<StateId>>(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.states = states.into_iter().map(Into::into).collect();
        self
    }

    /// Position of a card in hand.
    #[must_use]
    pub fn hand_position(&self, card_id: &str) -> Option<usize> {
        self.hand.iter().position(|c| c.id.as_str() == card_id)
    }

    #[must_use]
    pub fn controls(&self, state_id: &str) -> bool {
        self.states.contains(state_id)
    }
}

/// Complete match state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Turn counter (starts at 1, +1 per `end_turn`).
    pub turn: u32,
    pub current_player: PlayerId,

    /// Truth meter.
    pub truth: i32,

    pub players: PlayerPair<PlayerState>,

    /// Accumulated capture pressure per state, per player.
    pub pressure_by_state: OrdMap<StateId, PlayerPair<u32>>,

    /// Pressure needed to capture each state.
    pub state_defense: OrdMap<StateId, u32>,

    pub plays_this_turn: u8,

    /// Append-only human-readable log.
    pub log: Vector<String>,

    /// Records for the current turn.
    pub turn_plays: Vector<TurnPlay>,
}

impl GameState {
    /// A fresh match with no map states tracked.
    #[must_use]
    pub fn new(p1: PlayerState, p2: PlayerState) -> Self {
        Self {
            turn: 1,
            current_player: PlayerId::P1,
            truth: STARTING_TRUTH,
            players: PlayerPair::new(p1, p2),
            pressure_by_state: OrdMap::new(),
            state_defense: OrdMap::new(),
            plays_this_turn: 0,
            log: Vector::new(),
            turn_plays: Vector::new(),
        }
    }

    /// A fresh match tracking every state in `directory` at its base defense.
    #[must_use]
    pub fn for_map(directory: &StateDirectory, p1: PlayerState, p2: PlayerState) -> Self {
        directory
            .iter()
            .fold(Self::new(p1, p2), |state, info| state.with_tracked_state(info.id.clone(), info.defense))
    }

    /// Track one more state with zero pressure.
    #[must_use]
    pub fn with_tracked_state(mut self, state_id: impl Into<StateId>, defense: u32) -> Self {
        let state_id = state_id.into();
        self.pressure_by_state.insert(state_id.clone(), PlayerPair::default());
        self.state_defense.insert(state_id, defense);
        self
    }

    #[must_use]
    pub fn with_truth(mut self, truth: i32) -> Self {
        self.truth = truth;
        self
    }

    // === Players ===

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        &mut self.players[id]
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current(&self) -> &PlayerState {
        &self.players[self.current_player]
    }

    /// The seat playing `faction`, if either does.
    #[must_use]
    pub fn seat_of(&self, faction: Faction) -> Option<PlayerId> {
        PlayerId::ALL.into_iter().find(|&p| self.players[p].faction == faction)
    }

    // === Map ===

    /// Whether the state participates in pressure tracking.
    #[must_use]
    pub fn is_tracked(&self, state_id: &str) -> bool {
        self.pressure_by_state.contains_key(state_id)
    }

    #[must_use]
    pub fn owner_of(&self, state_id: &str) -> Option<PlayerId> {
        PlayerId::ALL.into_iter().find(|&p| self.players[p].controls(state_id))
    }

    #[must_use]
    pub fn pressure(&self, state_id: &str, player: PlayerId) -> u32 {
        self.pressure_by_state.get(state_id).map_or(0, |p| p[player])
    }

    #[must_use]
    pub fn defense(&self, state_id: &str) -> Option<u32> {
        self.state_defense.get(state_id).copied()
    }

    // === Log ===

    pub fn push_log(&mut self, line: impl Into<String>) {
        self.log.push_back(line.into());
    }

    pub(crate) fn next_play_sequence(&self) -> u32 {
        self.turn_plays.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Rarity;

    fn players() -> (PlayerState, PlayerState) {
        (
            PlayerState::new(PlayerId::P1, Faction::Truth),
            PlayerState::new(PlayerId::P2, Faction::Government),
        )
    }

    #[test]
    fn test_new_state_defaults() {
        let (p1, p2) = players();
        let state = GameState::new(p1, p2);

        assert_eq!(state.turn, 1);
        assert_eq!(state.current_player, PlayerId::P1);
        assert_eq!(state.truth, STARTING_TRUTH);
        assert_eq!(state.plays_this_turn, 0);
        assert!(state.pressure_by_state.is_empty());
    }

    #[test]
    fn test_for_map_tracks_every_state() {
        let (p1, p2) = players();
        let directory = StateDirectory::usa();
        let state = GameState::for_map(&directory, p1, p2);

        assert_eq!(state.pressure_by_state.len(), 51);
        assert_eq!(state.defense("NY"), Some(5));
        assert_eq!(state.pressure("NY", PlayerId::P1), 0);
    }

    #[test]
    fn test_seat_and_owner_lookup() {
        let (p1, p2) = players();
        let state = GameState::new(p1.with_states(["CA"]), p2);

        assert_eq!(state.seat_of(Faction::Government), Some(PlayerId::P2));
        assert_eq!(state.owner_of("CA"), Some(PlayerId::P1));
        assert_eq!(state.owner_of("TX"), None);
    }

    #[test]
    fn test_controls_matches_exact_ids() {
        let (p1, _) = players();
        let p1 = p1.with_states(["CA", "NY", "TX", "WA"]);

        assert!(p1.controls("NY"));
        assert!(p1.controls("WA"));
        assert!(!p1.controls("N"));
        assert!(!p1.controls("NYC"));
        assert!(!p1.controls("ny"));
        assert!(!p1.controls(""));
    }

    #[test]
    fn test_clone_is_independent_snapshot() {
        let (p1, p2) = players();
        let card = crate::cards::Card::media("m", Faction::Truth, Rarity::Common, 1);
        let original = GameState::new(p1.with_hand([card]), p2);

        let mut edited = original.clone();
        edited.player_mut(PlayerId::P1).hand.clear();
        edited.push_log("edited");

        assert_eq!(original.player(PlayerId::P1).hand.len(), 1);
        assert!(original.log.is_empty());
        assert_eq!(edited.log.len(), 1);
    }

    #[test]
    fn test_hand_position() {
        let (p1, _) = players();
        let p1 = p1.with_hand([
            crate::cards::Card::media("a", Faction::Truth, Rarity::Common, 1),
            crate::cards::Card::media("b", Faction::Truth, Rarity::Common, 1),
        ]);
        assert_eq!(p1.hand_position("b"), Some(1));
        assert_eq!(p1.hand_position("c"), None);
    }

    #[test]
    fn test_serialization_round_trip() {
        let (p1, p2) = players();
        let state = GameState::new(p1, p2).with_tracked_state("CA", 4);
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
