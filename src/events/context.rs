//! The slice of game state event gates read.

use serde::{Deserialize, Serialize};

use super::event::{EventConditions, EventFaction};
use crate::core::{GameState, PlayerId, StateId};

/// What the selector knows about the player an event is for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionContext {
    pub faction: EventFaction,
    pub truth: i32,
    pub ip: u32,
    pub controlled_states: Vec<StateId>,
}

impl SelectionContext {
    /// Context for `player` in `state`.
    #[must_use]
    pub fn for_player(state: &GameState, player: PlayerId) -> Self {
        let seat = state.player(player);
        Self {
            faction: seat.faction.into(),
            truth: state.truth,
            ip: seat.ip,
            controlled_states: seat.states.iter().cloned().collect(),
        }
    }

    /// Context for the player whose turn it is.
    #[must_use]
    pub fn current(state: &GameState) -> Self {
        Self::for_player(state, state.current_player)
    }

    /// Context with no resources; only faction gates can fail.
    #[must_use]
    pub fn neutral(faction: EventFaction) -> Self {
        Self {
            faction,
            truth: 50,
            ip: 0,
            controlled_states: Vec::new(),
        }
    }

    /// Check every gate in `conditions` at `turn`.
    #[must_use]
    pub fn satisfies(&self, conditions: &EventConditions, turn: u32) -> bool {
        let gates = [
            conditions.min_turn.map_or(true, |min| turn >= min),
            conditions.max_turn.map_or(true, |max| turn <= max),
            conditions.truth_above.map_or(true, |t| self.truth >= t),
            conditions.truth_below.map_or(true, |t| self.truth <= t),
            conditions.ip_above.map_or(true, |ip| self.ip >= ip),
            conditions.ip_below.map_or(true, |ip| self.ip <= ip),
            conditions
                .controlled_states
                .map_or(true, |n| self.controlled_states.len() >= n),
            conditions
                .requires_state
                .as_ref()
                .map_or(true, |s| self.controlled_states.contains(s)),
        ];
        gates.iter().all(|&pass| pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Faction, PlayerState};

    #[test]
    fn test_for_player() {
        let p1 = PlayerState::new(PlayerId::P1, Faction::Truth).with_ip(12).with_states(["CA"]);
        let p2 = PlayerState::new(PlayerId::P2, Faction::Government);
        let state = GameState::new(p1, p2).with_truth(61);

        let ctx = SelectionContext::current(&state);
        assert_eq!(ctx.faction, EventFaction::Truth);
        assert_eq!(ctx.ip, 12);
        assert_eq!(ctx.truth, 61);
        assert_eq!(ctx.controlled_states, vec![StateId::from("CA")]);
    }

    #[test]
    fn test_gates() {
        let ctx = SelectionContext {
            faction: EventFaction::Truth,
            truth: 40,
            ip: 8,
            controlled_states: vec![StateId::from("TX")],
        };

        assert!(ctx.satisfies(&EventConditions::default(), 1));
        assert!(!ctx.satisfies(
            &EventConditions {
                min_turn: Some(3),
                ..EventConditions::default()
            },
            2
        ));
        assert!(ctx.satisfies(
            &EventConditions {
                truth_below: Some(40),
                ip_above: Some(8),
                requires_state: Some(StateId::from("TX")),
                ..EventConditions::default()
            },
            2
        ));
        assert!(!ctx.satisfies(
            &EventConditions {
                controlled_states: Some(2),
                ..EventConditions::default()
            },
            9
        ));
    }
}
