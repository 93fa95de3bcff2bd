//! Host-side helper applying an event's deltas to a snapshot.

use tracing::debug;

use super::event::EventEffects;
use crate::core::{EngineConfig, GameState, PlayerId};

/// Apply `effects` on behalf of `player` under the standard bounds.
#[must_use]
pub fn apply_event_effects(state: &GameState, player: PlayerId, effects: &EventEffects) -> GameState {
    apply_event_effects_with(&EngineConfig::default(), state, player, effects)
}

/// Apply `effects` on behalf of `player`.
///
/// Truth is clamped to the meter, IP, pressure and defense floor at zero.
/// State pressure only lands on a tracked state `player` does not own.
/// `skip_turn` and `double_income` are flags for the host's turn loop and
/// leave the snapshot untouched.
#[must_use]
pub fn apply_event_effects_with(
    config: &EngineConfig,
    state: &GameState,
    player: PlayerId,
    effects: &EventEffects,
) -> GameState {
    let mut next = state.clone();
    next.truth = config.clamp_truth(i64::from(next.truth) + i64::from(effects.truth));

    let seat = next.player_mut(player);
    seat.ip = seat.ip.saturating_add_signed(effects.ip);
    for _ in 0..effects.card_draw {
        match seat.deck.pop_front() {
            Some(card) => seat.hand.push_back(card),
            None => break,
        }
    }

    if let Some(deltas) = &effects.state_effects {
        if let Some(state_id) = &deltas.state_id {
            let owned = next.player(player).controls(state_id.as_str());
            if let Some(pressure) = next.pressure_by_state.get_mut(state_id) {
                if !owned {
                    pressure[player] = pressure[player].saturating_add_signed(deltas.pressure);
                }
            }
            if let Some(defense) = next.state_defense.get_mut(state_id) {
                *defense = defense.saturating_add_signed(deltas.defense);
            }
        }
    }

    debug!(player = %player, truth = next.truth, ip = next.player(player).ip, "event effects applied");
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Rarity};
    use crate::core::{Faction, PlayerState, StateId};
    use crate::events::StateEffects;

    fn state() -> GameState {
        let p1 = PlayerState::new(PlayerId::P1, Faction::Truth)
            .with_ip(2)
            .with_states(["CA"])
            .with_deck([Card::media("d", Faction::Truth, Rarity::Common, 1)]);
        let p2 = PlayerState::new(PlayerId::P2, Faction::Government);
        GameState::new(p1, p2)
            .with_tracked_state("CA", 4)
            .with_tracked_state("TX", 1)
            .with_truth(97)
    }

    #[test]
    fn test_clamps_and_floors() {
        let effects = EventEffects {
            truth: 10,
            ip: -5,
            card_draw: 3,
            ..EventEffects::default()
        };
        let next = apply_event_effects(&state(), PlayerId::P1, &effects);

        assert_eq!(next.truth, 100);
        assert_eq!(next.player(PlayerId::P1).ip, 0);
        assert_eq!(next.player(PlayerId::P1).hand.len(), 1);
    }

    #[test]
    fn test_no_pressure_on_owned_state() {
        let effects = EventEffects {
            state_effects: Some(StateEffects {
                state_id: Some(StateId::from("CA")),
                pressure: 3,
                defense: -9,
            }),
            ..EventEffects::default()
        };
        let next = apply_event_effects(&state(), PlayerId::P1, &effects);

        assert_eq!(next.pressure("CA", PlayerId::P1), 0);
        assert_eq!(next.defense("CA"), Some(0));
    }

    #[test]
    fn test_pressure_on_other_state() {
        let effects = EventEffects {
            state_effects: Some(StateEffects {
                state_id: Some(StateId::from("TX")),
                pressure: 2,
                defense: 1,
            }),
            ..EventEffects::default()
        };
        let next = apply_event_effects(&state(), PlayerId::P2, &effects);

        assert_eq!(next.pressure("TX", PlayerId::P2), 2);
        assert_eq!(next.defense("TX"), Some(2));
    }
}
