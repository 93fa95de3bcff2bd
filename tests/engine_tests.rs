//! Turn engine tests.
//!
//! These tests drive whole turns through `TurnEngine`:
//! - ATTACK damage floors and random discards
//! - MEDIA clamping and sign override
//! - ZONE pressure and capture
//! - Play limit, discard settlement and win order

use proptest::prelude::*;
use shadow_rules::audit::{AuditLevel, StateAuditor};
use shadow_rules::cards::{Card, Rarity};
use shadow_rules::core::{
    EngineConfig, Faction, GameState, PlayStage, PlayerId, PlayerPair, PlayerState, ScriptedRng, StateId,
};
use shadow_rules::rules::{PlayBlock, PlayError, ResolveOptions, TruthSign, TurnEngine, WinReason};

fn match_state(p1_hand: Vec<Card>, p1_ip: u32, p2_ip: u32) -> GameState {
    let p1 = PlayerState::new(PlayerId::P1, Faction::Truth)
        .with_hand(p1_hand)
        .with_ip(p1_ip);
    let p2 = PlayerState::new(PlayerId::P2, Faction::Government).with_ip(p2_ip);
    GameState::new(p1, p2)
        .with_tracked_state("CA", 4)
        .with_tracked_state("NV", 2)
        .with_tracked_state("TX", 5)
}

/// Damage larger than the opponent's IP floors at zero.
#[test]
fn test_attack_damage_floors_at_zero() {
    let engine = TurnEngine::default();
    let state = match_state(vec![Card::attack("hit", Faction::Truth, Rarity::Common, 3, 0)], 10, 2);

    let next = engine
        .play_card(&state, "hit", None, &mut ScriptedRng::constant(0.0))
        .unwrap();

    assert_eq!(next.player(PlayerId::P2).ip, 0);
    assert_eq!(next.player(PlayerId::P1).ip, 8);
    assert!(next.log.iter().any(|line| line == "P2 loses 2 IP (2 → 0)"));
}

/// ATTACK discards pick from the opponent's hand with the injected RNG.
#[test]
fn test_attack_discards_are_scripted() {
    let engine = TurnEngine::default();
    let mut state = match_state(vec![Card::attack("hit", Faction::Truth, Rarity::Rare, 1, 2)], 10, 5);
    state.player_mut(PlayerId::P2).hand = ["a", "b", "c"]
        .iter()
        .map(|id| Card::media(id, Faction::Government, Rarity::Common, 1))
        .collect();

    // 0.9 * 3 → index 2 ("c"), then 0.0 * 2 → index 0 ("a")
    let next = engine
        .play_card(&state, "hit", None, &mut ScriptedRng::new(vec![0.9, 0.0]))
        .unwrap();

    let p2 = next.player(PlayerId::P2);
    let hand: Vec<_> = p2.hand.iter().map(|c| c.id.as_str()).collect();
    let discard: Vec<_> = p2.discard.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(hand, vec!["b"]);
    assert_eq!(discard, vec!["c", "a"]);
}

/// A short hand discards as many cards as it has.
#[test]
fn test_attack_discard_short_hand() {
    let engine = TurnEngine::default();
    let mut state = match_state(vec![Card::attack("hit", Faction::Truth, Rarity::Common, 1, 2)], 10, 5);
    state.player_mut(PlayerId::P2).hand = vec![Card::media("only", Faction::Government, Rarity::Common, 1)].into();

    let next = engine
        .play_card(&state, "hit", None, &mut ScriptedRng::constant(0.5))
        .unwrap();

    assert!(next.player(PlayerId::P2).hand.is_empty());
    let metadata = next.turn_plays.last().and_then(|p| p.metadata.clone()).unwrap();
    assert_eq!(metadata.discarded, Some(1));
}

/// MEDIA shifts clamp to the meter.
#[test]
fn test_media_clamps_to_meter() {
    let engine = TurnEngine::default();
    let state = match_state(vec![Card::media("m", Faction::Truth, Rarity::Common, 10)], 10, 0).with_truth(98);

    let next = engine
        .play_card(&state, "m", None, &mut ScriptedRng::constant(0.0))
        .unwrap();

    assert_eq!(next.truth, 100);
    let metadata = next.turn_plays.last().and_then(|p| p.metadata.clone()).unwrap();
    assert_eq!(metadata.truth, Some(2));
}

/// Government plays lower the meter; the override flips it.
#[test]
fn test_media_sign_by_faction_and_override() {
    let engine = TurnEngine::default();
    let card = Card::media("m", Faction::Government, Rarity::Common, 5);
    let state = match_state(vec![], 0, 0);

    let lowered = engine
        .resolve(&state, PlayerId::P2, &card, None, &mut ScriptedRng::constant(0.0))
        .unwrap();
    assert_eq!(lowered.truth, 45);

    let options = ResolveOptions {
        truth_sign: Some(TruthSign::Raise),
    };
    let raised = engine
        .resolve_with(&state, PlayerId::P2, &card, None, &options, &mut ScriptedRng::constant(0.0))
        .unwrap();
    assert_eq!(raised.truth, 55);
}

/// Reaching defense captures the state and resets both pressures.
#[test]
fn test_zone_capture_moves_ownership() {
    let engine = TurnEngine::default();
    let mut state = match_state(vec![Card::zone("z", Faction::Truth, Rarity::Common, 3)], 10, 0);
    state.player_mut(PlayerId::P2).states.insert(StateId::from("NV"));
    state
        .pressure_by_state
        .insert(StateId::from("NV"), PlayerPair::new(0, 1));

    let next = engine
        .play_card(&state, "z", Some("NV"), &mut ScriptedRng::constant(0.0))
        .unwrap();

    assert!(next.player(PlayerId::P1).controls("NV"));
    assert!(!next.player(PlayerId::P2).controls("NV"));
    assert_eq!(next.pressure("NV", PlayerId::P1), 0);
    assert_eq!(next.pressure("NV", PlayerId::P2), 0);
    assert_eq!(next.owner_of("NV"), Some(PlayerId::P1));

    let resolve = next.turn_plays.last().unwrap();
    assert_eq!(resolve.stage, PlayStage::Resolve);
    assert_eq!(resolve.captured().collect::<Vec<_>>(), vec![&StateId::from("NV")]);
}

/// Partial pressure on a rival's state leaves ownership alone and still
/// audits clean.
#[test]
fn test_zone_contests_opponent_state() {
    let engine = TurnEngine::default();
    let card = Card::zone("z", Faction::Truth, Rarity::Common, 3);
    let mut state = match_state(vec![card.clone()], 10, 0);
    state.player_mut(PlayerId::P2).states.insert(StateId::from("TX"));

    assert_eq!(engine.can_play(&state, &card, Some("TX")), Ok(()));
    let next = engine
        .play_card(&state, "z", Some("TX"), &mut ScriptedRng::constant(0.0))
        .unwrap();

    assert_eq!(next.owner_of("TX"), Some(PlayerId::P2));
    assert_eq!(next.pressure("TX", PlayerId::P1), 3);
    assert_eq!(next.pressure("TX", PlayerId::P2), 0);
    assert!(next.turn_plays.last().unwrap().captured().next().is_none());

    let settled = engine.end_turn(&next, &[]);
    let findings = StateAuditor::default().audit(&settled).unwrap();
    assert!(findings.iter().any(|f| f.level == AuditLevel::Warning
        && f.message == "Controlled state 'TX' is contested: P1 holds 3 pressure"));
}

/// Pressure below defense accumulates without a capture.
#[test]
fn test_zone_pressure_accumulates() {
    let engine = TurnEngine::default();
    let hand = vec![
        Card::zone("z1", Faction::Truth, Rarity::Common, 3),
        Card::zone("z2", Faction::Truth, Rarity::Common, 3),
    ];
    let state = match_state(hand, 20, 0);
    let mut rng = ScriptedRng::constant(0.0);

    let once = engine.play_card(&state, "z1", Some("TX"), &mut rng).unwrap();
    assert_eq!(once.pressure("TX", PlayerId::P1), 3);
    assert!(!once.player(PlayerId::P1).controls("TX"));

    let twice = engine.play_card(&once, "z2", Some("TX"), &mut rng).unwrap();
    assert_eq!(twice.pressure("TX", PlayerId::P1), 0);
    assert!(twice.player(PlayerId::P1).controls("TX"));
}

/// ZONE pre-checks name the missing or bad target.
#[test]
fn test_zone_target_checks() {
    let engine = TurnEngine::default();
    let card = Card::zone("z", Faction::Truth, Rarity::Common, 2);
    let mut state = match_state(vec![card.clone()], 10, 0);
    state.player_mut(PlayerId::P1).states.insert(StateId::from("CA"));

    assert_eq!(engine.can_play(&state, &card, None), Err(PlayBlock::MissingTarget));
    assert_eq!(engine.can_play(&state, &card, Some("Atlantis")), Err(PlayBlock::InvalidTarget));
    assert_eq!(engine.can_play(&state, &card, Some("CA")), Err(PlayBlock::InvalidTarget));
    assert_eq!(engine.can_play(&state, &card, Some("TX")), Ok(()));
}

/// Resolving a ZONE card directly reports unknown states.
#[test]
fn test_resolve_zone_unknown_state() {
    let engine = TurnEngine::default();
    let card = Card::zone("z", Faction::Truth, Rarity::Common, 2);
    let state = match_state(vec![], 10, 0);
    let mut rng = ScriptedRng::constant(0.0);

    let err = engine
        .resolve(&state, PlayerId::P1, &card, Some("Atlantis"), &mut rng)
        .unwrap_err();
    assert_eq!(err, PlayError::UnknownState(StateId::from("Atlantis")));
    assert_eq!(
        engine.resolve(&state, PlayerId::P1, &card, None, &mut rng).unwrap_err(),
        PlayError::MissingTarget
    );
}

/// Playing a card that is not in hand is an error, not a no-op.
#[test]
fn test_card_not_in_hand() {
    let engine = TurnEngine::default();
    let state = match_state(vec![], 10, 0);

    let err = engine
        .play_card(&state, "ghost", None, &mut ScriptedRng::constant(0.0))
        .unwrap_err();
    assert!(matches!(err, PlayError::CardNotInHand { ref card_id } if card_id.as_str() == "ghost"));
}

/// Insufficient IP blocks the play and leaves the state alone.
#[test]
fn test_insufficient_ip() {
    let engine = TurnEngine::default();
    let state = match_state(vec![Card::zone("z", Faction::Truth, Rarity::Legendary, 2)], 6, 0);

    let err = engine
        .play_card(&state, "z", Some("TX"), &mut ScriptedRng::constant(0.0))
        .unwrap_err();
    assert_eq!(err, PlayError::Blocked(PlayBlock::InsufficientIp));
    assert_eq!(state.player(PlayerId::P1).hand.len(), 1);
}

/// The fourth play of a turn is blocked.
#[test]
fn test_play_limit() {
    let engine = TurnEngine::default();
    let hand: Vec<Card> = (0..4)
        .map(|i| Card::media(&format!("m{i}"), Faction::Truth, Rarity::Common, 1))
        .collect();
    let mut state = match_state(hand, 50, 0);
    let mut rng = ScriptedRng::constant(0.0);

    for i in 0..3 {
        state = engine.play_card(&state, &format!("m{i}"), None, &mut rng).unwrap();
    }
    assert_eq!(state.plays_this_turn, 3);

    let err = engine.play_card(&state, "m3", None, &mut rng).unwrap_err();
    assert_eq!(err, PlayError::Blocked(PlayBlock::PlayLimit));

    let next_turn = engine.start_turn(&engine.end_turn(&engine.end_turn(&state, &[]), &[]));
    assert_eq!(next_turn.plays_this_turn, 0);
    assert!(next_turn.turn_plays.is_empty());
}

/// First discard is free, the second costs one IP.
#[test]
fn test_end_turn_discard_cost() {
    let engine = TurnEngine::default();
    let hand = vec![
        Card::media("a", Faction::Truth, Rarity::Common, 1),
        Card::media("b", Faction::Truth, Rarity::Common, 1),
        Card::media("c", Faction::Truth, Rarity::Common, 1),
    ];
    let state = match_state(hand, 5, 0);

    let outcome = engine.end_turn_with_summary(&state, &["a", "b", "missing"]);

    assert_eq!(outcome.state.player(PlayerId::P1).ip, 4);
    assert_eq!(outcome.state.player(PlayerId::P1).hand.len(), 1);
    assert_eq!(outcome.summary.discard.requested, 3);
    assert_eq!(outcome.summary.discard.discarded, 2);
    assert_eq!(outcome.summary.discard.extra_cost, 1);
    assert_eq!(outcome.summary.log_entries, vec!["Discarded 2 cards (paid 1 IP)".to_string()]);
    assert_eq!(outcome.state.current_player, PlayerId::P2);
    assert_eq!(outcome.state.turn, 2);
}

/// Discard cost never takes IP below zero.
#[test]
fn test_end_turn_discard_cost_floors() {
    let engine = TurnEngine::default();
    let hand: Vec<Card> = ["a", "b", "c", "d"]
        .iter()
        .map(|id| Card::media(id, Faction::Truth, Rarity::Common, 1))
        .collect();
    let state = match_state(hand, 1, 0);

    let next = engine.end_turn(&state, &["a", "b", "c", "d"]);
    assert_eq!(next.player(PlayerId::P1).ip, 0);
}

/// Income counts controlled states; the draw stops at hand size.
#[test]
fn test_start_turn_income_and_draw() {
    let engine = TurnEngine::default();
    let deck: Vec<Card> = (0..8)
        .map(|i| Card::media(&format!("d{i}"), Faction::Truth, Rarity::Common, 1))
        .collect();
    let p1 = PlayerState::new(PlayerId::P1, Faction::Truth)
        .with_deck(deck)
        .with_states(["CA", "NV"]);
    let p2 = PlayerState::new(PlayerId::P2, Faction::Government);
    let state = GameState::new(p1, p2).with_tracked_state("CA", 4).with_tracked_state("NV", 2);

    let next = engine.start_turn(&state);

    let seat = next.player(PlayerId::P1);
    assert_eq!(seat.ip, 7);
    assert_eq!(seat.hand.len(), 5);
    assert_eq!(seat.deck.len(), 3);
    assert_eq!(next.log.last().map(String::as_str), Some("P1 income +7 IP (base 5; states 2)"));
}

/// Ten states win for their controller regardless of truth and IP.
#[test]
fn test_win_by_states() {
    let engine = TurnEngine::default();
    let ids: Vec<String> = (0..10).map(|i| format!("S{i}")).collect();
    let p1 = PlayerState::new(PlayerId::P1, Faction::Truth).with_states(ids.iter().map(String::as_str));
    let p2 = PlayerState::new(PlayerId::P2, Faction::Government).with_ip(150);
    let state = GameState::new(p1, p2);

    let win = engine.win_check(&state).unwrap();
    assert_eq!(win.winner, PlayerId::P1);
    assert_eq!(win.reason, WinReason::States);
}

/// Truth extremes go to the matching faction's seat.
#[test]
fn test_win_by_truth_follows_faction() {
    let engine = TurnEngine::default();
    let p1 = PlayerState::new(PlayerId::P1, Faction::Government);
    let p2 = PlayerState::new(PlayerId::P2, Faction::Truth);
    let state = GameState::new(p1, p2);

    let high = engine.win_check(&state.clone().with_truth(90)).unwrap();
    assert_eq!((high.winner, high.reason), (PlayerId::P2, WinReason::Truth));

    let low = engine.win_check(&state.clone().with_truth(10)).unwrap();
    assert_eq!((low.winner, low.reason), (PlayerId::P1, WinReason::Truth));

    assert!(engine.win_check(&state.with_truth(50)).is_none());
}

/// The end-of-turn summary reports a win found before the handoff.
#[test]
fn test_end_turn_reports_ip_win() {
    let engine = TurnEngine::new(EngineConfig {
        ip_to_win: 20,
        ..EngineConfig::default()
    });
    let state = match_state(vec![], 25, 0);

    let outcome = engine.end_turn_with_summary(&state, &[]);
    let win = outcome.summary.win.unwrap();
    assert_eq!((win.winner, win.reason), (PlayerId::P1, WinReason::Ip));
}

/// Transitions never touch their input snapshot.
#[test]
fn test_transitions_leave_input_untouched() {
    let engine = TurnEngine::default();
    let state = match_state(vec![Card::media("m", Faction::Truth, Rarity::Common, 4)], 10, 0);
    let before = state.clone();

    let _ = engine.play_card(&state, "m", None, &mut ScriptedRng::constant(0.0)).unwrap();
    let _ = engine.end_turn(&state, &["m"]);
    let _ = engine.start_turn(&state);

    assert_eq!(state, before);
}

proptest! {
    #[test]
    fn test_attack_never_negative(ip in 0u32..40, damage in 1u32..10) {
        let engine = TurnEngine::default();
        let state = match_state(vec![Card::attack("hit", Faction::Truth, Rarity::Common, damage, 0)], 10, ip);

        let next = engine.play_card(&state, "hit", None, &mut ScriptedRng::constant(0.0)).unwrap();
        prop_assert_eq!(next.player(PlayerId::P2).ip, ip.saturating_sub(damage));
    }

    #[test]
    fn test_media_stays_in_bounds(truth in 0i32..=100, delta in -100i32..=100, government in any::<bool>()) {
        let engine = TurnEngine::default();
        let faction = if government { Faction::Government } else { Faction::Truth };
        let card = Card::media("m", faction, Rarity::Common, delta);
        let state = match_state(vec![], 0, 0).with_truth(truth);

        let next = engine.resolve(&state, PlayerId::P1, &card, None, &mut ScriptedRng::constant(0.0)).unwrap();
        prop_assert!((0..=100).contains(&next.truth));
    }

    #[test]
    fn test_play_limit_holds(attempts in 0usize..8) {
        let engine = TurnEngine::default();
        let hand: Vec<Card> = (0..attempts)
            .map(|i| Card::media(&format!("m{i}"), Faction::Truth, Rarity::Common, 1))
            .collect();
        let mut state = match_state(hand, 100, 0);
        let mut rng = ScriptedRng::constant(0.0);

        for i in 0..attempts {
            if let Ok(next) = engine.play_card(&state, &format!("m{i}"), None, &mut rng) {
                state = next;
            }
            prop_assert!(state.plays_this_turn <= 3);
        }
        prop_assert_eq!(usize::from(state.plays_this_turn), attempts.min(3));
    }
}
