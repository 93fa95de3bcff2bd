//! Turn engine: pure transitions over `GameState`.
//!
//! A turn is `start_turn` (income, draw), up to `max_plays_per_turn` calls
//! to `play_card`, then `end_turn` (discard settlement, handoff). Every
//! transition borrows the input snapshot and returns a new one.
//!
//! ## Failure
//!
//! `can_play` reports a `PlayBlock` code and is the expected pre-check.
//! `play_card` and `resolve` return `PlayError` when called for an illegal
//! play; they never silently do nothing.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info};

use super::error::{PlayBlock, PlayError};
use crate::cards::{AttackEffects, Card, CardEffects, MediaEffects, ZoneEffects};
use crate::core::{
    EngineConfig, Faction, GameState, PlayMetadata, PlayStage, PlayerId, PlayerPair, RandomSource, StateId,
    TurnPlay,
};

/// Why a match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinReason {
    States,
    Truth,
    Ip,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinResult {
    pub winner: PlayerId,
    pub reason: WinReason,
}

/// Direction of a MEDIA truth shift.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TruthSign {
    Raise,
    Lower,
}

impl TruthSign {
    /// Truth players raise the meter, government players lower it.
    #[must_use]
    pub const fn for_faction(faction: Faction) -> Self {
        match faction {
            Faction::Truth => TruthSign::Raise,
            Faction::Government => TruthSign::Lower,
        }
    }

    const fn apply(self, delta: i32) -> i64 {
        match self {
            TruthSign::Raise => delta as i64,
            TruthSign::Lower => -(delta as i64),
        }
    }
}

/// Knobs for a single resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Overrides the faction-derived MEDIA sign.
    pub truth_sign: Option<TruthSign>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscardSummary {
    /// Ids the caller asked to discard.
    pub requested: usize,
    /// Cards actually moved to the discard pile.
    pub discarded: usize,
    /// IP paid for discards beyond the free allowance.
    pub extra_cost: u32,
}

/// What happened during the turn that just ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndTurnSummary {
    pub player: PlayerId,
    pub turn: u32,
    pub discard: DiscardSummary,
    /// States the ending player captured this turn, in play order.
    pub captures: Vec<StateId>,
    /// Lines `end_turn` appended to the log.
    pub log_entries: Vec<String>,
    /// Win evaluated before the handoff.
    pub win: Option<WinResult>,
}

#[derive(Clone, Debug)]
pub struct TurnOutcome {
    pub state: GameState,
    pub summary: EndTurnSummary,
}

/// Rules for one match.
#[derive(Clone, Debug, Default)]
pub struct TurnEngine {
    config: EngineConfig,
}

impl TurnEngine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Pay income to the current player and refill their hand.
    #[must_use]
    pub fn start_turn(&self, state: &GameState) -> GameState {
        let mut next = state.clone();
        let current = next.current_player;
        let owned = next.player(current).states.len() as u32;
        let income = self.config.base_income + owned;

        let hand_size = self.config.hand_size;
        let player = next.player_mut(current);
        player.ip = player.ip.saturating_add(income);
        while player.hand.len() < hand_size {
            match player.deck.pop_front() {
                Some(card) => player.hand.push_back(card),
                None => break,
            }
        }
        let (ip, hand) = (player.ip, player.hand.len());

        let breakdown = if owned > 0 {
            format!("base {}; states {owned}", self.config.base_income)
        } else {
            format!("base {}", self.config.base_income)
        };
        next.push_log(format!("{current} income +{income} IP ({breakdown})"));
        next.plays_this_turn = 0;
        next.turn_plays.clear();

        debug!(player = %current, turn = next.turn, income, ip, hand, "turn started");
        next
    }

    /// Check whether the current player may play `card` now.
    pub fn can_play(&self, state: &GameState, card: &Card, target: Option<&str>) -> Result<(), PlayBlock> {
        if state.plays_this_turn >= self.config.max_plays_per_turn {
            return Err(PlayBlock::PlayLimit);
        }
        if state.current().ip < card.cost {
            return Err(PlayBlock::InsufficientIp);
        }
        if let CardEffects::Zone(_) = card.effects {
            let target = target.ok_or(PlayBlock::MissingTarget)?;
            if !state.is_tracked(target) || state.current().controls(target) {
                return Err(PlayBlock::InvalidTarget);
            }
        }
        Ok(())
    }

    /// Play a card from the current player's hand and resolve it.
    pub fn play_card(
        &self,
        state: &GameState,
        card_id: &str,
        target: Option<&str>,
        rng: &mut impl RandomSource,
    ) -> Result<GameState, PlayError> {
        self.play_card_with(state, card_id, target, &ResolveOptions::default(), rng)
    }

    /// `play_card` with explicit resolution options.
    pub fn play_card_with(
        &self,
        state: &GameState,
        card_id: &str,
        target: Option<&str>,
        options: &ResolveOptions,
        rng: &mut impl RandomSource,
    ) -> Result<GameState, PlayError> {
        let current = state.current_player;
        let position = state
            .current()
            .hand_position(card_id)
            .ok_or_else(|| PlayError::CardNotInHand {
                card_id: card_id.into(),
            })?;
        let card = state.current().hand[position].clone();
        self.can_play(state, &card, target)?;

        let mut next = state.clone();
        let target_id = target.map(StateId::from);
        let player = next.player_mut(current);
        player.hand.remove(position);
        player.discard.push_back(card.clone());
        player.ip -= card.cost;
        next.plays_this_turn += 1;

        let record = TurnPlay::new(next.next_play_sequence(), PlayStage::Play, current, &card, target_id.as_ref());
        next.turn_plays.push_back(record);

        debug!(player = %current, card = %card.id, cost = card.cost, state = ?target, "card played");
        self.resolve_with(&next, current, &card, target, options, rng)
    }

    /// Apply a card's effects for `owner`.
    pub fn resolve(
        &self,
        state: &GameState,
        owner: PlayerId,
        card: &Card,
        target: Option<&str>,
        rng: &mut impl RandomSource,
    ) -> Result<GameState, PlayError> {
        self.resolve_with(state, owner, card, target, &ResolveOptions::default(), rng)
    }

    /// `resolve` with explicit options.
    pub fn resolve_with(
        &self,
        state: &GameState,
        owner: PlayerId,
        card: &Card,
        target: Option<&str>,
        options: &ResolveOptions,
        rng: &mut impl RandomSource,
    ) -> Result<GameState, PlayError> {
        let mut next = state.clone();
        let metadata = match card.effects {
            CardEffects::Attack(effects) => self.resolve_attack(&mut next, owner, effects, rng),
            CardEffects::Media(effects) => {
                let sign = options
                    .truth_sign
                    .unwrap_or_else(|| TruthSign::for_faction(next.player(owner).faction));
                self.resolve_media(&mut next, effects, sign)
            }
            CardEffects::Zone(effects) => {
                let target = target.ok_or(PlayError::MissingTarget)?;
                self.resolve_zone(&mut next, owner, effects, target)?
            }
        };

        let target_id = target.map(StateId::from);
        let record = TurnPlay::new(next.next_play_sequence(), PlayStage::Resolve, owner, card, target_id.as_ref())
            .with_metadata(metadata);
        next.turn_plays.push_back(record);
        Ok(next)
    }

    fn resolve_attack(
        &self,
        state: &mut GameState,
        owner: PlayerId,
        effects: AttackEffects,
        rng: &mut impl RandomSource,
    ) -> PlayMetadata {
        let opponent = owner.opponent();
        let before = state.player(opponent).ip;
        let after = before.saturating_sub(effects.ip_delta.opponent);
        state.player_mut(opponent).ip = after;
        state.push_log(format!("{opponent} loses {} IP ({before} → {after})", before - after));

        let mut discarded = 0u32;
        let victim = state.player_mut(opponent);
        for _ in 0..effects.discard_opponent {
            if victim.hand.is_empty() {
                break;
            }
            let index = rng.index(victim.hand.len());
            let card = victim.hand.remove(index);
            victim.discard.push_back(card);
            discarded += 1;
        }

        debug!(player = %owner, damage = before - after, discarded, ip = after, "attack resolved");
        PlayMetadata {
            damage: Some(before - after),
            discarded: (effects.discard_opponent > 0).then_some(discarded),
            ..PlayMetadata::default()
        }
    }

    fn resolve_media(&self, state: &mut GameState, effects: MediaEffects, sign: TruthSign) -> PlayMetadata {
        let before = state.truth;
        let after = self.config.clamp_truth(i64::from(before) + sign.apply(effects.truth_delta));
        state.truth = after;
        let shift = after - before;
        state.push_log(format!("Truth {shift:+} ({before} → {after})"));

        debug!(truth = after, shift, "media resolved");
        PlayMetadata {
            truth: Some(shift),
            ..PlayMetadata::default()
        }
    }

    fn resolve_zone(
        &self,
        state: &mut GameState,
        owner: PlayerId,
        effects: ZoneEffects,
        target: &str,
    ) -> Result<PlayMetadata, PlayError> {
        let state_id = StateId::from(target);
        let Some(defense) = state.defense(target) else {
            return Err(PlayError::UnknownState(state_id));
        };
        if state.player(owner).controls(target) {
            return Err(PlayBlock::InvalidTarget.into());
        }

        let mut pressure = state.pressure_by_state.get(target).copied().unwrap_or_default();
        pressure[owner] = pressure[owner].saturating_add(effects.pressure_delta);
        let reached = pressure[owner];

        let mut captured = SmallVec::new();
        if reached >= defense {
            pressure = PlayerPair::default();
            state.player_mut(owner).states.insert(state_id.clone());
            state.player_mut(owner.opponent()).states.remove(&state_id);
            state.push_log(format!("{owner} captured {state_id}"));
            info!(player = %owner, state = %state_id, pressure = reached, defense, "state captured");
            captured.push(state_id.clone());
        } else {
            debug!(player = %owner, state = %state_id, pressure = reached, defense, "pressure added");
        }
        state.pressure_by_state.insert(state_id, pressure);

        Ok(PlayMetadata {
            pressure: Some(effects.pressure_delta),
            captured,
            ..PlayMetadata::default()
        })
    }

    /// Settle discards and pass the turn.
    #[must_use]
    pub fn end_turn(&self, state: &GameState, discards: &[&str]) -> GameState {
        self.end_turn_with_summary(state, discards).state
    }

    /// `end_turn`, also reporting what the turn did.
    ///
    /// Ids not in hand are ignored. A repeated id discards one more copy.
    #[must_use]
    pub fn end_turn_with_summary(&self, state: &GameState, discards: &[&str]) -> TurnOutcome {
        let mut next = state.clone();
        let current = next.current_player;
        let turn = next.turn;
        let mut log_entries = Vec::new();

        let captures: Vec<StateId> = next
            .turn_plays
            .iter()
            .filter(|p| p.stage == PlayStage::Resolve && p.owner == current)
            .flat_map(|p| p.captured().cloned())
            .collect();

        let mut pending: Vec<&str> = discards.to_vec();
        let player = next.player_mut(current);
        let mut kept = im::Vector::new();
        let mut discarded = 0usize;
        for card in player.hand.iter() {
            match pending.iter().position(|id| *id == card.id.as_str()) {
                Some(slot) => {
                    pending.swap_remove(slot);
                    player.discard.push_back(card.clone());
                    discarded += 1;
                }
                None => kept.push_back(card.clone()),
            }
        }
        player.hand = kept;

        let extra = (discarded as u32).saturating_sub(self.config.free_discards);
        let extra_cost = extra.saturating_mul(self.config.extra_discard_cost);
        let paid = player.ip.min(extra_cost);
        player.ip -= paid;

        let plural = if discarded == 1 { "" } else { "s" };
        let line = if extra_cost > 0 {
            format!("Discarded {discarded} card{plural} (paid {extra_cost} IP)")
        } else {
            format!("Discarded {discarded} card{plural}")
        };
        log_entries.push(line.clone());
        next.push_log(line);

        let win = self.win_check(&next);
        if let Some(result) = win {
            info!(winner = %result.winner, reason = ?result.reason, turn, "match decided");
        }

        next.current_player = current.opponent();
        next.turn += 1;
        next.plays_this_turn = 0;
        next.turn_plays.clear();

        debug!(player = %current, turn, discarded, extra_cost, next = %next.current_player, "turn ended");
        TurnOutcome {
            state: next,
            summary: EndTurnSummary {
                player: current,
                turn,
                discard: DiscardSummary {
                    requested: discards.len(),
                    discarded,
                    extra_cost,
                },
                captures,
                log_entries,
                win,
            },
        }
    }

    /// First satisfied condition wins: states, then truth, then IP.
    #[must_use]
    pub fn win_check(&self, state: &GameState) -> Option<WinResult> {
        let win = |winner, reason| Some(WinResult { winner, reason });

        for player in PlayerId::ALL {
            if state.player(player).states.len() >= self.config.states_to_win {
                return win(player, WinReason::States);
            }
        }

        if state.truth >= self.config.truth_win_high {
            if let Some(player) = state.seat_of(Faction::Truth) {
                return win(player, WinReason::Truth);
            }
        }
        if state.truth <= self.config.truth_win_low {
            if let Some(player) = state.seat_of(Faction::Government) {
                return win(player, WinReason::Truth);
            }
        }

        PlayerId::ALL
            .into_iter()
            .find(|&p| state.player(p).ip >= self.config.ip_to_win)
            .and_then(|p| win(p, WinReason::Ip))
    }
}
