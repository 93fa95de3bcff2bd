//! One running match.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::SessionError;
use crate::audit::{Finding, StateAuditor};
use crate::core::{GameRng, GameRngState, GameState, PlayStage, PlayerId, StateId};
use crate::events::{apply_event_effects_with, EventFaction, EventSelector, SelectedEvent, SelectionContext, SelectorState};
use crate::rules::{EndTurnSummary, PlayError, TurnEngine, WinResult};

/// A captured state and the event it triggered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureNotice {
    pub state_id: StateId,
    pub event: SelectedEvent,
}

/// Result of `Match::play`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayOutcome {
    pub captures: Vec<CaptureNotice>,
}

/// Result of `Match::end_turn`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnReport {
    pub summary: EndTurnSummary,
    /// Random event rolled for the player whose turn just started.
    pub event: Option<SelectedEvent>,
    /// Audit findings for the handed-off state. Empty when turn auditing
    /// is off.
    pub findings: Vec<Finding>,
}

/// Owns every piece of mutable state for one session.
///
/// All methods take `&mut self`: a host running many sessions serializes
/// access per match (one task, actor or mutex each).
#[derive(Clone, Debug)]
pub struct Match {
    engine: TurnEngine,
    auditor: Option<StateAuditor>,
    selector: EventSelector,
    selector_state: SelectorState,
    rng: GameRng,
    event_rng: GameRng,
    state: GameState,
    winner: Option<WinResult>,
}

impl Match {
    pub(super) fn start(
        engine: TurnEngine,
        auditor: Option<StateAuditor>,
        selector: EventSelector,
        mut selector_state: SelectorState,
        rng: GameRng,
        state: GameState,
    ) -> Self {
        let seed = rng.seed();
        let event_rng = rng.for_context("events");
        let rng = rng.for_context("engine");
        let state = engine.start_turn(&state);
        selector_state.update_turn(state.turn);
        info!(seed, states = state.pressure_by_state.len(), "match started");
        Self {
            engine,
            auditor,
            selector,
            selector_state,
            rng,
            event_rng,
            state,
            winner: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn selector_state(&self) -> &SelectorState {
        &self.selector_state
    }

    #[must_use]
    pub fn engine(&self) -> &TurnEngine {
        &self.engine
    }

    #[must_use]
    pub fn winner(&self) -> Option<WinResult> {
        self.winner
    }

    /// Checkpoint of the card-play and event streams, in that order.
    #[must_use]
    pub fn rng_state(&self) -> (GameRngState, GameRngState) {
        (self.rng.state(), self.event_rng.state())
    }

    /// Resolve a state designation (id, FIPS code or name) to its id.
    fn resolve_target(&self, target: Option<&str>) -> Option<StateId> {
        target.map(|t| {
            self.selector
                .directory()
                .resolve_id(t)
                .unwrap_or_else(|| StateId::from(t))
        })
    }

    /// Pre-check a play by card id.
    pub fn can_play(&self, card_id: &str, target: Option<&str>) -> Result<(), SessionError> {
        self.ensure_running()?;
        let seat = self.state.current();
        let position = seat.hand_position(card_id).ok_or_else(|| PlayError::CardNotInHand {
            card_id: card_id.into(),
        })?;
        let target = self.resolve_target(target);
        self.engine
            .can_play(&self.state, &seat.hand[position], target.as_ref().map(StateId::as_str))
            .map_err(|block| SessionError::Play(block.into()))
    }

    /// Play a card for the current player.
    ///
    /// Each state the play captures gets a capture event from the selector.
    pub fn play(&mut self, card_id: &str, target: Option<&str>) -> Result<PlayOutcome, SessionError> {
        self.ensure_running()?;
        let target = self.resolve_target(target);
        let next = self.engine.play_card(
            &self.state,
            card_id,
            target.as_ref().map(StateId::as_str),
            &mut self.rng,
        )?;

        let player = next.current_player;
        let captured: Vec<StateId> = next
            .turn_plays
            .last()
            .filter(|record| record.stage == PlayStage::Resolve)
            .map(|record| record.captured().cloned().collect())
            .unwrap_or_default();
        self.state = next;

        let ctx = SelectionContext::for_player(&self.state, player);
        let faction = EventFaction::from(self.state.player(player).faction);
        let captures = captured
            .into_iter()
            .map(|state_id| {
                let event = self.selector.select_state_event(
                    &mut self.selector_state,
                    state_id.as_str(),
                    faction,
                    &ctx,
                    &mut self.event_rng,
                );
                debug!(state = %state_id, event = %event.id(), "capture event");
                CaptureNotice { state_id, event }
            })
            .collect();

        Ok(PlayOutcome { captures })
    }

    /// Apply a selected event's effects for `player`.
    pub fn apply_event(&mut self, player: PlayerId, event: &SelectedEvent) {
        if let Some(effects) = &event.event.effects {
            self.state = apply_event_effects_with(self.engine.config(), &self.state, player, effects);
        }
    }

    /// End the current turn and start the next one.
    ///
    /// With turn auditing on, the settled state is audited first and an
    /// `AuditError` leaves the match unchanged. When the turn decides the
    /// match the next turn is not started.
    pub fn end_turn(&mut self, discards: &[&str]) -> Result<TurnReport, SessionError> {
        self.ensure_running()?;
        let outcome = self.engine.end_turn_with_summary(&self.state, discards);
        let findings = match &self.auditor {
            Some(auditor) => auditor.audit(&outcome.state)?,
            None => Vec::new(),
        };

        if let Some(win) = outcome.summary.win {
            self.state = outcome.state;
            self.winner = Some(win);
            return Ok(TurnReport {
                summary: outcome.summary,
                event: None,
                findings,
            });
        }

        self.state = self.engine.start_turn(&outcome.state);
        self.selector_state.update_turn(self.state.turn);
        let ctx = SelectionContext::current(&self.state);
        let event = self
            .selector
            .maybe_select_random_event(&mut self.selector_state, &ctx, &mut self.event_rng);

        Ok(TurnReport {
            summary: outcome.summary,
            event,
            findings,
        })
    }

    fn ensure_running(&self) -> Result<(), SessionError> {
        match self.winner {
            Some(win) => Err(SessionError::MatchOver(win)),
            None => Ok(()),
        }
    }
}
