use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{EngineConfig, GameState, PlayerId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditLevel {
    Info,
    Warning,
}

/// Non-fatal observation from an audit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub level: AuditLevel,
    pub message: String,
}

impl Finding {
    fn info(message: impl Into<String>) -> Self {
        Self {
            level: AuditLevel::Info,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: AuditLevel::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            AuditLevel::Info => "info",
            AuditLevel::Warning => "warning",
        };
        write!(f, "[{level}] {}", self.message)
    }
}

/// First invariant violation found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("game state audit failed: {message}")]
pub struct AuditError {
    pub message: String,
}

fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<(), AuditError> {
    if condition {
        Ok(())
    } else {
        Err(AuditError { message: message() })
    }
}

/// Checks a snapshot against the bounds of an `EngineConfig`.
#[derive(Clone, Debug, Default)]
pub struct StateAuditor {
    config: EngineConfig,
}

impl StateAuditor {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Fail on the first broken invariant, else return findings.
    pub fn audit(&self, state: &GameState) -> Result<Vec<Finding>, AuditError> {
        let (min, max) = (self.config.truth_min, self.config.truth_max);
        ensure((min..=max).contains(&state.truth), || {
            format!("Truth value {} is outside {min}-{max}", state.truth)
        })?;
        ensure(state.plays_this_turn <= self.config.max_plays_per_turn, || {
            format!(
                "playsThisTurn {} exceeds the limit of {}",
                state.plays_this_turn, self.config.max_plays_per_turn
            )
        })?;

        let mut findings = Vec::with_capacity(4);
        for id in PlayerId::ALL {
            self.audit_player(state, id, &mut findings)?;
        }

        let p1 = &state.player(PlayerId::P1).states;
        let p2 = &state.player(PlayerId::P2).states;
        let overlap: Vec<&str> = p1.iter().filter(|s| p2.contains(*s)).map(|s| s.as_str()).collect();
        ensure(overlap.is_empty(), || {
            format!("States cannot be controlled by both players: {}", overlap.join(", "))
        })?;

        for state_id in state.pressure_by_state.keys() {
            if !state.state_defense.contains_key(state_id) {
                findings.push(Finding::warning(format!("State '{state_id}' has pressure but no defense value")));
            }
        }

        findings.push(Finding::info(format!(
            "Turn {} audit completed (truth={})",
            state.turn, state.truth
        )));
        Ok(findings)
    }

    fn audit_player(&self, state: &GameState, id: PlayerId, findings: &mut Vec<Finding>) -> Result<(), AuditError> {
        let player = state.player(id);
        ensure(player.id == id, || format!("Player {id} has mismatched id '{}'", player.id))?;

        let rival = id.opponent();
        let mut contested = Vec::new();

        for state_id in player.states.iter() {
            ensure(!state_id.as_str().trim().is_empty(), || format!("Player {id} has blank state entry"))?;

            let pressure = state.pressure_by_state.get(state_id);
            ensure(pressure.is_some(), || {
                format!("Missing pressure entry for state '{state_id}' controlled by {id}")
            })?;
            if let Some(pressure) = pressure {
                ensure(pressure[id] == 0, || {
                    format!("Controlled state '{state_id}' must have zero pressure for {id}")
                })?;
                // Legal: the rival is partway to a capture.
                if pressure[rival] > 0 {
                    contested.push((state_id, pressure[rival]));
                }
            }
            ensure(state.state_defense.contains_key(state_id), || {
                format!("Missing defense value for controlled state '{state_id}'")
            })?;
        }

        let count = player.states.len();
        let plural = if count == 1 { "" } else { "s" };
        findings.push(Finding::info(format!(
            "Player {id} controls {count} state{plural} with {} IP",
            player.ip
        )));
        findings.extend(contested.into_iter().map(|(state_id, pressure)| {
            Finding::warning(format!(
                "Controlled state '{state_id}' is contested: {rival} holds {pressure} pressure"
            ))
        }));
        Ok(())
    }
}
