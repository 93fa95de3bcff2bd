//! Rule and selector configuration.
//!
//! Hosts configure the engine at match start:
//! - `EngineConfig`: turn economy, hand size, win thresholds
//! - `SelectorConfig`: event chances and history windows
//!
//! Both deserialize from JSON with every field optional; missing fields
//! take the standard-rules defaults.

use serde::{Deserialize, Serialize};

/// Errors raised while loading configuration or content.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Turn-engine rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Card plays allowed between `start_turn` calls.
    pub max_plays_per_turn: u8,

    /// `start_turn` draws until the hand holds this many cards.
    pub hand_size: usize,

    /// Income before the per-state bonus.
    pub base_income: u32,

    /// Discards at end of turn that cost nothing.
    pub free_discards: u32,

    /// IP paid for each discard beyond the free ones.
    pub extra_discard_cost: u32,

    /// Controlled states needed for a territorial win.
    pub states_to_win: usize,

    /// Truth at or above this wins for the truth faction.
    pub truth_win_high: i32,

    /// Truth at or below this wins for the government faction.
    pub truth_win_low: i32,

    /// IP needed for an economic win.
    pub ip_to_win: u32,

    /// Truth meter lower bound.
    pub truth_min: i32,

    /// Truth meter upper bound.
    pub truth_max: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_plays_per_turn: 3,
            hand_size: 5,
            base_income: 5,
            free_discards: 1,
            extra_discard_cost: 1,
            states_to_win: 10,
            truth_win_high: 90,
            truth_win_low: 10,
            ip_to_win: 200,
            truth_min: 0,
            truth_max: 100,
        }
    }
}

impl EngineConfig {
    /// Parse from JSON and check the bounds are coherent.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings describe a playable game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.truth_min > self.truth_max {
            return Err(ConfigError::Invalid {
                field: "truthMin",
                reason: format!("{} exceeds truthMax {}", self.truth_min, self.truth_max),
            });
        }
        if self.truth_win_low >= self.truth_win_high {
            return Err(ConfigError::Invalid {
                field: "truthWinLow",
                reason: format!("{} must be below truthWinHigh {}", self.truth_win_low, self.truth_win_high),
            });
        }
        if self.max_plays_per_turn == 0 {
            return Err(ConfigError::Invalid {
                field: "maxPlaysPerTurn",
                reason: "at least one play per turn is required".to_string(),
            });
        }
        Ok(())
    }

    /// Clamp a truth value into the meter bounds.
    #[must_use]
    pub fn clamp_truth(&self, value: i64) -> i32 {
        value.clamp(i64::from(self.truth_min), i64::from(self.truth_max)) as i32
    }
}

/// Event selector tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectorConfig {
    /// Events among the last N global selections are not eligible.
    pub recent_exclusion: usize,

    /// Global history is trimmed once it grows past this length...
    pub history_trim_threshold: usize,

    /// ...down to this many most recent entries.
    pub history_trim_to: usize,

    /// Per-state capture history length.
    pub state_history_cap: usize,

    /// Base per-turn chance that a random event fires.
    pub base_event_chance: f64,

    /// Priority chance for hotspot-bearing events.
    pub hotspot_chance: f64,

    /// When an external hotspot director owns spawning, the priority hotspot
    /// roll is skipped.
    pub hotspot_director_enabled: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            recent_exclusion: 4,
            history_trim_threshold: 20,
            history_trim_to: 15,
            state_history_cap: 3,
            base_event_chance: 0.12,
            hotspot_chance: 0.20,
            hotspot_director_enabled: false,
        }
    }
}

impl SelectorConfig {
    /// Parse from JSON, clamping chances and checking history windows.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.normalized()
    }

    /// Clamp chances into `[0, 1]` and reject incoherent history windows.
    pub fn normalized(mut self) -> Result<Self, ConfigError> {
        self.base_event_chance = clamp_chance(self.base_event_chance);
        self.hotspot_chance = clamp_chance(self.hotspot_chance);
        if self.history_trim_to > self.history_trim_threshold {
            return Err(ConfigError::Invalid {
                field: "historyTrimTo",
                reason: format!(
                    "{} exceeds historyTrimThreshold {}",
                    self.history_trim_to, self.history_trim_threshold
                ),
            });
        }
        Ok(self)
    }

    /// Override the base event chance (clamped).
    #[must_use]
    pub fn with_event_chance(mut self, chance: f64) -> Self {
        self.base_event_chance = clamp_chance(chance);
        self
    }

    #[must_use]
    pub fn with_hotspot_director(mut self, enabled: bool) -> Self {
        self.hotspot_director_enabled = enabled;
        self
    }
}

fn clamp_chance(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
