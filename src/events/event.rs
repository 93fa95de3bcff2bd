//! Event content model.
//!
//! Events are authored as JSON and read-only once loaded. Every field a
//! catalog may omit is an `Option` or defaults to empty.

use serde::{Deserialize, Serialize};

use crate::cards::Rarity;
use crate::core::{EventId, Faction, StateId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Conspiracy,
    Government,
    Truth,
    Random,
    Crisis,
    Opportunity,
    Capture,
}

/// Who an event is for. `Neutral` events reach either side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventFaction {
    Truth,
    Government,
    Neutral,
}

impl EventFaction {
    /// Whether content tagged `self` may be shown to `faction`.
    #[must_use]
    pub fn admits(self, faction: EventFaction) -> bool {
        self == EventFaction::Neutral || self == faction
    }
}

impl From<Faction> for EventFaction {
    fn from(faction: Faction) -> Self {
        match faction {
            Faction::Truth => EventFaction::Truth,
            Faction::Government => EventFaction::Government,
        }
    }
}

/// Eligibility gates. Absent gates always pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventConditions {
    pub min_turn: Option<u32>,
    pub max_turn: Option<u32>,
    pub truth_above: Option<i32>,
    pub truth_below: Option<i32>,
    pub ip_above: Option<u32>,
    pub ip_below: Option<u32>,
    /// Minimum number of controlled states.
    pub controlled_states: Option<usize>,
    pub requires_state: Option<StateId>,
    /// Capture events only: which side's capture this follows.
    pub captured_by: Option<EventFaction>,
}

/// Pressure and defense deltas for one state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateEffects {
    /// Defaults to the captured state for capture events.
    pub state_id: Option<StateId>,
    pub pressure: i32,
    pub defense: i32,
}

/// Deltas an event applies. Applying them is up to the host.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventEffects {
    pub truth: i32,
    pub ip: i32,
    pub card_draw: u32,
    pub state_effects: Option<StateEffects>,
    pub skip_turn: bool,
    pub double_income: bool,
}

/// Temporary location-bound modifier spawned by an event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotPayload {
    pub label: String,
    /// Turns the hotspot stays active.
    pub duration: u32,
    /// Extra truth for capturing the hotspot state.
    pub truth_reward: i32,
    pub defense_boost: u32,
}

/// Link into a multi-chapter story arc.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRef {
    pub arc_id: String,
    pub chapter: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub kind: EventType,
    /// `None` behaves like `Neutral`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction: Option<EventFaction>,
    pub rarity: Rarity,
    /// Relative selection weight, strictly positive.
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<EventConditions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<EventEffects>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<CampaignRef>,
    #[serde(default, alias = "paranormalHotspot", skip_serializing_if = "Option::is_none")]
    pub hotspot: Option<HotspotPayload>,
}

impl Event {
    #[must_use]
    pub fn new(id: impl Into<EventId>, title: impl Into<String>, kind: EventType, weight: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            headline: None,
            content: None,
            kind,
            faction: None,
            rarity: Rarity::Common,
            weight,
            conditions: None,
            effects: None,
            campaign: None,
            hotspot: None,
        }
    }

    #[must_use]
    pub fn with_faction(mut self, faction: EventFaction) -> Self {
        self.faction = Some(faction);
        self
    }

    #[must_use]
    pub fn with_conditions(mut self, conditions: EventConditions) -> Self {
        self.conditions = Some(conditions);
        self
    }

    #[must_use]
    pub fn with_effects(mut self, effects: EventEffects) -> Self {
        self.effects = Some(effects);
        self
    }

    #[must_use]
    pub fn with_hotspot(mut self, hotspot: HotspotPayload) -> Self {
        self.hotspot = Some(hotspot);
        self
    }

    /// Capture event following a capture by `faction`.
    #[must_use]
    pub fn capture(id: impl Into<EventId>, title: impl Into<String>, faction: EventFaction, weight: f64) -> Self {
        Self::new(id, title, EventType::Capture, weight).with_conditions(EventConditions {
            captured_by: Some(faction),
            ..EventConditions::default()
        })
    }

    /// Whether this event may follow a capture by `faction`.
    /// Events without a `capturedBy` gate follow any capture.
    #[must_use]
    pub fn follows_capture_by(&self, faction: EventFaction) -> bool {
        match self.conditions.as_ref().and_then(|c| c.captured_by) {
            Some(required) => required == faction,
            None => true,
        }
    }

    #[must_use]
    pub fn is_hotspot(&self) -> bool {
        self.hotspot.is_some()
    }
}

/// An event picked by the selector with the odds it was picked at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedEvent {
    pub event: Event,
    /// `weight / total weight` of the pool it was drawn from.
    pub conditional_chance: f64,
    /// Gate probability times `conditional_chance`.
    pub trigger_chance: f64,
}

impl SelectedEvent {
    #[must_use]
    pub fn id(&self) -> &EventId {
        &self.event.id
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.event.id.as_str().starts_with(super::fallback::FALLBACK_PREFIX)
    }
}
