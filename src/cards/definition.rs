//! Card definitions - the canonical, post-repair card shape.
//!
//! The JSON form is:
//!
//! ```json
//! {"id": "atk-1", "name": "Leak", "faction": "truth", "type": "ATTACK",
//!  "rarity": "common", "cost": 2, "effects": {"ipDelta": {"opponent": 3}}}
//! ```
//!
//! `type` and `effects` are one value in Rust: `CardEffects` is a tagged
//! union keyed by card type, so an ATTACK card cannot carry a truth delta.

use serde::{Deserialize, Serialize};

use super::cost::CostTable;
use crate::core::{CardId, Faction};

/// Card type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardType {
    Attack,
    Media,
    Zone,
}

impl CardType {
    pub const ALL: [CardType; 3] = [CardType::Attack, CardType::Media, CardType::Zone];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CardType::Attack => "ATTACK",
            CardType::Media => "MEDIA",
            CardType::Zone => "ZONE",
        }
    }

    /// Parse a type name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ATTACK" => Some(CardType::Attack),
            "MEDIA" => Some(CardType::Media),
            "ZONE" => Some(CardType::Zone),
            _ => None,
        }
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card rarity. Also used for event rarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [Rarity::Common, Rarity::Uncommon, Rarity::Rare, Rarity::Legendary];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Legendary => "legendary",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "common" => Some(Rarity::Common),
            "uncommon" => Some(Rarity::Uncommon),
            "rare" => Some(Rarity::Rare),
            "legendary" => Some(Rarity::Legendary),
            _ => None,
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// IP damage dealt by an ATTACK card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IpDelta {
    pub opponent: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackEffects {
    pub ip_delta: IpDelta,

    /// Cards discarded at random from the opponent's hand (0-2).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub discard_opponent: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaEffects {
    /// Magnitude of the truth shift; the sign comes from the acting faction.
    pub truth_delta: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneEffects {
    pub pressure_delta: u32,
}

/// Card effects, tagged by card type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "effects")]
pub enum CardEffects {
    #[serde(rename = "ATTACK")]
    Attack(AttackEffects),
    #[serde(rename = "MEDIA")]
    Media(MediaEffects),
    #[serde(rename = "ZONE")]
    Zone(ZoneEffects),
}

impl CardEffects {
    #[must_use]
    pub const fn card_type(&self) -> CardType {
        match self {
            CardEffects::Attack(_) => CardType::Attack,
            CardEffects::Media(_) => CardType::Media,
            CardEffects::Zone(_) => CardType::Zone,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetScope {
    State,
}

/// What a ZONE card must be aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetSpec {
    pub scope: TargetScope,
    pub count: u32,
}

impl TargetSpec {
    /// The only target ZONE cards use: one state.
    #[must_use]
    pub const fn single_state() -> Self {
        Self {
            scope: TargetScope::State,
            count: 1,
        }
    }
}

/// A playable card.
///
/// `cost` always equals `CostTable::cost(card_type, rarity)` for cards
/// produced by the validator or the constructors here.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub faction: Faction,
    pub rarity: Rarity,
    pub cost: u32,

    #[serde(flatten)]
    pub effects: CardEffects,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor_truth: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor_gov: Option<String>,
}

impl Card {
    /// Build a card with a derived cost and the default ZONE target.
    #[must_use]
    pub fn new(
        id: impl Into<CardId>,
        name: impl Into<String>,
        faction: Faction,
        rarity: Rarity,
        effects: CardEffects,
    ) -> Self {
        let card_type = effects.card_type();
        Self {
            id: id.into(),
            name: name.into(),
            faction,
            rarity,
            cost: CostTable::cost(card_type, rarity),
            effects,
            target: (card_type == CardType::Zone).then(TargetSpec::single_state),
            flavor: None,
            flavor_truth: None,
            flavor_gov: None,
        }
    }

    /// ATTACK card dealing `damage` IP.
    #[must_use]
    pub fn attack(id: &str, faction: Faction, rarity: Rarity, damage: u32, discard: u8) -> Self {
        Self::new(
            id,
            format!("Attack {id}"),
            faction,
            rarity,
            CardEffects::Attack(AttackEffects {
                ip_delta: IpDelta { opponent: damage },
                discard_opponent: discard,
            }),
        )
    }

    /// MEDIA card shifting truth by `truth_delta`.
    #[must_use]
    pub fn media(id: &str, faction: Faction, rarity: Rarity, truth_delta: i32) -> Self {
        Self::new(
            id,
            format!("Media {id}"),
            faction,
            rarity,
            CardEffects::Media(MediaEffects { truth_delta }),
        )
    }

    /// ZONE card adding `pressure` to one state.
    #[must_use]
    pub fn zone(id: &str, faction: Faction, rarity: Rarity, pressure: u32) -> Self {
        Self::new(
            id,
            format!("Zone {id}"),
            faction,
            rarity,
            CardEffects::Zone(ZoneEffects {
                pressure_delta: pressure,
            }),
        )
    }

    #[must_use]
    pub fn card_type(&self) -> CardType {
        self.effects.card_type()
    }

    #[must_use]
    pub fn with_flavor(mut self, flavor: impl Into<String>) -> Self {
        self.flavor = Some(flavor.into());
        self
    }
}

fn is_zero(value: &u8) -> bool {
    *value == 0
}
