//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores every card of a content set, repaired and
//! validated, and builds decks from card ids. Iteration follows insertion
//! order so decks built from the registry are reproducible.

use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::{debug, warn};

use super::definition::{Card, CardType};
use super::validator::CardValidator;
use crate::core::{CardId, ConfigError, Faction};

/// Errors from registering or looking up cards.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("card {0} already registered")]
    Duplicate(CardId),

    #[error("card {0} not found in registry")]
    Unknown(CardId),
}

/// Per-card findings from `CardRegistry::load_json`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadReport {
    pub loaded: usize,
    /// Cards that needed repair: (id, errors, changes).
    pub repaired: Vec<(CardId, Vec<String>, Vec<String>)>,
}

/// Registry of canonical cards.
///
/// ## Example
///
/// ```
/// use shadow_rules::cards::{Card, CardRegistry, Rarity};
/// use shadow_rules::core::Faction;
///
/// let mut registry = CardRegistry::new();
/// registry.register(Card::media("m-1", Faction::Truth, Rarity::Common, 2)).unwrap();
///
/// assert_eq!(registry.get("m-1").unwrap().cost, 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, Card>,
    order: Vec<CardId>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card. Fails if the id is already taken.
    pub fn register(&mut self, card: Card) -> Result<(), RegistryError> {
        if self.cards.contains_key(&card.id) {
            return Err(RegistryError::Duplicate(card.id));
        }
        self.order.push(card.id.clone());
        self.cards.insert(card.id.clone(), card);
        Ok(())
    }

    /// Load a JSON array of untrusted card records.
    ///
    /// Every record is repaired; a record whose id collides with an earlier
    /// one is renamed with a `-dup-N` suffix.
    pub fn load_json(&mut self, json: &str) -> Result<LoadReport, ConfigError> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Array(records) = value else {
            return Err(ConfigError::Invalid {
                field: "cards",
                reason: "expected a JSON array of card records".to_string(),
            });
        };

        let mut report = LoadReport::default();
        for raw in &records {
            let mut repaired = CardValidator::repair(raw);

            if self.cards.contains_key(&repaired.card.id) {
                let base = repaired.card.id.clone();
                let renamed = (2..)
                    .map(|n| CardId::new(format!("{base}-dup-{n}")))
                    .find(|candidate| !self.cards.contains_key(candidate))
                    .unwrap_or_else(|| base.clone());
                repaired.changes.push(format!("duplicate id {base} renamed to {renamed}"));
                repaired.card.id = renamed;
            }

            if !repaired.is_clean() {
                warn!(
                    card = %repaired.card.id,
                    errors = repaired.errors.len(),
                    changes = repaired.changes.len(),
                    "card repaired on load"
                );
                report.repaired.push((
                    repaired.card.id.clone(),
                    repaired.errors.clone(),
                    repaired.changes.clone(),
                ));
            }

            // Collisions were resolved above.
            if self.register(repaired.card).is_ok() {
                report.loaded += 1;
            }
        }

        debug!(loaded = report.loaded, repaired = report.repaired.len(), "card set loaded");
        Ok(report)
    }

    /// Get a card by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.get(id)
    }

    /// Check if a card id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.cards.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.order.iter().filter_map(|id| self.cards.get(id))
    }

    /// Cards of one faction, in insertion order.
    pub fn by_faction(&self, faction: Faction) -> impl Iterator<Item = &Card> {
        self.iter().filter(move |c| c.faction == faction)
    }

    /// Cards of one type, in insertion order.
    pub fn by_type(&self, card_type: CardType) -> impl Iterator<Item = &Card> {
        self.iter().filter(move |c| c.card_type() == card_type)
    }

    /// Build a deck (front = next draw) from card ids.
    pub fn deck<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> Result<Vec<Card>, RegistryError> {
        ids.into_iter()
            .map(|id| {
                self.cards
                    .get(id)
                    .cloned()
                    .ok_or_else(|| RegistryError::Unknown(CardId::from(id)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Rarity;

    #[test]
    fn test_register_and_get() {
        let mut registry = CardRegistry::new();
        registry.register(Card::attack("a", Faction::Truth, Rarity::Common, 2, 0)).unwrap();

        assert!(registry.get("a").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_is_rejected() {
        let mut registry = CardRegistry::new();
        registry.register(Card::attack("a", Faction::Truth, Rarity::Common, 2, 0)).unwrap();

        let err = registry.register(Card::media("a", Faction::Truth, Rarity::Common, 1)).unwrap_err();
        assert_eq!(err, RegistryError::Duplicate(CardId::from("a")));
    }

    #[test]
    fn test_load_json_repairs_and_renames() {
        let mut registry = CardRegistry::new();
        let report = registry
            .load_json(
                r#"[
                    {"id": "m1", "name": "Blog", "faction": "truth", "type": "MEDIA", "rarity": "common", "cost": 3, "effects": {"truthDelta": 2}},
                    {"id": "m1", "name": "Blog Again", "faction": "truth", "type": "MEDIA", "rarity": "common", "cost": 3, "effects": {"truthDelta": 2}},
                    {"id": "z1", "type": "zone", "effects": {"pressureDelta": 12}}
                ]"#,
            )
            .unwrap();

        assert_eq!(report.loaded, 3);
        assert_eq!(report.repaired.len(), 2);
        assert!(registry.contains("m1-dup-2"));
        assert_eq!(registry.get("z1").unwrap().cost, 4);
    }

    #[test]
    fn test_load_json_rejects_non_array() {
        let mut registry = CardRegistry::new();
        assert!(matches!(registry.load_json("{}"), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_iteration_order_and_filters() {
        let mut registry = CardRegistry::new();
        registry.register(Card::zone("z", Faction::Government, Rarity::Common, 2)).unwrap();
        registry.register(Card::media("m", Faction::Truth, Rarity::Common, 2)).unwrap();
        registry.register(Card::attack("a", Faction::Truth, Rarity::Common, 2, 0)).unwrap();

        let ids: Vec<_> = registry.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "m", "a"]);
        assert_eq!(registry.by_faction(Faction::Truth).count(), 2);
        assert_eq!(registry.by_type(CardType::Zone).count(), 1);
    }

    #[test]
    fn test_deck_building() {
        let mut registry = CardRegistry::new();
        registry.register(Card::media("m", Faction::Truth, Rarity::Common, 2)).unwrap();

        let deck = registry.deck(["m", "m"]).unwrap();
        assert_eq!(deck.len(), 2);

        let err = registry.deck(["m", "nope"]).unwrap_err();
        assert_eq!(err, RegistryError::Unknown(CardId::from("nope")));
    }
}
