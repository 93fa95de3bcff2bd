//! Card repair and validation.
//!
//! Content arrives as untrusted JSON. `CardValidator::repair` turns any
//! value into a usable `Card`, never failing: missing or broken fields get
//! safe defaults, and every adjustment is reported.
//!
//! - `changes`: coercions that kept the author's intent (trimmed strings,
//!   numeric strings, legacy shapes, clamped ranges, recomputed cost).
//! - `errors`: values that were semantically broken and had to be replaced.
//!
//! `CardValidator::validate` is the strict counterpart for cards built in
//! code: it reports problems and changes nothing.

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::hash::{Hash, Hasher};

use super::cost::CostTable;
use super::definition::{
    AttackEffects, Card, CardEffects, CardType, IpDelta, MediaEffects, Rarity, TargetScope, TargetSpec,
    ZoneEffects,
};
use crate::core::{CardId, Faction};

pub const DEFAULT_NAME: &str = "Unnamed Card";

/// Damage and pressure both live in this range after repair.
const EFFECT_RANGE: (i64, i64) = (1, 9);
const MAX_DISCARD: i64 = 2;

const CARD_KEYS: [&str; 11] = [
    "id",
    "name",
    "faction",
    "type",
    "rarity",
    "cost",
    "effects",
    "target",
    "flavor",
    "flavorTruth",
    "flavorGov",
];

/// Outcome of repairing one record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepairReport {
    pub card: Card,
    pub errors: Vec<String>,
    pub changes: Vec<String>,
}

impl RepairReport {
    /// True when the input was already canonical.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.changes.is_empty()
    }
}

/// Outcome of strictly validating one card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub ok: bool,
    pub errors: Vec<String>,
}

/// Aggregate of `validate` over a card list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    /// Percentage of valid cards; 100 for an empty list.
    pub success_rate: f64,
    pub failures: Vec<(CardId, Vec<String>)>,
}

/// Card repair and validation entry points.
pub struct CardValidator;

impl CardValidator {
    /// Repair an arbitrary JSON value into a canonical card.
    #[must_use]
    pub fn repair(raw: &Value) -> RepairReport {
        let mut repair = Repair::default();
        let empty = Map::new();
        let input = match raw.as_object() {
            Some(map) => map,
            None => {
                repair.error("card is not an object; all fields defaulted");
                &empty
            }
        };

        let unknown: Vec<&str> = input
            .keys()
            .map(String::as_str)
            .filter(|k| !CARD_KEYS.contains(k))
            .collect();
        if !unknown.is_empty() {
            repair.change(format!("removed unsupported card keys: {}", unknown.join(", ")));
        }

        let id = repair.id(input.get("id"), raw);
        let name = repair
            .text("name", input.get("name"))
            .unwrap_or_else(|| DEFAULT_NAME.to_string());
        let faction = repair.enumeration("faction", input.get("faction"), Faction::parse, Faction::as_str, Faction::Truth);
        let card_type =
            repair.enumeration("type", input.get("type"), CardType::parse, CardType::as_str, CardType::Media);
        let rarity = repair.enumeration("rarity", input.get("rarity"), Rarity::parse, Rarity::as_str, Rarity::Common);

        let effects_map = match input.get("effects") {
            Some(Value::Object(map)) => map.clone(),
            None | Some(Value::Null) => {
                repair.error(format!("{card_type} card has no effects; defaults applied"));
                Map::new()
            }
            Some(other) => {
                repair.error(format!("effects must be an object (found {}); defaults applied", kind(other)));
                Map::new()
            }
        };

        let effects = match card_type {
            CardType::Attack => CardEffects::Attack(repair.attack(&effects_map)),
            CardType::Media => CardEffects::Media(repair.media(&effects_map)),
            CardType::Zone => CardEffects::Zone(repair.zone(&effects_map)),
        };

        let target = repair.target(card_type, input.get("target"));

        let cost = CostTable::cost(card_type, rarity);
        if input.get("cost").and_then(Value::as_u64) != Some(u64::from(cost)) {
            repair.change(format!("cost set to {cost}"));
        }

        let card = Card {
            id,
            name,
            faction,
            rarity,
            cost,
            effects,
            target,
            flavor: repair.flavor("flavor", input.get("flavor")),
            flavor_truth: repair.flavor("flavorTruth", input.get("flavorTruth")),
            flavor_gov: repair.flavor("flavorGov", input.get("flavorGov")),
        };

        RepairReport {
            card,
            errors: repair.errors,
            changes: repair.changes,
        }
    }

    /// Repair a JSON document. Unparseable text yields a default card.
    #[must_use]
    pub fn repair_str(json: &str) -> RepairReport {
        match serde_json::from_str::<Value>(json) {
            Ok(value) => Self::repair(&value),
            Err(err) => {
                let mut report = Self::repair(&Value::Null);
                report.errors.insert(0, format!("unparseable card JSON: {err}"));
                report
            }
        }
    }

    /// Strictly re-check a card without changing it.
    #[must_use]
    pub fn validate(card: &Card) -> ValidationReport {
        let mut errors = Vec::new();

        if card.id.as_str().trim().is_empty() {
            errors.push("missing id".to_string());
        }
        if card.name.trim().is_empty() {
            errors.push("missing name".to_string());
        }

        let expected = CostTable::cost(card.card_type(), card.rarity);
        if card.cost != expected {
            errors.push(format!("cost should be {expected} (found {})", card.cost));
        }

        match card.effects {
            CardEffects::Attack(effects) => {
                if effects.ip_delta.opponent == 0 {
                    errors.push("ATTACK cards require ipDelta.opponent > 0".to_string());
                }
                if i64::from(effects.discard_opponent) > MAX_DISCARD {
                    errors.push(format!(
                        "discardOpponent must be 0, 1 or 2 (found {})",
                        effects.discard_opponent
                    ));
                }
            }
            CardEffects::Media(_) => {}
            CardEffects::Zone(effects) => {
                if effects.pressure_delta == 0 {
                    errors.push("ZONE cards require pressureDelta > 0".to_string());
                }
                match card.target {
                    Some(TargetSpec {
                        scope: TargetScope::State,
                        count: 1,
                    }) => {}
                    _ => errors.push("ZONE cards must target a single state".to_string()),
                }
            }
        }

        if card.card_type() != CardType::Zone && card.target.is_some() {
            errors.push(format!("{} cards cannot carry a target", card.card_type()));
        }

        ValidationReport {
            ok: errors.is_empty(),
            errors,
        }
    }

    /// Validate every card and summarize.
    #[must_use]
    pub fn validate_batch(cards: &[Card]) -> ValidationSummary {
        let failures: Vec<_> = cards
            .iter()
            .filter_map(|card| {
                let report = Self::validate(card);
                (!report.ok).then(|| (card.id.clone(), report.errors))
            })
            .collect();

        let total = cards.len();
        let invalid = failures.len();
        let valid = total - invalid;
        let success_rate = if total == 0 {
            100.0
        } else {
            valid as f64 / total as f64 * 100.0
        };

        ValidationSummary {
            total,
            valid,
            invalid,
            success_rate,
            failures,
        }
    }
}

/// Accumulates findings while a record is repaired.
#[derive(Default)]
struct Repair {
    errors: Vec<String>,
    changes: Vec<String>,
}

impl Repair {
    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn change(&mut self, message: impl Into<String>) {
        self.changes.push(message.into());
    }

    fn id(&mut self, value: Option<&Value>, raw: &Value) -> CardId {
        match value {
            Some(Value::String(s)) if !s.trim().is_empty() => {
                if s.trim() != s {
                    self.change("trimmed id");
                }
                CardId::new(s.trim())
            }
            Some(Value::Number(n)) => {
                self.change(format!("id converted from number {n}"));
                CardId::new(n.to_string())
            }
            other => {
                let generated = generated_id(raw);
                if other.is_some() {
                    self.error(format!("invalid id; generated {generated}"));
                }
                self.change(format!("generated id {generated}"));
                CardId::new(generated)
            }
        }
    }

    fn text(&mut self, field: &str, value: Option<&Value>) -> Option<String> {
        match value {
            Some(Value::String(s)) if !s.trim().is_empty() => {
                if s.trim() != s {
                    self.change(format!("trimmed {field}"));
                }
                Some(s.trim().to_string())
            }
            None => {
                self.change(format!("missing {field}; defaulted"));
                None
            }
            Some(other) => {
                self.error(format!("invalid {field} ({}); defaulted", kind(other)));
                None
            }
        }
    }

    fn enumeration<T: Copy>(
        &mut self,
        field: &str,
        value: Option<&Value>,
        parse: impl Fn(&str) -> Option<T>,
        canonical: impl Fn(T) -> &'static str,
        default: T,
    ) -> T {
        match value {
            Some(Value::String(s)) => match parse(s) {
                Some(parsed) => {
                    if canonical(parsed) != s {
                        self.change(format!("normalized {field} '{s}' to '{}'", canonical(parsed)));
                    }
                    parsed
                }
                None => {
                    self.error(format!("invalid {field}: '{s}'; defaulted to '{}'", canonical(default)));
                    default
                }
            },
            None => {
                self.change(format!("missing {field}; defaulted to '{}'", canonical(default)));
                default
            }
            Some(other) => {
                self.error(format!(
                    "invalid {field} ({}); defaulted to '{}'",
                    kind(other),
                    canonical(default)
                ));
                default
            }
        }
    }

    /// Coerce a JSON value to an integer, noting string and fractional input.
    fn integer(&mut self, field: &str, value: &Value) -> Option<i64> {
        let (number, from_string) = match value {
            Value::Number(n) => (n.as_f64()?, false),
            Value::String(s) => (s.trim().parse::<f64>().ok().filter(|f| f.is_finite())?, true),
            Value::Bool(_) | Value::Null | Value::Array(_) | Value::Object(_) => return None,
        };
        if from_string {
            self.change(format!("{field} converted from string"));
        }
        if number.fract() != 0.0 {
            self.change(format!("{field} rounded from {number}"));
        }
        Some(number.round() as i64)
    }

    fn clamped(&mut self, field: &str, value: i64, (lo, hi): (i64, i64)) -> i64 {
        let clamped = value.clamp(lo, hi);
        if clamped != value {
            self.change(format!("{field} clamped from {value} to {clamped}"));
        }
        clamped
    }

    fn strip_unknown(&mut self, card_type: CardType, effects: &Map<String, Value>, allowed: &[&str]) {
        let extra: Vec<&str> = effects
            .keys()
            .map(String::as_str)
            .filter(|k| !allowed.contains(k))
            .collect();
        if !extra.is_empty() {
            self.change(format!("removed unsupported {card_type} effect keys: {}", extra.join(", ")));
        }
    }

    fn attack(&mut self, effects: &Map<String, Value>) -> AttackEffects {
        self.strip_unknown(CardType::Attack, effects, &["ipDelta", "discardOpponent"]);

        let raw_damage = match effects.get("ipDelta") {
            Some(Value::Object(delta)) => {
                let extra: Vec<&str> = delta.keys().map(String::as_str).filter(|k| *k != "opponent").collect();
                if !extra.is_empty() {
                    self.change(format!("removed unsupported ipDelta keys: {}", extra.join(", ")));
                }
                delta.get("opponent").and_then(|v| self.integer("ipDelta.opponent", v))
            }
            Some(scalar @ (Value::Number(_) | Value::String(_))) => {
                let parsed = self.integer("ipDelta", scalar);
                if parsed.is_some() {
                    self.change("normalized ipDelta to object form");
                }
                parsed
            }
            _ => None,
        };

        let damage = match raw_damage {
            Some(value) => self.clamped("ipDelta.opponent", value, EFFECT_RANGE),
            None => {
                self.error("ATTACK card requires numeric ipDelta.opponent; defaulted to 1");
                1
            }
        };

        let discard = match effects.get("discardOpponent") {
            None => 0,
            Some(value) => match self.integer("discardOpponent", value) {
                Some(n) => self.clamped("discardOpponent", n, (0, MAX_DISCARD)),
                None => {
                    self.error("discardOpponent must be 0, 1 or 2; defaulted to 0");
                    0
                }
            },
        };

        AttackEffects {
            ip_delta: IpDelta {
                opponent: damage as u32,
            },
            discard_opponent: discard as u8,
        }
    }

    fn media(&mut self, effects: &Map<String, Value>) -> MediaEffects {
        self.strip_unknown(CardType::Media, effects, &["truthDelta"]);

        let delta = match effects.get("truthDelta").and_then(|v| self.integer("truthDelta", v)) {
            Some(value) => self.clamped("truthDelta", value, (-100, 100)),
            None => {
                self.error("MEDIA card requires numeric truthDelta; defaulted to 1");
                1
            }
        };

        MediaEffects {
            truth_delta: delta as i32,
        }
    }

    fn zone(&mut self, effects: &Map<String, Value>) -> ZoneEffects {
        self.strip_unknown(CardType::Zone, effects, &["pressureDelta"]);

        let pressure = match effects.get("pressureDelta").and_then(|v| self.integer("pressureDelta", v)) {
            Some(value) => self.clamped("pressureDelta", value, EFFECT_RANGE),
            None => {
                self.error("ZONE card requires numeric pressureDelta; defaulted to 1");
                1
            }
        };

        ZoneEffects {
            pressure_delta: pressure as u32,
        }
    }

    fn target(&mut self, card_type: CardType, value: Option<&Value>) -> Option<TargetSpec> {
        if card_type != CardType::Zone {
            if value.is_some_and(|v| !v.is_null()) {
                self.change(format!("removed target from {card_type} card"));
            }
            return None;
        }

        let Some(Value::Object(target)) = value else {
            if value.is_some_and(|v| !v.is_null()) {
                self.error("ZONE target must be an object; defaulted to single state");
            } else {
                self.change("added default ZONE target {scope: state, count: 1}");
            }
            return Some(TargetSpec::single_state());
        };

        match target.get("scope").and_then(Value::as_str) {
            Some("state") => {}
            other => self.error(format!(
                "ZONE target scope must be 'state' (found {}); corrected",
                other.unwrap_or("nothing")
            )),
        }
        match target.get("count").and_then(Value::as_u64) {
            Some(1) => {}
            other => self.change(format!(
                "ZONE target count forced to 1 (found {})",
                other.map_or_else(|| "nothing".to_string(), |n| n.to_string())
            )),
        }
        Some(TargetSpec::single_state())
    }

    fn flavor(&mut self, field: &str, value: Option<&Value>) -> Option<String> {
        match value {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(_) => {
                self.change(format!("dropped empty or non-text {field}"));
                None
            }
        }
    }
}

/// Content-derived id so repairing the same record twice yields the same id.
fn generated_id(raw: &Value) -> String {
    let mut hasher = FxHasher::default();
    raw.to_string().hash(&mut hasher);
    format!("card-{:016x}", hasher.finish())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
