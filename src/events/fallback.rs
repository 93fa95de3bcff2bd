//! Capture events synthesized when a state has no matching content.
//!
//! Output depends only on the state and the capturing side, so replays
//! produce identical fallbacks.

use super::event::{Event, EventEffects, EventFaction, StateEffects};
use crate::core::StateId;

/// Id prefix marking synthesized events.
pub const FALLBACK_PREFIX: &str = "fallback_";

struct Template {
    slug: &'static str,
    verb: &'static str,
    headline: &'static str,
    truth: i32,
    ip: i32,
    pressure: i32,
    defense: i32,
}

const TRUTH: Template = Template {
    slug: "truth",
    verb: "Awakens",
    headline: "Locals rally behind the truth movement",
    truth: 4,
    ip: -1,
    pressure: -2,
    defense: 1,
};

const GOVERNMENT: Template = Template {
    slug: "government",
    verb: "Locked Down",
    headline: "Federal presence tightens its grip",
    truth: -3,
    ip: 3,
    pressure: 2,
    defense: 2,
};

const NEUTRAL: Template = Template {
    slug: "neutral",
    verb: "Changes Hands",
    headline: "Residents shrug as control shifts",
    truth: 0,
    ip: 1,
    pressure: 0,
    defense: 1,
};

/// Build the stand-in capture event for `state_id`.
///
/// `display_name` is used in the title; the raw id stands in when absent.
#[must_use]
pub fn fallback_event(state_id: &StateId, display_name: Option<&str>, captured_by: EventFaction) -> Event {
    let template = match captured_by {
        EventFaction::Truth => &TRUTH,
        EventFaction::Government => &GOVERNMENT,
        EventFaction::Neutral => &NEUTRAL,
    };
    let name = display_name.unwrap_or(state_id.as_str());
    let slug: String = state_id
        .as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();

    let mut event = Event::capture(
        format!("{FALLBACK_PREFIX}{slug}_{}", template.slug),
        format!("{name} {}", template.verb),
        captured_by,
        1.0,
    )
    .with_faction(captured_by)
    .with_effects(EventEffects {
        truth: template.truth,
        ip: template.ip,
        state_effects: Some(StateEffects {
            state_id: Some(state_id.clone()),
            pressure: template.pressure,
            defense: template.defense,
        }),
        ..EventEffects::default()
    });
    event.headline = Some(format!("{}: {}", name.to_uppercase(), template.headline));
    event
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truth_fallback() {
        let event = fallback_event(&StateId::from("CA"), Some("California"), EventFaction::Truth);

        assert_eq!(event.id.as_str(), "fallback_ca_truth");
        assert_eq!(event.title, "California Awakens");
        let effects = event.effects.unwrap();
        assert_eq!((effects.truth, effects.ip), (4, -1));
        let state = effects.state_effects.unwrap();
        assert_eq!((state.pressure, state.defense), (-2, 1));
    }

    #[test]
    fn test_government_fallback_uses_raw_id() {
        let event = fallback_event(&StateId::from("north-reach"), None, EventFaction::Government);

        assert_eq!(event.id.as_str(), "fallback_north_reach_government");
        assert_eq!(event.title, "north-reach Locked Down");
        let effects = event.effects.unwrap();
        assert!(effects.truth < 0 && effects.ip > 0);
    }

    #[test]
    fn test_deterministic() {
        let a = fallback_event(&StateId::from("TX"), Some("Texas"), EventFaction::Neutral);
        let b = fallback_event(&StateId::from("TX"), Some("Texas"), EventFaction::Neutral);
        assert_eq!(a, b);
    }
}
