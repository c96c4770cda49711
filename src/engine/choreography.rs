//! The opening choreography as data
//!
//! A script is an ordered list of steps. Mutations and side effects run
//! back to back; a wait suspends the script until the scheduler resumes it.

use std::time::Duration;

use serde::Serialize;

use crate::config::CardConfig;
use crate::scene::ElementId;

/// Class added to the flap, and later to the card, when they open
pub const OPEN: &str = "open";
/// Class that slides the card wrapper into view
pub const SLIDE_IN: &str = "slide-in";
/// Class for the card's settled, fully open pose
pub const OPEN_FINAL: &str = "open-final";

/// One step of a choreography script
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Add a visual marker class to an element
    AddClass { element: ElementId, class: String },
    /// Set an inline style property on an element
    SetStyle {
        element: ElementId,
        property: String,
        value: String,
    },
    /// Suspend the script. With `only_if`, the pause belongs to that
    /// element's transition and is skipped when the element is absent.
    Wait {
        duration: Duration,
        only_if: Option<ElementId>,
    },
    /// Emit a confetti burst
    Burst { count: usize },
    /// Ask the audio controller to start playback
    TryAutoplay,
    /// Start a background burst that repeats forever
    RepeatBurst { count: usize, every: Duration },
}

impl Step {
    fn add_class(element: ElementId, class: &str) -> Self {
        Step::AddClass {
            element,
            class: class.to_string(),
        }
    }

    fn set_style(element: ElementId, property: &str, value: &str) -> Self {
        Step::SetStyle {
            element,
            property: property.to_string(),
            value: value.to_string(),
        }
    }

    fn wait(duration: Duration) -> Self {
        Step::Wait {
            duration,
            only_if: None,
        }
    }

    /// The element this step mutates, if any
    pub fn target(&self) -> Option<ElementId> {
        match self {
            Step::AddClass { element, .. } | Step::SetStyle { element, .. } => Some(*element),
            _ => None,
        }
    }
}

/// Build the envelope-opening script from configuration.
///
/// # Example
/// ```
/// use greeting_card::config::CardConfig;
/// use greeting_card::engine::{opening_script, Step};
///
/// let script = opening_script(&CardConfig::default());
/// assert!(matches!(script.last(), Some(Step::RepeatBurst { count: 12, .. })));
/// ```
pub fn opening_script(config: &CardConfig) -> Vec<Step> {
    let timings = &config.timings;
    let confetti = &config.confetti;

    vec![
        Step::add_class(ElementId::Flap, OPEN),
        Step::wait(timings.flap_open()),
        Step::set_style(
            ElementId::EnvelopeOverlay,
            "transition",
            &timings.overlay_transition,
        ),
        Step::set_style(ElementId::EnvelopeOverlay, "opacity", "0"),
        Step::Wait {
            duration: timings.overlay_fade(),
            only_if: Some(ElementId::EnvelopeOverlay),
        },
        Step::set_style(ElementId::EnvelopeOverlay, "display", "none"),
        Step::set_style(ElementId::CardStage, "display", "flex"),
        Step::add_class(ElementId::CardWrapper, SLIDE_IN),
        Step::Burst {
            count: confetti.opening_burst,
        },
        Step::TryAutoplay,
        Step::wait(timings.hinge_open()),
        Step::add_class(ElementId::Card, OPEN),
        Step::wait(timings.open_final()),
        Step::add_class(ElementId::Card, OPEN_FINAL),
        Step::Burst {
            count: confetti.closing_burst,
        },
        Step::RepeatBurst {
            count: confetti.periodic_burst,
            every: timings.periodic_burst(),
        },
    ]
}
