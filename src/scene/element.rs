//! Page elements the card choreographs

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifiers of every element the card may touch.
///
/// Serialized as the DOM id of the element in the card's markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementId {
    #[serde(rename = "open-btn")]
    OpenControl,
    #[serde(rename = "flap")]
    Flap,
    #[serde(rename = "envelope-screen")]
    EnvelopeOverlay,
    #[serde(rename = "card-stage")]
    CardStage,
    #[serde(rename = "card-wrapper")]
    CardWrapper,
    #[serde(rename = "card")]
    Card,
    #[serde(rename = "confetti")]
    ConfettiContainer,
    #[serde(rename = "bg-music")]
    Audio,
    #[serde(rename = "audio-toggle")]
    AudioToggle,
    #[serde(rename = "mute-toggle")]
    MuteToggle,
}

impl ElementId {
    pub const ALL: [ElementId; 10] = [
        ElementId::OpenControl,
        ElementId::Flap,
        ElementId::EnvelopeOverlay,
        ElementId::CardStage,
        ElementId::CardWrapper,
        ElementId::Card,
        ElementId::ConfettiContainer,
        ElementId::Audio,
        ElementId::AudioToggle,
        ElementId::MuteToggle,
    ];

    /// DOM id of the element
    pub fn dom_id(&self) -> &'static str {
        match self {
            ElementId::OpenControl => "open-btn",
            ElementId::Flap => "flap",
            ElementId::EnvelopeOverlay => "envelope-screen",
            ElementId::CardStage => "card-stage",
            ElementId::CardWrapper => "card-wrapper",
            ElementId::Card => "card",
            ElementId::ConfettiContainer => "confetti",
            ElementId::Audio => "bg-music",
            ElementId::AudioToggle => "audio-toggle",
            ElementId::MuteToggle => "mute-toggle",
        }
    }

    /// Look up an element by its DOM id
    pub fn from_dom_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|el| el.dom_id() == id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.dom_id())
    }
}

/// Mutable state of one element, mirrored by whatever renders the card
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Element {
    pub classes: BTreeSet<String>,
    pub styles: BTreeMap<String, String>,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    pub disabled: bool,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}
