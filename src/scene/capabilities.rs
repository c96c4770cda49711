//! Optional capabilities, resolved once when the card loads

use log::warn;
use serde::Serialize;

use super::{ElementId, Scene};

/// Which optional parts of the card are available.
///
/// Components check these flags instead of probing the scene again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Capabilities {
    /// The open control exists, so the sequence can be started at all
    pub open_control: bool,
    /// Confetti has somewhere to land
    pub confetti: bool,
    /// A background audio element exists and audio is enabled
    pub audio: bool,
    pub audio_toggle: bool,
    pub mute_toggle: bool,
}

impl Capabilities {
    /// Inspect the scene and report what is present.
    ///
    /// Missing choreography elements are logged once here; the steps that
    /// need them are skipped later without further noise.
    pub fn resolve(scene: &Scene, audio_enabled: bool) -> Self {
        for id in [
            ElementId::OpenControl,
            ElementId::Flap,
            ElementId::EnvelopeOverlay,
            ElementId::CardStage,
            ElementId::CardWrapper,
            ElementId::Card,
            ElementId::ConfettiContainer,
        ] {
            if !scene.contains(id) {
                warn!("Element {} not found, dependent steps will be skipped", id);
            }
        }

        let audio = audio_enabled && scene.contains(ElementId::Audio);
        if audio_enabled && !audio {
            warn!("Element {} not found, audio disabled", ElementId::Audio);
        }

        Self {
            open_control: scene.contains(ElementId::OpenControl),
            confetti: scene.contains(ElementId::ConfettiContainer),
            audio,
            audio_toggle: audio && scene.contains(ElementId::AudioToggle),
            mute_toggle: audio && scene.contains(ElementId::MuteToggle),
        }
    }
}
