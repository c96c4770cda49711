//! Background audio controller
//!
//! The backend is the source of truth for playback and mute state. The
//! toggle and mute controls in the scene are a view, rewritten after every
//! operation from what the backend reports. Whichever operation completes
//! last decides what the controls show.

use log::{info, warn};
use serde::Serialize;

use super::backend::{AudioBackend, PlayOrigin};
use crate::config::AudioConfig;
use crate::scene::{Capabilities, ElementId, Scene};

/// What the play/pause control offers to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleAffordance {
    /// Audio is paused; pressing plays
    Play,
    /// Audio is playing; pressing pauses
    Pause,
}

impl ToggleAffordance {
    pub fn glyph(&self) -> &'static str {
        match self {
            ToggleAffordance::Play => "►",
            ToggleAffordance::Pause => "❚❚",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToggleAffordance::Play => "Play music",
            ToggleAffordance::Pause => "Pause music",
        }
    }
}

/// Result of a playback request, as seen by the card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlaybackChange {
    Started,
    Paused,
    /// The platform refused to play; the control fell back or stayed put
    Refused { reason: String },
}

/// Drives the background track and keeps its controls in sync
#[derive(Debug)]
pub struct AudioController {
    backend: Box<dyn AudioBackend>,
    has_toggle: bool,
    has_mute: bool,
}

impl AudioController {
    /// Configure the backend (volume, looping) and render the controls
    /// for its current state.
    pub fn new(
        mut backend: Box<dyn AudioBackend>,
        config: &AudioConfig,
        capabilities: &Capabilities,
        scene: &mut Scene,
    ) -> Self {
        backend.set_volume(config.volume);
        backend.set_looping(config.looping);

        let controller = Self {
            backend,
            has_toggle: capabilities.audio_toggle,
            has_mute: capabilities.mute_toggle,
        };
        controller.sync_controls(scene);
        controller
    }

    pub fn backend(&self) -> &dyn AudioBackend {
        self.backend.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        !self.backend.is_paused()
    }

    pub fn is_muted(&self) -> bool {
        self.backend.is_muted()
    }

    /// Current play/pause affordance derived from playback state
    pub fn affordance(&self) -> ToggleAffordance {
        if self.is_playing() {
            ToggleAffordance::Pause
        } else {
            ToggleAffordance::Play
        }
    }

    /// Start the track from the beginning as part of the opening gesture.
    ///
    /// A refusal is expected on platforms with autoplay restrictions: it
    /// is logged, the toggle falls back to the play affordance, and the
    /// refusal goes no further.
    pub fn try_autoplay(&mut self, scene: &mut Scene) -> PlaybackChange {
        self.backend.rewind();
        match self.backend.play(PlayOrigin::Autoplay) {
            Ok(()) => {
                info!("[AUDIO] Autoplay started");
                self.render_toggle(scene, ToggleAffordance::Pause);
                PlaybackChange::Started
            }
            Err(e) => {
                warn!("[AUDIO] Autoplay refused: {}", e);
                self.render_toggle(scene, ToggleAffordance::Play);
                PlaybackChange::Refused {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Play if paused, pause if playing.
    ///
    /// A refused play leaves the control as it was.
    pub fn toggle(&mut self, scene: &mut Scene) -> PlaybackChange {
        if self.is_playing() {
            self.backend.pause();
            self.render_toggle(scene, ToggleAffordance::Play);
            return PlaybackChange::Paused;
        }

        match self.backend.play(PlayOrigin::User) {
            Ok(()) => {
                self.render_toggle(scene, ToggleAffordance::Pause);
                PlaybackChange::Started
            }
            Err(e) => {
                warn!("[AUDIO] Play failed: {}", e);
                PlaybackChange::Refused {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Flip the muted flag. Returns the new value.
    pub fn toggle_mute(&mut self, scene: &mut Scene) -> bool {
        let muted = !self.backend.is_muted();
        self.backend.set_muted(muted);
        self.render_mute(scene, muted);
        muted
    }

    /// Escape pressed anywhere: pause if playing. Returns whether
    /// anything was paused.
    pub fn on_escape(&mut self, scene: &mut Scene) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.backend.pause();
        self.render_toggle(scene, ToggleAffordance::Play);
        true
    }

    /// Rewrite both controls from the backend's state
    pub fn sync_controls(&self, scene: &mut Scene) {
        self.render_toggle(scene, self.affordance());
        self.render_mute(scene, self.is_muted());
    }

    fn render_toggle(&self, scene: &mut Scene, affordance: ToggleAffordance) {
        if !self.has_toggle {
            return;
        }
        let pressed = affordance == ToggleAffordance::Pause;
        let id = ElementId::AudioToggle;
        scene.set_text(id, affordance.glyph());
        scene.set_attribute(id, "aria-label", affordance.label());
        scene.set_attribute(id, "aria-pressed", bool_attr(pressed));
    }

    fn render_mute(&self, scene: &mut Scene, muted: bool) {
        if !self.has_mute {
            return;
        }
        let id = ElementId::MuteToggle;
        scene.set_text(id, if muted { "🔇" } else { "🔊" });
        scene.set_attribute(id, "aria-label", if muted { "Unmute" } else { "Mute" });
        scene.set_attribute(id, "aria-pressed", bool_attr(muted));
    }
}

fn bool_attr(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{PlaybackPolicy, SimulatedAudio};
    use approx::assert_relative_eq;
    use std::time::Duration;

    fn setup(policy: PlaybackPolicy) -> (AudioController, Scene) {
        let mut scene = Scene::full();
        let caps = Capabilities::resolve(&scene, true);
        let controller = AudioController::new(
            Box::new(SimulatedAudio::new(policy)),
            &AudioConfig::default(),
            &caps,
            &mut scene,
        );
        (controller, scene)
    }

    fn toggle_pressed(scene: &Scene) -> Option<&str> {
        scene.attribute(ElementId::AudioToggle, "aria-pressed")
    }

    #[test]
    fn test_init_applies_config_and_renders() {
        let (controller, scene) = setup(PlaybackPolicy::Allow);
        assert_relative_eq!(controller.backend().volume(), 0.5);
        assert!(controller.backend().is_looping());
        assert_eq!(toggle_pressed(&scene), Some("false"));
        assert_eq!(scene.text(ElementId::AudioToggle), Some("►"));
        assert_eq!(
            scene.attribute(ElementId::MuteToggle, "aria-pressed"),
            Some("false")
        );
    }

    #[test]
    fn test_autoplay_success() {
        let (mut controller, mut scene) = setup(PlaybackPolicy::Allow);
        assert_eq!(controller.try_autoplay(&mut scene), PlaybackChange::Started);
        assert!(controller.is_playing());
        assert_eq!(toggle_pressed(&scene), Some("true"));
        assert_eq!(scene.text(ElementId::AudioToggle), Some("❚❚"));
    }

    #[test]
    fn test_autoplay_refused_falls_back_to_play() {
        let (mut controller, mut scene) = setup(PlaybackPolicy::BlockAutoplay);
        let change = controller.try_autoplay(&mut scene);
        assert!(matches!(change, PlaybackChange::Refused { .. }));
        assert!(!controller.is_playing());
        assert_eq!(toggle_pressed(&scene), Some("false"));
        assert_eq!(
            scene.attribute(ElementId::AudioToggle, "aria-label"),
            Some("Play music")
        );
    }

    #[test]
    fn test_autoplay_starts_from_beginning() {
        let mut scene = Scene::full();
        let caps = Capabilities::resolve(&scene, true);
        let mut audio = SimulatedAudio::new(PlaybackPolicy::Allow);
        audio.seek(Duration::from_secs(30));

        let mut controller = AudioController::new(
            Box::new(audio),
            &AudioConfig::default(),
            &caps,
            &mut scene,
        );
        assert_eq!(controller.backend().position(), Duration::from_secs(30));
        controller.try_autoplay(&mut scene);
        assert_eq!(controller.backend().position(), Duration::ZERO);
    }

    #[test]
    fn test_toggle_after_blocked_autoplay() {
        let (mut controller, mut scene) = setup(PlaybackPolicy::BlockAutoplay);
        controller.try_autoplay(&mut scene);

        assert_eq!(controller.toggle(&mut scene), PlaybackChange::Started);
        assert_eq!(toggle_pressed(&scene), Some("true"));

        assert_eq!(controller.toggle(&mut scene), PlaybackChange::Paused);
        assert_eq!(toggle_pressed(&scene), Some("false"));
    }

    #[test]
    fn test_failed_toggle_leaves_control_unchanged() {
        let (mut controller, mut scene) = setup(PlaybackPolicy::Unavailable);
        let before = scene.get(ElementId::AudioToggle).cloned();

        let change = controller.toggle(&mut scene);
        assert!(matches!(change, PlaybackChange::Refused { .. }));
        assert_eq!(scene.get(ElementId::AudioToggle).cloned(), before);
    }

    #[test]
    fn test_toggle_mute() {
        let (mut controller, mut scene) = setup(PlaybackPolicy::Allow);
        assert!(controller.toggle_mute(&mut scene));
        assert!(controller.is_muted());
        assert_eq!(
            scene.attribute(ElementId::MuteToggle, "aria-pressed"),
            Some("true")
        );
        assert_eq!(scene.text(ElementId::MuteToggle), Some("🔇"));

        assert!(!controller.toggle_mute(&mut scene));
        assert_eq!(scene.text(ElementId::MuteToggle), Some("🔊"));
    }

    #[test]
    fn test_escape_pauses_only_when_playing() {
        let (mut controller, mut scene) = setup(PlaybackPolicy::Allow);
        assert!(!controller.on_escape(&mut scene));

        controller.try_autoplay(&mut scene);
        assert!(controller.on_escape(&mut scene));
        assert!(!controller.is_playing());
        assert_eq!(toggle_pressed(&scene), Some("false"));
    }

    #[test]
    fn test_missing_controls_still_play() {
        let mut scene = Scene::full()
            .without(ElementId::AudioToggle)
            .without(ElementId::MuteToggle);
        let caps = Capabilities::resolve(&scene, true);
        let mut controller = AudioController::new(
            Box::new(SimulatedAudio::new(PlaybackPolicy::Allow)),
            &AudioConfig::default(),
            &caps,
            &mut scene,
        );

        assert_eq!(controller.try_autoplay(&mut scene), PlaybackChange::Started);
        assert!(controller.toggle_mute(&mut scene));
        assert!(scene.get(ElementId::AudioToggle).is_none());
    }
}
