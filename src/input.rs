//! User input and routing
//!
//! Listeners only exist for elements present when the card loads, so
//! routing consults the capabilities rather than the live scene.

use serde::Serialize;

use crate::scene::{Capabilities, ElementId};

/// Keyboard keys the card reacts to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Enter,
    Space,
    Escape,
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key_value(value: &str) -> Self {
        match value {
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }
}

/// A user gesture
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    Click { target: ElementId },
    /// Key press; `target` is the focused element, if any
    KeyDown { target: Option<ElementId>, key: Key },
}

impl InputEvent {
    pub fn click(target: ElementId) -> Self {
        InputEvent::Click { target }
    }

    pub fn key(target: Option<ElementId>, key: Key) -> Self {
        InputEvent::KeyDown { target, key }
    }
}

/// What an input asks the card to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Start the opening sequence. `prevent_default` is set for keyboard
    /// activation so Space does not also scroll the page.
    OpenCard { prevent_default: bool },
    TogglePlayback,
    ToggleMute,
    /// Global Escape shortcut
    PauseAudio,
}

/// Decide what an input does, given which listeners were attached.
pub fn route(event: &InputEvent, capabilities: &Capabilities) -> Option<Action> {
    match event {
        InputEvent::Click { target } => match target {
            ElementId::OpenControl if capabilities.open_control => Some(Action::OpenCard {
                prevent_default: false,
            }),
            ElementId::AudioToggle if capabilities.audio_toggle => Some(Action::TogglePlayback),
            ElementId::MuteToggle if capabilities.mute_toggle => Some(Action::ToggleMute),
            _ => None,
        },
        InputEvent::KeyDown { key: Key::Escape, .. } if capabilities.audio => {
            Some(Action::PauseAudio)
        }
        InputEvent::KeyDown {
            target: Some(ElementId::OpenControl),
            key: Key::Enter | Key::Space,
        } if capabilities.open_control => Some(Action::OpenCard {
            prevent_default: true,
        }),
        InputEvent::KeyDown { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;

    fn full_caps() -> Capabilities {
        Capabilities::resolve(&Scene::full(), true)
    }

    #[test]
    fn test_click_open_control() {
        let action = route(&InputEvent::click(ElementId::OpenControl), &full_caps());
        assert_eq!(
            action,
            Some(Action::OpenCard {
                prevent_default: false
            })
        );
    }

    #[test]
    fn test_enter_and_space_on_open_control() {
        for key in [Key::Enter, Key::Space] {
            let event = InputEvent::key(Some(ElementId::OpenControl), key);
            assert_eq!(
                route(&event, &full_caps()),
                Some(Action::OpenCard {
                    prevent_default: true
                })
            );
        }
    }

    #[test]
    fn test_enter_elsewhere_ignored() {
        let event = InputEvent::key(Some(ElementId::Card), Key::Enter);
        assert_eq!(route(&event, &full_caps()), None);
        let event = InputEvent::key(None, Key::Space);
        assert_eq!(route(&event, &full_caps()), None);
    }

    #[test]
    fn test_escape_is_global() {
        for target in [None, Some(ElementId::OpenControl), Some(ElementId::Card)] {
            let event = InputEvent::key(target, Key::Escape);
            assert_eq!(route(&event, &full_caps()), Some(Action::PauseAudio));
        }
    }

    #[test]
    fn test_escape_without_audio_ignored() {
        let caps = Capabilities::resolve(&Scene::full(), false);
        assert_eq!(route(&InputEvent::key(None, Key::Escape), &caps), None);
    }

    #[test]
    fn test_no_listener_without_open_control() {
        let caps = Capabilities::resolve(&Scene::full().without(ElementId::OpenControl), true);
        assert_eq!(route(&InputEvent::click(ElementId::OpenControl), &caps), None);
    }

    #[test]
    fn test_audio_controls() {
        let caps = full_caps();
        assert_eq!(
            route(&InputEvent::click(ElementId::AudioToggle), &caps),
            Some(Action::TogglePlayback)
        );
        assert_eq!(
            route(&InputEvent::click(ElementId::MuteToggle), &caps),
            Some(Action::ToggleMute)
        );
        assert_eq!(route(&InputEvent::click(ElementId::Flap), &caps), None);
    }

    #[test]
    fn test_key_values() {
        assert_eq!(Key::from_key_value("Enter"), Key::Enter);
        assert_eq!(Key::from_key_value(" "), Key::Space);
        assert_eq!(Key::from_key_value("Escape"), Key::Escape);
        assert_eq!(Key::from_key_value("a"), Key::Other("a".to_string()));
    }
}
