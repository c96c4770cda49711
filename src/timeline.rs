//! Timestamped record of everything the card did
//!
//! The timeline is the card's only structured output: renderers can replay
//! it, the CLI prints it, tests assert on it.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::audio::PlaybackChange;
use crate::scene::ElementId;

/// Something observable that happened
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CardEvent {
    /// The opening sequence started
    Triggered,
    ClassAdded {
        element: ElementId,
        class: String,
    },
    StyleSet {
        element: ElementId,
        property: String,
        value: String,
    },
    /// A step was skipped because its element is missing
    StepSkipped { element: ElementId },
    /// Confetti burst; `spawned` is zero when there is no container
    Burst { requested: usize, spawned: usize },
    ParticlesReaped { count: usize },
    Autoplay { change: PlaybackChange },
    PlaybackToggled { change: PlaybackChange },
    MuteToggled { muted: bool },
    /// Escape paused the music
    EscapePaused,
    PeriodicBurstsStarted { count: usize, every_ms: u64 },
    SequenceFinished,
}

impl fmt::Display for CardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardEvent::Triggered => write!(f, "opening sequence triggered"),
            CardEvent::ClassAdded { element, class } => {
                write!(f, "{} += .{}", element, class)
            }
            CardEvent::StyleSet {
                element,
                property,
                value,
            } => write!(f, "{} {{ {}: {} }}", element, property, value),
            CardEvent::StepSkipped { element } => write!(f, "skipped, {} missing", element),
            CardEvent::Burst { requested, spawned } => {
                write!(f, "confetti burst {}/{}", spawned, requested)
            }
            CardEvent::ParticlesReaped { count } => write!(f, "{} particles removed", count),
            CardEvent::Autoplay { change } => write!(f, "autoplay: {}", describe(change)),
            CardEvent::PlaybackToggled { change } => {
                write!(f, "playback toggle: {}", describe(change))
            }
            CardEvent::MuteToggled { muted } => {
                write!(f, "{}", if *muted { "muted" } else { "unmuted" })
            }
            CardEvent::EscapePaused => write!(f, "escape: music paused"),
            CardEvent::PeriodicBurstsStarted { count, every_ms } => {
                write!(f, "background bursts of {} every {}ms", count, every_ms)
            }
            CardEvent::SequenceFinished => write!(f, "opening sequence finished"),
        }
    }
}

fn describe(change: &PlaybackChange) -> String {
    match change {
        PlaybackChange::Started => "playing".to_string(),
        PlaybackChange::Paused => "paused".to_string(),
        PlaybackChange::Refused { reason } => format!("refused ({})", reason),
    }
}

/// An event and when it happened, in milliseconds since page load
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: CardEvent,
}

impl fmt::Display for TimelineEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>8}ms  {}", self.at_ms, self.event)
    }
}

/// Append-only event log
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, at: Duration, event: CardEvent) {
        self.entries.push(TimelineEntry {
            at_ms: at.as_millis() as u64,
            event,
        });
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries recorded at or after `since`
    pub fn since(&self, since: Duration) -> &[TimelineEntry] {
        let since_ms = since.as_millis() as u64;
        let start = self.entries.partition_point(|e| e.at_ms < since_ms);
        &self.entries[start..]
    }

    /// Entries matching a predicate
    pub fn filter<'a>(
        &'a self,
        predicate: impl Fn(&CardEvent) -> bool + 'a,
    ) -> impl Iterator<Item = &'a TimelineEntry> + 'a {
        self.entries.iter().filter(move |e| predicate(&e.event))
    }

    /// Time of the first event matching a predicate
    pub fn first_at(&self, predicate: impl Fn(&CardEvent) -> bool) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| predicate(&e.event))
            .map(|e| e.at_ms)
    }
}
