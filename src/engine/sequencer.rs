//! One-shot step runner for the opening choreography
//!
//! The sequencer owns the "started" state and a cursor into its script.
//! It executes steps against a [`Stage`] until it reaches a wait, then
//! hands the wait back to its owner, who resumes it when the time comes.

use std::fmt;
use std::time::Duration;

use log::{debug, info};

use super::choreography::Step;
use crate::scene::ElementId;

/// Whatever the script acts on
pub trait Stage {
    /// Whether an element exists. Steps targeting absent elements are
    /// skipped rather than performed.
    fn contains(&self, element: ElementId) -> bool;

    /// Carry out one step
    fn perform(&mut self, step: &Step);

    /// Called instead of `perform` for a step whose element is missing
    fn skip(&mut self, _step: &Step) {}
}

/// Lifecycle of the opening sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceState {
    /// Not triggered yet
    #[default]
    Idle,
    /// Suspended on a wait step
    Waiting,
    /// Every step has run
    Finished,
}

impl fmt::Display for SequenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceState::Idle => write!(f, "Idle"),
            SequenceState::Waiting => write!(f, "Waiting"),
            SequenceState::Finished => write!(f, "Finished"),
        }
    }
}

/// Where a run of the script stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Resume after this long
    Suspended(Duration),
    /// Nothing left to run
    Finished,
}

/// Runs a script at most once
#[derive(Debug, Clone)]
pub struct Sequencer {
    script: Vec<Step>,
    cursor: usize,
    state: SequenceState,
}

impl Sequencer {
    pub fn new(script: Vec<Step>) -> Self {
        Self {
            script,
            cursor: 0,
            state: SequenceState::Idle,
        }
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    /// Whether the sequence has ever been triggered
    pub fn is_started(&self) -> bool {
        self.state != SequenceState::Idle
    }

    pub fn script(&self) -> &[Step] {
        &self.script
    }

    /// Start the script. Returns `None` if it was already started, so
    /// repeated triggers have no effect at all.
    pub fn trigger<S: Stage>(&mut self, stage: &mut S) -> Option<Advance> {
        if self.is_started() {
            debug!("[SEQUENCE] Already started, ignoring trigger");
            return None;
        }
        info!("[SEQUENCE] Started ({} steps)", self.script.len());
        Some(self.run(stage))
    }

    /// Continue after a wait. Returns `None` unless the script is waiting.
    pub fn resume<S: Stage>(&mut self, stage: &mut S) -> Option<Advance> {
        if self.state != SequenceState::Waiting {
            return None;
        }
        Some(self.run(stage))
    }

    fn run<S: Stage>(&mut self, stage: &mut S) -> Advance {
        while let Some(step) = self.script.get(self.cursor) {
            self.cursor += 1;

            match step {
                Step::Wait { duration, only_if } => {
                    if let Some(element) = only_if {
                        if !stage.contains(*element) {
                            debug!("[SEQUENCE] Skipping wait for missing {}", element);
                            continue;
                        }
                    }
                    debug!("[SEQUENCE] Waiting {:?}", duration);
                    self.state = SequenceState::Waiting;
                    return Advance::Suspended(*duration);
                }
                step => match step.target() {
                    Some(element) if !stage.contains(element) => {
                        debug!("[SEQUENCE] Skipping step for missing {}", element);
                        stage.skip(step);
                    }
                    _ => stage.perform(step),
                },
            }
        }

        info!("[SEQUENCE] Finished");
        self.state = SequenceState::Finished;
        Advance::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CardConfig;
    use crate::engine::choreography::opening_script;
    use std::collections::HashSet;

    /// Records performed and skipped steps
    #[derive(Default)]
    struct RecordingStage {
        missing: HashSet<ElementId>,
        performed: Vec<Step>,
        skipped: Vec<Step>,
    }

    impl Stage for RecordingStage {
        fn contains(&self, element: ElementId) -> bool {
            !self.missing.contains(&element)
        }

        fn perform(&mut self, step: &Step) {
            self.performed.push(step.clone());
        }

        fn skip(&mut self, step: &Step) {
            self.skipped.push(step.clone());
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_default_state_is_idle() {
        let sequencer = Sequencer::new(opening_script(&CardConfig::default()));
        assert_eq!(sequencer.state(), SequenceState::Idle);
        assert!(!sequencer.is_started());
    }

    #[test]
    fn test_runs_until_first_wait() {
        let mut sequencer = Sequencer::new(opening_script(&CardConfig::default()));
        let mut stage = RecordingStage::default();

        let advance = sequencer.trigger(&mut stage);
        assert_eq!(advance, Some(Advance::Suspended(ms(700))));
        assert_eq!(stage.performed.len(), 1);
        assert_eq!(sequencer.state(), SequenceState::Waiting);
    }

    #[test]
    fn test_full_run_in_order() {
        let mut sequencer = Sequencer::new(opening_script(&CardConfig::default()));
        let mut stage = RecordingStage::default();

        let mut waits = Vec::new();
        let mut advance = sequencer.trigger(&mut stage);
        while let Some(Advance::Suspended(d)) = advance {
            waits.push(d);
            advance = sequencer.resume(&mut stage);
        }

        assert_eq!(advance, Some(Advance::Finished));
        assert_eq!(waits, vec![ms(700), ms(560), ms(950), ms(650)]);
        assert_eq!(stage.performed.len(), 12);
        assert!(stage.skipped.is_empty());
        assert_eq!(sequencer.state(), SequenceState::Finished);
    }

    #[test]
    fn test_second_trigger_is_noop() {
        let mut sequencer = Sequencer::new(opening_script(&CardConfig::default()));
        let mut stage = RecordingStage::default();

        assert!(sequencer.trigger(&mut stage).is_some());
        let performed = stage.performed.len();
        assert!(sequencer.trigger(&mut stage).is_none());
        assert!(sequencer.trigger(&mut stage).is_none());
        assert_eq!(stage.performed.len(), performed);
    }

    #[test]
    fn test_resume_requires_waiting() {
        let mut sequencer = Sequencer::new(opening_script(&CardConfig::default()));
        let mut stage = RecordingStage::default();
        assert!(sequencer.resume(&mut stage).is_none());
        assert!(stage.performed.is_empty());
    }

    #[test]
    fn test_missing_overlay_skips_its_wait() {
        let mut sequencer = Sequencer::new(opening_script(&CardConfig::default()));
        let mut stage = RecordingStage::default();
        stage.missing.insert(ElementId::EnvelopeOverlay);

        let mut waits = Vec::new();
        let mut advance = sequencer.trigger(&mut stage);
        while let Some(Advance::Suspended(d)) = advance {
            waits.push(d);
            advance = sequencer.resume(&mut stage);
        }

        assert_eq!(waits, vec![ms(700), ms(950), ms(650)]);
        assert_eq!(stage.skipped.len(), 3);
        assert!(stage
            .skipped
            .iter()
            .all(|s| s.target() == Some(ElementId::EnvelopeOverlay)));
    }

    #[test]
    fn test_missing_card_keeps_other_steps() {
        let mut sequencer = Sequencer::new(opening_script(&CardConfig::default()));
        let mut stage = RecordingStage::default();
        stage.missing.insert(ElementId::Card);

        let mut advance = sequencer.trigger(&mut stage);
        while let Some(Advance::Suspended(_)) = advance {
            advance = sequencer.resume(&mut stage);
        }

        assert_eq!(stage.skipped.len(), 2);
        assert!(stage.performed.contains(&Step::Burst { count: 20 }));
        assert_eq!(sequencer.state(), SequenceState::Finished);
    }

    #[test]
    fn test_empty_script_finishes_immediately() {
        let mut sequencer = Sequencer::new(Vec::new());
        let mut stage = RecordingStage::default();
        assert_eq!(sequencer.trigger(&mut stage), Some(Advance::Finished));
        assert!(sequencer.is_started());
    }
}
