//! The assembled greeting card
//!
//! `GreetingCard` owns the scene, the sequencer, the confetti emitter, the
//! optional audio controller and the scheduler that drives them. Nothing
//! happens on its own: inputs arrive through [`GreetingCard::handle_input`]
//! and time moves through [`GreetingCard::advance`].

use std::time::Duration;

use log::{debug, info};

use crate::audio::{AudioBackend, AudioController, PlaybackPolicy, SimulatedAudio};
use crate::config::CardConfig;
use crate::engine::{opening_script, Advance, Scheduler, SequenceState, Sequencer, Stage, Step};
use crate::error::Result;
use crate::input::{route, Action, InputEvent};
use crate::particles::ParticleEmitter;
use crate::scene::{Capabilities, ElementId, Scene};
use crate::timeline::{CardEvent, Timeline};

/// Timers the card schedules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    /// Continue the opening sequence after a wait
    ResumeSequence,
    /// Remove confetti whose lifespan has run out
    Reap,
    /// Background burst that reschedules itself forever
    PeriodicBurst { count: usize, every: Duration },
}

/// A greeting card page, driven by inputs and a virtual clock
#[derive(Debug)]
pub struct GreetingCard {
    config: CardConfig,
    scene: Scene,
    capabilities: Capabilities,
    sequencer: Sequencer,
    particles: ParticleEmitter,
    audio: Option<AudioController>,
    scheduler: Scheduler<Task>,
    timeline: Timeline,
}

impl GreetingCard {
    /// Load a card on `scene` with a simulated audio element that allows
    /// autoplay.
    pub fn new(config: CardConfig, scene: Scene) -> Result<Self> {
        Self::with_backend(
            config,
            scene,
            Box::new(SimulatedAudio::new(PlaybackPolicy::Allow)),
        )
    }

    /// Load a card with a specific audio backend. The backend is dropped
    /// when the scene has no audio element or audio is disabled.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use greeting_card::audio::{PlaybackPolicy, SimulatedAudio};
    /// use greeting_card::config::CardConfig;
    /// use greeting_card::input::InputEvent;
    /// use greeting_card::scene::{ElementId, Scene};
    /// use greeting_card::GreetingCard;
    ///
    /// let mut card = GreetingCard::with_backend(
    ///     CardConfig::default(),
    ///     Scene::full(),
    ///     Box::new(SimulatedAudio::new(PlaybackPolicy::BlockAutoplay)),
    /// )
    /// .unwrap();
    ///
    /// card.handle_input(InputEvent::click(ElementId::OpenControl));
    /// card.advance(Duration::from_secs(3));
    ///
    /// assert!(card.scene().has_class(ElementId::Card, "open-final"));
    /// assert!(!card.audio().unwrap().is_playing());
    /// ```
    pub fn with_backend(
        config: CardConfig,
        mut scene: Scene,
        backend: Box<dyn AudioBackend>,
    ) -> Result<Self> {
        config.validate()?;

        let capabilities = Capabilities::resolve(&scene, config.audio.enabled);
        let audio = capabilities
            .audio
            .then(|| AudioController::new(backend, &config.audio, &capabilities, &mut scene));
        let particles =
            ParticleEmitter::new(config.confetti.clone(), config.seed, capabilities.confetti);
        let sequencer = Sequencer::new(opening_script(&config));

        debug!("[CARD] Loaded with {:?}", capabilities);

        Ok(Self {
            config,
            scene,
            capabilities,
            sequencer,
            particles,
            audio,
            scheduler: Scheduler::new(),
            timeline: Timeline::new(),
        })
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    /// Dispatch a user gesture. Returns the action it mapped to, if any
    /// listener handled it.
    pub fn handle_input(&mut self, event: InputEvent) -> Option<Action> {
        let action = route(&event, &self.capabilities);
        match action {
            Some(Action::OpenCard { .. }) => {
                self.trigger();
            }
            Some(Action::TogglePlayback) => self.toggle_audio(),
            Some(Action::ToggleMute) => self.toggle_mute(),
            Some(Action::PauseAudio) => self.press_escape(),
            None => debug!("[CARD] No listener for {:?}", event),
        }
        action
    }

    /// Start the opening sequence. Only the first call has any effect;
    /// returns whether this call started it.
    pub fn trigger(&mut self) -> bool {
        if self.sequencer.is_started() {
            return false;
        }

        info!("[CARD] Opening");
        self.timeline.record(self.scheduler.now(), CardEvent::Triggered);
        self.scene.set_disabled(ElementId::OpenControl, true);
        self.scene
            .set_attribute(ElementId::OpenControl, "aria-expanded", "true");

        let (sequencer, mut director) = self.split();
        let advance = sequencer.trigger(&mut director);
        self.settle(advance);
        true
    }

    pub fn toggle_audio(&mut self) {
        if let Some(audio) = self.audio.as_mut() {
            let change = audio.toggle(&mut self.scene);
            self.timeline
                .record(self.scheduler.now(), CardEvent::PlaybackToggled { change });
        }
    }

    pub fn toggle_mute(&mut self) {
        if let Some(audio) = self.audio.as_mut() {
            let muted = audio.toggle_mute(&mut self.scene);
            self.timeline
                .record(self.scheduler.now(), CardEvent::MuteToggled { muted });
        }
    }

    /// Global Escape: pause the music if it is playing
    pub fn press_escape(&mut self) {
        if let Some(audio) = self.audio.as_mut() {
            if audio.on_escape(&mut self.scene) {
                self.timeline
                    .record(self.scheduler.now(), CardEvent::EscapePaused);
            }
        }
    }

    // ========================================================================
    // Time
    // ========================================================================

    /// Current time since the card loaded
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// When the next timer fires
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    /// Let `by` pass, firing every timer that falls due
    pub fn advance(&mut self, by: Duration) {
        let target = self.scheduler.now() + by;
        self.advance_to(target);
    }

    /// Fire every timer due at or before `target`, in order, and leave the
    /// clock at `target`
    pub fn advance_to(&mut self, target: Duration) {
        while let Some(task) = self.scheduler.pop_due(target) {
            self.run_task(task);
        }
        self.scheduler.set_now(target);
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::ResumeSequence => {
                let (sequencer, mut director) = self.split();
                let advance = sequencer.resume(&mut director);
                self.settle(advance);
            }
            Task::Reap => {
                let count = self.particles.reap(self.scheduler.now());
                if count > 0 {
                    self.timeline
                        .record(self.scheduler.now(), CardEvent::ParticlesReaped { count });
                }
            }
            Task::PeriodicBurst { count, every } => {
                let (_, mut director) = self.split();
                director.burst(count);
                self.scheduler.schedule_in(every, task);
            }
        }
    }

    /// Schedule the resume for a suspended sequence, or note its end
    fn settle(&mut self, advance: Option<Advance>) {
        match advance {
            Some(Advance::Suspended(delay)) => {
                self.scheduler.schedule_in(delay, Task::ResumeSequence)
            }
            Some(Advance::Finished) => self
                .timeline
                .record(self.scheduler.now(), CardEvent::SequenceFinished),
            None => {}
        }
    }

    fn split(&mut self) -> (&mut Sequencer, Director<'_>) {
        (
            &mut self.sequencer,
            Director {
                scene: &mut self.scene,
                particles: &mut self.particles,
                audio: self.audio.as_mut(),
                scheduler: &mut self.scheduler,
                timeline: &mut self.timeline,
            },
        )
    }

    // ========================================================================
    // State Queries
    // ========================================================================

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn sequence_state(&self) -> SequenceState {
        self.sequencer.state()
    }

    pub fn particles(&self) -> &ParticleEmitter {
        &self.particles
    }

    pub fn audio(&self) -> Option<&AudioController> {
        self.audio.as_ref()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }
}

/// The card's parts, lent to the sequencer while it runs steps
struct Director<'a> {
    scene: &'a mut Scene,
    particles: &'a mut ParticleEmitter,
    audio: Option<&'a mut AudioController>,
    scheduler: &'a mut Scheduler<Task>,
    timeline: &'a mut Timeline,
}

impl Director<'_> {
    fn burst(&mut self, count: usize) {
        let now = self.scheduler.now();
        let spawned = match self.particles.emit(count, now) {
            Some(reap_at) => {
                self.scheduler.schedule_at(reap_at, Task::Reap);
                count
            }
            None => 0,
        };
        self.timeline.record(
            now,
            CardEvent::Burst {
                requested: count,
                spawned,
            },
        );
    }
}

impl Stage for Director<'_> {
    fn contains(&self, element: ElementId) -> bool {
        self.scene.contains(element)
    }

    fn perform(&mut self, step: &Step) {
        let now = self.scheduler.now();
        match step {
            Step::AddClass { element, class } => {
                self.scene.add_class(*element, class);
                self.timeline.record(
                    now,
                    CardEvent::ClassAdded {
                        element: *element,
                        class: class.clone(),
                    },
                );
            }
            Step::SetStyle {
                element,
                property,
                value,
            } => {
                self.scene.set_style(*element, property, value);
                self.timeline.record(
                    now,
                    CardEvent::StyleSet {
                        element: *element,
                        property: property.clone(),
                        value: value.clone(),
                    },
                );
            }
            Step::Burst { count } => self.burst(*count),
            Step::TryAutoplay => match self.audio.as_mut() {
                Some(audio) => {
                    let change = audio.try_autoplay(self.scene);
                    self.timeline.record(now, CardEvent::Autoplay { change });
                }
                None => debug!("[CARD] No audio, skipping autoplay"),
            },
            Step::RepeatBurst { count, every } => {
                self.scheduler.schedule_in(
                    *every,
                    Task::PeriodicBurst {
                        count: *count,
                        every: *every,
                    },
                );
                self.timeline.record(
                    now,
                    CardEvent::PeriodicBurstsStarted {
                        count: *count,
                        every_ms: every.as_millis() as u64,
                    },
                );
            }
            Step::Wait { .. } => {}
        }
    }

    fn skip(&mut self, step: &Step) {
        if let Some(element) = step.target() {
            self.timeline
                .record(self.scheduler.now(), CardEvent::StepSkipped { element });
        }
    }
}
