//! The page: composes the sequencer, effect emitters, lightbox, music toggle
//! and secret-code watcher, and routes inputs and due timers between them.
//!
//! Everything runs on one thread. Callers feed the current time in ms with
//! every call; delayed work lives on a single [`Timeline`] and runs from
//! [`Page::tick`] (or right after an input, for work due immediately).

use crate::audio::{AudioToggle, MusicState};
use crate::config::{Millis, PageConfig};
use crate::effects::{EffectPool, Look, NodeId};
use crate::lightbox::{ClickTarget, GalleryBinder, LightboxController, LightboxState};
use crate::rng::Rng;
use crate::secret::SecretCodeWatcher;
use crate::stage::{Sequencer, StageStep, ViewStage};
use crate::surface::{Button, Region, Surface};
use crate::timeline::{TimerId, Timeline};

/// User and browser events the page reacts to.
#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    HeroClicked,
    FinalClicked,
    MusicClicked,
    PhotoClicked { src: String, alt: String },
    LightboxClicked(ClickTarget),
    /// `keydown` key name; only Escape matters.
    KeyDown(String),
    /// `keypress` key text, fed to the secret-code watcher.
    KeyPress(String),
    MouseMoved { x: f64, y: f64 },
    Scrolled(f64),
    AudioStarted,
    AudioFailed(String),
}

/// Delayed work queued on the page timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    Stage(StageStep),
    Heart,
    /// Repeating heart after the opening burst.
    HeartTick,
    Confetti,
    Despawn(NodeId),
    LightboxActivate,
    LightboxClear,
}

pub struct Page<S: Surface> {
    config: PageConfig,
    surface: S,
    timeline: Timeline<Task>,
    rng: Rng,
    sequencer: Sequencer,
    effects: EffectPool,
    lightbox: LightboxController,
    gallery: GalleryBinder,
    audio: AudioToggle,
    secret: SecretCodeWatcher,
    hearts: Option<TimerId>,
    interval_hearts: u32,
    confetti_bursts: u32,
    started: bool,
}

impl<S: Surface> Page<S> {
    pub fn new(config: PageConfig, surface: S, rng: Rng) -> Self {
        let secret = SecretCodeWatcher::new(&config.secret_word, config.secret_buffer_len);
        Self {
            config,
            surface,
            timeline: Timeline::new(),
            rng,
            sequencer: Sequencer::new(),
            effects: EffectPool::new(),
            lightbox: LightboxController::new(),
            gallery: GalleryBinder::new(),
            audio: AudioToggle::new(),
            secret,
            hearts: None,
            interval_hearts: 0,
            confetti_bursts: 0,
            started: false,
        }
    }

    /// Lay down the ambient particle field. Runs once.
    pub fn start(&mut self, now: Millis) {
        if self.started {
            return;
        }
        self.started = true;
        self.timeline.set_now(now);
        for _ in 0..self.config.effects.particle_count {
            let look = Look::particle(&mut self.rng);
            self.effects.emit(look, None, &mut self.timeline, &mut self.surface);
        }
        log::info!("page started: {} particles", self.config.effects.particle_count);
    }

    /// Run every task due at or before `now`.
    pub fn tick(&mut self, now: Millis) {
        while let Some((_, task)) = self.timeline.pop_due(now) {
            self.run(task);
        }
        self.timeline.set_now(now);
    }

    pub fn handle(&mut self, now: Millis, input: Input) {
        self.tick(now);
        match input {
            Input::HeroClicked => self.advance_to_main(),
            Input::FinalClicked => self.advance_to_answer(),
            Input::MusicClicked => self.audio.toggle(&mut self.surface),
            Input::PhotoClicked { src, alt } => self.lightbox.open(
                &src,
                &alt,
                &self.config.lightbox,
                &mut self.timeline,
                &mut self.surface,
            ),
            Input::LightboxClicked(target) => {
                self.lightbox
                    .click(target, &self.config.lightbox, &mut self.timeline, &mut self.surface);
            }
            Input::KeyDown(key) => {
                if key == "Escape" {
                    self.lightbox
                        .escape(&self.config.lightbox, &mut self.timeline, &mut self.surface);
                }
            }
            Input::KeyPress(key) => {
                if self.secret.push_key(&key) {
                    self.burst_confetti();
                }
            }
            Input::MouseMoved { x, y } => {
                if self.rng.chance(self.config.effects.sparkle_chance) {
                    let lifetime = Some(self.config.effects.sparkle_lifetime_ms);
                    self.effects
                        .emit(Look::sparkle(x, y), lifetime, &mut self.timeline, &mut self.surface);
                }
            }
            Input::Scrolled(offset) => {
                self.surface
                    .set_particle_offset(offset * self.config.effects.parallax_factor);
            }
            Input::AudioStarted => self.audio.on_started(&mut self.surface),
            Input::AudioFailed(reason) => self.audio.on_failed(&reason),
        }
        self.tick(now);
    }

    /// Wheel/touch scrolling is blocked while the hero covers the page.
    pub fn should_suppress_scroll(&self) -> bool {
        self.sequencer.hero_visible()
    }

    /// Stop the repeating hearts. Returns false if they were not running.
    pub fn stop_hearts(&mut self) -> bool {
        match self.hearts.take() {
            Some(timer) => {
                log::info!("hearts stopped after {} interval hearts", self.interval_hearts);
                self.timeline.cancel(timer)
            }
            None => false,
        }
    }

    pub fn hearts_running(&self) -> bool {
        self.hearts.is_some()
    }

    pub fn stage(&self) -> ViewStage {
        self.sequencer.stage()
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn music(&self) -> MusicState {
        self.audio.state()
    }

    pub fn audio(&self) -> &AudioToggle {
        &self.audio
    }

    pub fn lightbox(&self) -> &LightboxState {
        self.lightbox.state()
    }

    pub fn secret(&self) -> &SecretCodeWatcher {
        &self.secret
    }

    pub fn effects(&self) -> &EffectPool {
        &self.effects
    }

    pub fn gallery(&self) -> &GalleryBinder {
        &self.gallery
    }

    pub fn confetti_bursts(&self) -> u32 {
        self.confetti_bursts
    }

    pub fn pending_tasks(&self) -> usize {
        self.timeline.len()
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn advance_to_main(&mut self) {
        if !self.sequencer.advance_to_main() {
            log::debug!("hero click ignored in {:?}", self.sequencer.stage());
            return;
        }
        log::info!("stage: hero -> main");
        self.run_step(StageStep::PressHero);
    }

    fn advance_to_answer(&mut self) {
        if !self.sequencer.advance_to_answer() {
            log::debug!("final click ignored in {:?}", self.sequencer.stage());
            return;
        }
        log::info!("stage: main -> answer");
        self.run_step(StageStep::PressFinal);
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::Stage(step) => self.run_step(step),
            Task::Heart => self.spawn_heart(),
            Task::HeartTick => {
                self.spawn_heart();
                self.interval_hearts += 1;
                if let Some(limit) = self.config.effects.heart_limit {
                    if self.interval_hearts >= limit {
                        self.stop_hearts();
                    }
                }
            }
            Task::Confetti => {
                let lifetime = Some(self.config.effects.confetti_lifetime_ms);
                let look = Look::confetti(&mut self.rng);
                self.effects
                    .emit(look, lifetime, &mut self.timeline, &mut self.surface);
            }
            Task::Despawn(id) => {
                self.effects.despawn(id, &mut self.surface);
            }
            Task::LightboxActivate => self.lightbox.on_activate(&mut self.surface),
            Task::LightboxClear => self.lightbox.on_clear(&mut self.surface),
        }
    }

    fn run_step(&mut self, step: StageStep) {
        match step {
            StageStep::PressHero => {
                self.surface.press_button(Button::Hero);
                self.audio.play(&mut self.surface);
            }
            StageStep::HideHero => self.surface.set_class(Region::Hero, "active", false),
            StageStep::ShowMain => {
                self.surface.set_class(Region::Main, "active", true);
                self.surface.start_reveal(&self.config.reveal);
            }
            StageStep::BindGallery => {
                self.gallery.bind_all(&mut self.surface);
            }
            StageStep::PressFinal => self.surface.press_button(Button::Final),
            StageStep::RevealAnswer => {
                self.surface.set_class(Region::FinalContent, "hidden", true);
                self.surface.set_class(Region::Answer, "hidden", false);
                self.start_hearts();
                self.audio.play(&mut self.surface);
            }
            StageStep::ActivateAnswer => self.surface.set_class(Region::Answer, "active", true),
        }
        self.sequencer
            .complete(step, &self.config.stages, &mut self.timeline);
    }

    fn start_hearts(&mut self) {
        let fx = &self.config.effects;
        for i in 0..fx.heart_burst {
            self.timeline
                .schedule_after(u64::from(i) * fx.heart_stagger_ms, Task::Heart);
        }
        if self.hearts.is_none() && fx.heart_limit != Some(0) {
            self.hearts = Some(self.timeline.schedule_every(fx.heart_interval_ms, Task::HeartTick));
        }
    }

    fn spawn_heart(&mut self) {
        let lifetime = Some(self.config.effects.heart_lifetime_ms);
        let look = Look::heart(&mut self.rng);
        self.effects
            .emit(look, lifetime, &mut self.timeline, &mut self.surface);
    }

    fn burst_confetti(&mut self) {
        self.confetti_bursts += 1;
        log::info!("secret word typed: confetti burst #{}", self.confetti_bursts);
        let fx = &self.config.effects;
        for i in 0..fx.confetti_count {
            self.timeline
                .schedule_after(u64::from(i) * fx.confetti_stagger_ms, Task::Confetti);
        }
    }
}
