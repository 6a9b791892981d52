//! Background music toggle.
//!
//! Starting playback is asynchronous and may be refused by the browser
//! (autoplay policy, missing or undecodable file). The toggle only flips to
//! `Playing` once the start is confirmed, so a refused start leaves it
//! `Stopped` and the next click tries again.

use crate::surface::{Region, Surface};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MusicState {
    #[default]
    Stopped,
    Playing,
}

#[derive(Debug, Default)]
pub struct AudioToggle {
    state: MusicState,
    start_pending: bool,
    failures: u32,
}

impl AudioToggle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MusicState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == MusicState::Playing
    }

    /// A play request is out and has not resolved yet.
    pub fn start_pending(&self) -> bool {
        self.start_pending
    }

    /// Refused starts since the page loaded.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn toggle(&mut self, surface: &mut dyn Surface) {
        match self.state {
            MusicState::Playing => self.pause(surface),
            MusicState::Stopped => self.play(surface),
        }
    }

    /// Request playback. No-op while playing or while a request is in flight.
    pub fn play(&mut self, surface: &mut dyn Surface) {
        if self.is_playing() || self.start_pending {
            return;
        }
        self.start_pending = true;
        surface.play_audio();
    }

    pub fn pause(&mut self, surface: &mut dyn Surface) {
        surface.pause_audio();
        self.start_pending = false;
        self.state = MusicState::Stopped;
        surface.set_class(Region::MusicToggle, "playing", false);
    }

    /// The browser confirmed playback.
    pub fn on_started(&mut self, surface: &mut dyn Surface) {
        self.start_pending = false;
        self.state = MusicState::Playing;
        surface.set_class(Region::MusicToggle, "playing", true);
    }

    /// The browser refused playback. Logged only; state stays as it was.
    pub fn on_failed(&mut self, reason: &str) {
        self.start_pending = false;
        self.failures += 1;
        log::warn!("background music could not start: {reason}");
    }
}
