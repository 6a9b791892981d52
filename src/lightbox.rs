//! Full-screen photo viewer and the gallery photos that open it.

use std::collections::BTreeSet;

use crate::config::LightboxTimings;
use crate::page::Task;
use crate::surface::{Region, Surface};
use crate::timeline::{TimerId, Timeline};

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum LightboxState {
    #[default]
    Closed,
    Open { src: String, alt: String },
}

/// What a click inside the lightbox landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    /// The overlay itself, outside the picture.
    Backdrop,
    /// The displayed picture.
    Image,
    Other,
}

#[derive(Debug, Default)]
pub struct LightboxController {
    state: LightboxState,
    activate: Option<TimerId>,
    clear: Option<TimerId>,
    /// The overlay carries `active`.
    shown: bool,
}

impl LightboxController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LightboxState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, LightboxState::Open { .. })
    }

    /// Load the picture first, show the overlay after `settle_ms` so the old
    /// picture never flashes. A source clear still pending from an earlier
    /// close is dropped.
    pub fn open(
        &mut self,
        src: &str,
        alt: &str,
        timings: &LightboxTimings,
        timeline: &mut Timeline<Task>,
        surface: &mut dyn Surface,
    ) {
        if let Some(timer) = self.clear.take() {
            timeline.cancel(timer);
        }
        if let Some(timer) = self.activate.take() {
            timeline.cancel(timer);
        }
        log::info!("lightbox: opening {src}");
        surface.set_lightbox_image(src, alt);
        surface.set_page_scroll_locked(true);
        self.state = LightboxState::Open {
            src: src.to_string(),
            alt: alt.to_string(),
        };
        self.activate = Some(timeline.schedule_after(timings.settle_ms, Task::LightboxActivate));
    }

    pub fn on_activate(&mut self, surface: &mut dyn Surface) {
        self.activate = None;
        if self.is_open() {
            self.shown = true;
            surface.set_class(Region::Lightbox, "active", true);
        }
    }

    /// Open and past the settle delay.
    pub fn is_shown(&self) -> bool {
        self.shown
    }

    /// Close on a backdrop click. Clicks on the picture never close it.
    pub fn click(
        &mut self,
        target: ClickTarget,
        timings: &LightboxTimings,
        timeline: &mut Timeline<Task>,
        surface: &mut dyn Surface,
    ) -> bool {
        if target != ClickTarget::Backdrop {
            log::debug!("lightbox: click on {target:?} ignored");
            return false;
        }
        self.close(timings, timeline, surface)
    }

    /// Escape key: closes only once the overlay is shown.
    pub fn escape(
        &mut self,
        timings: &LightboxTimings,
        timeline: &mut Timeline<Task>,
        surface: &mut dyn Surface,
    ) -> bool {
        if !self.shown {
            return false;
        }
        self.close(timings, timeline, surface)
    }

    fn close(
        &mut self,
        timings: &LightboxTimings,
        timeline: &mut Timeline<Task>,
        surface: &mut dyn Surface,
    ) -> bool {
        if !self.is_open() {
            return false;
        }
        if let Some(timer) = self.activate.take() {
            timeline.cancel(timer);
        }
        log::info!("lightbox: closing");
        self.shown = false;
        surface.set_class(Region::Lightbox, "active", false);
        surface.set_page_scroll_locked(false);
        self.state = LightboxState::Closed;
        self.clear = Some(timeline.schedule_after(timings.clear_ms, Task::LightboxClear));
        true
    }

    /// Close transition finished: release the picture.
    pub fn on_clear(&mut self, surface: &mut dyn Surface) {
        self.clear = None;
        if !self.is_open() {
            surface.clear_lightbox_image();
        }
    }
}

/// Remembers which gallery photos already carry a click handler so binding can
/// be repeated safely.
#[derive(Debug, Default)]
pub struct GalleryBinder {
    bound: BTreeSet<usize>,
}

impl GalleryBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind every photo not bound yet. Returns how many were newly bound.
    pub fn bind_all(&mut self, surface: &mut dyn Surface) -> usize {
        surface.refresh_photos();
        let count = surface.photo_count();
        let mut added = 0;
        for index in 0..count {
            if self.bound.insert(index) {
                surface.bind_photo(index);
                added += 1;
            }
        }
        log::info!("gallery: {count} photos, {added} newly bound");
        added
    }

    pub fn bound(&self) -> usize {
        self.bound.len()
    }
}
