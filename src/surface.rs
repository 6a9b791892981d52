//! Boundary between page logic and whatever renders it.
//!
//! `Page` never touches the DOM directly; it calls into a `Surface`. The browser
//! build uses [`crate::dom::DomSurface`], tests use a recording fake.

use crate::config::RevealOptions;
use crate::effects::{EffectNode, NodeId};

/// Page regions whose CSS classes the logic toggles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Hero,
    Main,
    /// Pre-answer block holding the final button.
    FinalContent,
    Answer,
    MusicToggle,
    Lightbox,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Hero,
    Final,
}

pub trait Surface {
    /// Add (`on = true`) or remove a class on a region.
    fn set_class(&mut self, region: Region, class: &str, on: bool);

    /// Momentary pressed look (scale-down) on a button.
    fn press_button(&mut self, button: Button);

    /// Append a decorative node to its container.
    fn spawn_effect(&mut self, node: &EffectNode);

    fn remove_effect(&mut self, id: NodeId);

    /// Hide reveal targets and fade each one in, once, when it scrolls into view.
    fn start_reveal(&mut self, options: &RevealOptions);

    /// Pick up gallery photos added since the last look. Photos already known
    /// keep their index.
    fn refresh_photos(&mut self);

    /// Number of gallery photos currently on the page.
    fn photo_count(&self) -> usize;

    /// Attach the click → lightbox handler to gallery photo `index`.
    fn bind_photo(&mut self, index: usize);

    fn set_lightbox_image(&mut self, src: &str, alt: &str);

    fn clear_lightbox_image(&mut self);

    fn set_page_scroll_locked(&mut self, locked: bool);

    /// Start the background track. The outcome arrives later as
    /// `Input::AudioStarted` or `Input::AudioFailed`.
    fn play_audio(&mut self);

    fn pause_audio(&mut self);

    /// Vertical parallax offset of the particle field, in px.
    fn set_particle_offset(&mut self, px: f64);
}
