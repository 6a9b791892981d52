// Recording Surface used by the native integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;

use valentine_page::config::RevealOptions;
use valentine_page::effects::{EffectKind, EffectNode, NodeId};
use valentine_page::rng::Rng;
use valentine_page::{Button, Page, PageConfig, Region, Surface};

#[derive(Default)]
pub struct Recorder {
    pub classes: BTreeMap<(Region, String), bool>,
    pub presses: Vec<Button>,
    pub live: BTreeMap<NodeId, EffectNode>,
    pub removed: Vec<NodeId>,
    pub reveals: u32,
    pub photos: usize,
    pub photo_refreshes: u32,
    /// Click handlers attached per photo index.
    pub handlers: BTreeMap<usize, u32>,
    pub image: Option<(String, String)>,
    pub image_loads: u32,
    pub scroll_locked: bool,
    pub play_requests: u32,
    pub pauses: u32,
    pub particle_offset: f64,
}

impl Recorder {
    pub fn with_photos(photos: usize) -> Self {
        Self {
            photos,
            ..Self::default()
        }
    }

    pub fn class(&self, region: Region, class: &str) -> Option<bool> {
        self.classes.get(&(region, class.to_string())).copied()
    }

    pub fn live_of(&self, kind: EffectKind) -> usize {
        self.live.values().filter(|n| n.look.kind() == kind).count()
    }
}

impl Surface for Recorder {
    fn set_class(&mut self, region: Region, class: &str, on: bool) {
        self.classes.insert((region, class.to_string()), on);
    }

    fn press_button(&mut self, button: Button) {
        self.presses.push(button);
    }

    fn spawn_effect(&mut self, node: &EffectNode) {
        self.live.insert(node.id, node.clone());
    }

    fn remove_effect(&mut self, id: NodeId) {
        self.live.remove(&id);
        self.removed.push(id);
    }

    fn start_reveal(&mut self, _options: &RevealOptions) {
        self.reveals += 1;
    }

    fn refresh_photos(&mut self) {
        self.photo_refreshes += 1;
    }

    fn photo_count(&self) -> usize {
        self.photos
    }

    fn bind_photo(&mut self, index: usize) {
        *self.handlers.entry(index).or_default() += 1;
    }

    fn set_lightbox_image(&mut self, src: &str, alt: &str) {
        self.image = Some((src.to_string(), alt.to_string()));
        self.image_loads += 1;
    }

    fn clear_lightbox_image(&mut self) {
        self.image = None;
    }

    fn set_page_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn play_audio(&mut self) {
        self.play_requests += 1;
    }

    fn pause_audio(&mut self) {
        self.pauses += 1;
    }

    fn set_particle_offset(&mut self, px: f64) {
        self.particle_offset = px;
    }
}

pub fn page_with(config: PageConfig) -> Page<Recorder> {
    let mut page = Page::new(config, Recorder::with_photos(3), Rng::new(0x5eed));
    page.start(0);
    page
}

pub fn page() -> Page<Recorder> {
    page_with(PageConfig::default())
}
