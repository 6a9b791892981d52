//! Browser shell: binds the page markup to [`Page`](crate::page::Page) through
//! `web-sys`.
//!
//! Required elements are looked up once at startup; a missing one fails
//! `start_page()` instead of surfacing later as a broken button.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, Element, HtmlAudioElement, HtmlElement, HtmlImageElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit,
};

use crate::PageError;
use crate::config::RevealOptions;
use crate::effects::{EFFECT_STYLES, EffectNode, Layer, NodeId};
use crate::page::Input;
use crate::surface::{Button, Region, Surface};

mod events;

pub use events::{mount, now_ms, with_page};
pub(crate) use events::dispatch;

const STYLE_ID: &str = "valentine-effect-styles";
const PHOTO_SELECTOR: &str = ".photo-gallery .photo-item img";

/// Handles to every element the page drives.
#[derive(Clone)]
pub struct Elements {
    pub hero: HtmlElement,
    pub hero_button: HtmlElement,
    pub main: HtmlElement,
    pub final_button: HtmlElement,
    pub final_content: HtmlElement,
    pub answer: HtmlElement,
    pub music_toggle: HtmlElement,
    pub audio: HtmlAudioElement,
    pub particles: HtmlElement,
    pub hearts: HtmlElement,
    pub lightbox: HtmlElement,
    pub lightbox_img: HtmlImageElement,
    pub body: HtmlElement,
}

fn element<T: JsCast>(doc: &Document, id: &'static str, expected: &'static str) -> Result<T, PageError> {
    doc.get_element_by_id(id)
        .ok_or(PageError::MissingElement(id))?
        .dyn_into::<T>()
        .map_err(|_| PageError::WrongElementType { id, expected })
}

impl Elements {
    pub fn find(doc: &Document) -> Result<Self, PageError> {
        Ok(Self {
            hero: element(doc, "heroSection", "HtmlElement")?,
            hero_button: element(doc, "heroButton", "HtmlElement")?,
            main: element(doc, "mainContent", "HtmlElement")?,
            final_button: element(doc, "finalButton", "HtmlElement")?,
            final_content: element(doc, "finalContent", "HtmlElement")?,
            answer: element(doc, "answerContent", "HtmlElement")?,
            music_toggle: element(doc, "musicToggle", "HtmlElement")?,
            audio: element(doc, "backgroundMusic", "HtmlAudioElement")?,
            particles: element(doc, "particles", "HtmlElement")?,
            hearts: element(doc, "heartsAnimation", "HtmlElement")?,
            lightbox: element(doc, "lightbox", "HtmlElement")?,
            lightbox_img: element(doc, "lightboxImg", "HtmlImageElement")?,
            body: doc.body().ok_or(PageError::MissingElement("body"))?,
        })
    }

    fn region(&self, region: Region) -> &HtmlElement {
        match region {
            Region::Hero => &self.hero,
            Region::Main => &self.main,
            Region::FinalContent => &self.final_content,
            Region::Answer => &self.answer,
            Region::MusicToggle => &self.music_toggle,
            Region::Lightbox => &self.lightbox,
        }
    }
}

/// `Surface` backed by the live document.
pub struct DomSurface {
    doc: Document,
    el: Elements,
    photos: Vec<HtmlImageElement>,
    live: HashMap<NodeId, Element>,
    reveal: Option<IntersectionObserver>,
}

impl DomSurface {
    pub fn new(doc: &Document) -> Result<Self, PageError> {
        let el = Elements::find(doc)?;
        let photos = query_all::<HtmlImageElement>(doc, PHOTO_SELECTOR)?;
        Ok(Self {
            doc: doc.clone(),
            el,
            photos,
            live: HashMap::new(),
            reveal: None,
        })
    }

    pub fn elements(&self) -> &Elements {
        &self.el
    }

    /// Effect nodes currently in the document.
    pub fn live_nodes(&self) -> usize {
        self.live.len()
    }

    fn layer(&self, layer: Layer) -> &HtmlElement {
        match layer {
            Layer::Particles => &self.el.particles,
            Layer::Hearts => &self.el.hearts,
            Layer::Body => &self.el.body,
        }
    }
}

fn query_all<T: JsCast>(doc: &Document, selector: &str) -> Result<Vec<T>, PageError> {
    let list = doc.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect())
}

/// Add the sparkle / confetti keyframes unless already present.
pub fn inject_effect_styles(doc: &Document) -> Result<(), PageError> {
    if doc.get_element_by_id(STYLE_ID).is_some() {
        return Ok(());
    }
    let style = doc.create_element("style")?;
    style.set_id(STYLE_ID);
    style.set_text_content(Some(EFFECT_STYLES));
    let head = doc.head().ok_or(PageError::MissingElement("head"))?;
    head.append_child(&style)?;
    Ok(())
}

impl Surface for DomSurface {
    fn set_class(&mut self, region: Region, class: &str, on: bool) {
        self.el.region(region).class_list().toggle_with_force(class, on).ok();
    }

    fn press_button(&mut self, button: Button) {
        let el = match button {
            Button::Hero => &self.el.hero_button,
            Button::Final => &self.el.final_button,
        };
        el.style().set_property("transform", "scale(0.95)").ok();
    }

    fn spawn_effect(&mut self, node: &EffectNode) {
        let Ok(div) = self.doc.create_element("div") else {
            return;
        };
        if let Some(class) = node.look.class() {
            div.class_list().add_1(class).ok();
        }
        div.set_attribute("style", &node.look.style()).ok();
        if self.layer(node.look.kind().layer()).append_child(&div).is_ok() {
            self.live.insert(node.id, div);
        }
    }

    fn remove_effect(&mut self, id: NodeId) {
        if let Some(el) = self.live.remove(&id) {
            el.remove();
        }
    }

    fn start_reveal(&mut self, options: &RevealOptions) {
        if self.reveal.is_some() {
            return;
        }
        let callback = Closure::wrap(Box::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let target = entry.target();
                    if let Some(el) = target.dyn_ref::<HtmlElement>() {
                        let style = el.style();
                        style.set_property("opacity", "1").ok();
                        style.set_property("transform", "translateY(0)").ok();
                    }
                    // One-shot: scrolling back out does not hide it again.
                    observer.unobserve(&target);
                }
            },
        )
            as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);
        let observer = match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
            Ok(o) => o,
            Err(e) => {
                log::warn!("reveal-on-scroll unavailable: {e:?}");
                return;
            }
        };
        callback.forget();
        let targets = query_all::<HtmlElement>(&self.doc, &options.selector).unwrap_or_default();
        for el in &targets {
            let style = el.style();
            style.set_property("opacity", "0").ok();
            style.set_property("transform", "translateY(30px)").ok();
            style
                .set_property("transition", "all 0.8s cubic-bezier(0.4, 0, 0.2, 1)")
                .ok();
            observer.observe(el);
        }
        log::info!("reveal: observing {} elements", targets.len());
        self.reveal = Some(observer);
    }

    fn refresh_photos(&mut self) {
        match query_all::<HtmlImageElement>(&self.doc, PHOTO_SELECTOR) {
            Ok(found) => {
                for img in found {
                    if !self.photos.contains(&img) {
                        self.photos.push(img);
                    }
                }
            }
            Err(e) => log::warn!("gallery lookup failed: {e}"),
        }
    }

    fn photo_count(&self) -> usize {
        self.photos.len()
    }

    fn bind_photo(&mut self, index: usize) {
        let Some(img) = self.photos.get(index).cloned() else {
            return;
        };
        img.style().set_property("cursor", "pointer").ok();
        let target = img.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            evt.prevent_default();
            evt.stop_propagation();
            dispatch(Input::PhotoClicked {
                src: target.src(),
                alt: target.alt(),
            });
        }) as Box<dyn FnMut(_)>);
        img.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }

    fn set_lightbox_image(&mut self, src: &str, alt: &str) {
        self.el.lightbox_img.set_src(src);
        self.el.lightbox_img.set_alt(alt);
    }

    fn clear_lightbox_image(&mut self) {
        self.el.lightbox_img.set_src("");
    }

    fn set_page_scroll_locked(&mut self, locked: bool) {
        let value = if locked { "hidden" } else { "" };
        self.el.body.style().set_property("overflow", value).ok();
    }

    fn play_audio(&mut self) {
        let started = self.el.audio.play();
        // Resolve off the current borrow of the page: the outcome is always
        // delivered from a microtask.
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = match started {
                Ok(promise) => JsFuture::from(promise).await.map(|_| ()),
                Err(e) => Err(e),
            };
            match outcome {
                Ok(()) => dispatch(Input::AudioStarted),
                Err(e) => dispatch(Input::AudioFailed(describe(&e))),
            }
        });
    }

    fn pause_audio(&mut self) {
        self.el.audio.pause().ok();
    }

    fn set_particle_offset(&mut self, px: f64) {
        self.el
            .particles
            .style()
            .set_property("transform", &format!("translateY({px}px)"))
            .ok();
    }
}

fn describe(err: &JsValue) -> String {
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
