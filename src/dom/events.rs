//! Page instance storage, input listeners and the frame loop.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, Element, Window, window};

use super::{DomSurface, Elements, inject_effect_styles};
use crate::PageError;
use crate::config::{Millis, PageConfig};
use crate::lightbox::ClickTarget;
use crate::page::{Input, Page};
use crate::rng::Rng;
use crate::surface::Surface;

// One page per document; empty until `mount` succeeds.
thread_local! {
    static PAGE: RefCell<Option<Page<DomSurface>>> = RefCell::new(None);
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub fn now_ms() -> Millis {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0) as Millis
}

/// Run `f` against the mounted page. `None` if not mounted, or if the page is
/// already borrowed further up the stack.
pub fn with_page<R>(f: impl FnOnce(&mut Page<DomSurface>) -> R) -> Option<R> {
    PAGE.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => slot.as_mut().map(f),
        Err(_) => {
            log::warn!("page busy, event dropped");
            None
        }
    })
}

pub(crate) fn dispatch(input: Input) {
    let now = now_ms();
    with_page(|page| page.handle(now, input));
}

/// Bind to the loaded document and start the page.
pub fn mount(config: PageConfig) -> Result<(), PageError> {
    if PAGE.with(|cell| cell.borrow().is_some()) {
        return Err(PageError::AlreadyStarted);
    }
    let win = window().ok_or(PageError::NoWindow)?;
    let doc = win.document().ok_or(PageError::NoDocument)?;

    let surface = DomSurface::new(&doc)?;
    let elements = surface.elements().clone();
    inject_effect_styles(&doc)?;
    log::info!("DOM ready: {} gallery photos found", surface.photo_count());

    let mut page = Page::new(config, surface, Rng::from_entropy());
    page.start(now_ms());
    install(page, || wire_listeners(&win, &doc, &elements))?;
    start_frame_loop();

    log::info!("💝 Valentine page ready");
    log::info!("✨ Easter egg: type \"{}\" for a surprise", secret_word());
    Ok(())
}

/// Store the page only once `wire` succeeded, so a failed mount can be retried.
/// Listeners wired before the failure stay inert: they find no page.
fn install(
    page: Page<DomSurface>,
    wire: impl FnOnce() -> Result<(), PageError>,
) -> Result<(), PageError> {
    wire()?;
    PAGE.with(|cell| cell.replace(Some(page)));
    Ok(())
}

fn secret_word() -> String {
    with_page(|page| page.secret().target().to_string()).unwrap_or_default()
}

fn on_click(target: &Element, input: Input) -> Result<(), PageError> {
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
        dispatch(input.clone());
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire_listeners(win: &Window, doc: &Document, el: &Elements) -> Result<(), PageError> {
    on_click(&el.hero_button, Input::HeroClicked)?;
    on_click(&el.final_button, Input::FinalClicked)?;
    on_click(&el.music_toggle, Input::MusicClicked)?;

    // Lightbox backdrop vs. picture
    {
        let lightbox: Element = el.lightbox.clone().into();
        let picture: Element = el.lightbox_img.clone().into();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let Some(target) = evt.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let hit = if target == picture {
                ClickTarget::Image
            } else if target == lightbox || target.class_list().contains("lightbox") {
                ClickTarget::Backdrop
            } else {
                ClickTarget::Other
            };
            dispatch(Input::LightboxClicked(hit));
        }) as Box<dyn FnMut(_)>);
        el.lightbox
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            evt.stop_propagation();
            log::debug!("lightbox picture clicked; staying open");
        }) as Box<dyn FnMut(_)>);
        el.lightbox_img
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Keyboard: Escape for the lightbox, printable keys for the secret word
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            let key = evt.key();
            if key == "Escape" {
                dispatch(Input::KeyDown(key));
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            dispatch(Input::KeyPress(evt.key()));
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keypress", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Cursor sparkles
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            dispatch(Input::MouseMoved {
                x: f64::from(evt.client_x()),
                y: f64::from(evt.client_y()),
            });
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Particle parallax
    {
        let scroll_win = win.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let offset = scroll_win.scroll_y().unwrap_or(0.0);
            dispatch(Input::Scrolled(offset));
        }) as Box<dyn FnMut(_)>);
        let opts = AddEventListenerOptions::new();
        opts.set_passive(true);
        win.add_event_listener_with_callback_and_add_event_listener_options(
            "scroll",
            closure.as_ref().unchecked_ref(),
            &opts,
        )?;
        closure.forget();
    }

    // No wheel / touch scrolling while the hero covers the page
    for kind in ["wheel", "touchmove"] {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
            if with_page(|page| page.should_suppress_scroll()).unwrap_or(false) {
                evt.prevent_default();
            }
        }) as Box<dyn FnMut(_)>);
        let opts = AddEventListenerOptions::new();
        opts.set_passive(false);
        win.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &opts,
        )?;
        closure.forget();
    }
    Ok(())
}

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_page(|page| page.tick(ts as Millis));
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const MARKUP: &str = r#"
<section id="heroSection" class="active"><button id="heroButton"></button></section>
<main id="mainContent"><div id="finalContent"><button id="finalButton"></button></div>
<div id="answerContent" class="hidden"></div></main>
<button id="musicToggle"></button><audio id="backgroundMusic"></audio>
<div id="particles"></div><div id="heartsAnimation"></div>
<div id="lightbox" class="lightbox"><img id="lightboxImg"></div>
"#;

    #[wasm_bindgen_test]
    fn failed_wiring_leaves_nothing_mounted() {
        let doc = window().unwrap().document().unwrap();
        doc.body().unwrap().set_inner_html(MARKUP);
        let surface = DomSurface::new(&doc).unwrap();
        let page = Page::new(PageConfig::default(), surface, Rng::new(7));

        let wired = install(page, || Err(PageError::Js("listener refused".into())));
        assert!(matches!(wired, Err(PageError::Js(_))));
        assert!(with_page(|_| ()).is_none());
        assert!(PAGE.with(|cell| cell.borrow().is_none()));
    }
}
