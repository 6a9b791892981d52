//! Valentine page core crate.
//!
//! A single-page greeting: a hero screen, a scripted reveal of the main content
//! and the final answer, decorative particles / hearts / sparkles / confetti, a
//! background music toggle and a photo lightbox. Page logic is platform free
//! (see [`page::Page`]); the browser shell lives in [`dom`] and is started from
//! JS with `start_page()` once the document has loaded.

use wasm_bindgen::prelude::*;

pub mod audio;
pub mod config;
pub mod dom;
pub mod effects;
pub mod lightbox;
pub mod page;
pub mod rng;
pub mod secret;
pub mod stage;
pub mod surface;
pub mod timeline;

pub use config::{Millis, PageConfig};
pub use page::{Input, Page, Task};
pub use surface::{Button, Region, Surface};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("required element #{0} is missing")]
    MissingElement(&'static str),
    #[error("element #{id} is not a {expected}")]
    WrongElementType {
        id: &'static str,
        expected: &'static str,
    },
    #[error("page already started")]
    AlreadyStarted,
    #[error("invalid config: {0}")]
    Config(String),
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for PageError {
    fn from(value: JsValue) -> Self {
        PageError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<PageError> for JsValue {
    fn from(err: PageError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Bind the page to the loaded document with the default timings.
#[wasm_bindgen]
pub fn start_page() -> Result<(), JsValue> {
    dom::mount(PageConfig::default()).map_err(JsValue::from)
}

/// Like `start_page`, with a partial JSON override of [`PageConfig`].
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_page_with_config(json: &str) -> Result<(), JsValue> {
    let config = PageConfig::from_json(json)?;
    dom::mount(config).map_err(JsValue::from)
}

/// Stop the repeating hearts on the answer screen.
#[wasm_bindgen]
pub fn stop_hearts() -> bool {
    dom::with_page(|page| page.stop_hearts()).unwrap_or(false)
}
