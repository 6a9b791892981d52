//! Page timings, effect counts and other tunables.
//!
//! `PageConfig::default()` reproduces the shipped page. With the `serde` feature
//! every field can be overridden from JSON; missing fields keep their defaults.

/// Milliseconds on the page's virtual clock.
pub type Millis = u64;

/// Delays of the hero → main → answer reveal.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StageTimings {
    /// Hero button press → hero hidden.
    pub hero_exit_ms: Millis,
    /// Hero hidden → main content shown.
    pub main_enter_ms: Millis,
    /// Main content shown → gallery listeners bound.
    pub gallery_bind_ms: Millis,
    /// Final button press → answer un-hidden.
    pub answer_reveal_ms: Millis,
    /// Answer un-hidden → answer marked active (lets the CSS transition engage).
    pub answer_activate_ms: Millis,
}

impl Default for StageTimings {
    fn default() -> Self {
        Self {
            hero_exit_ms: 200,
            main_enter_ms: 400,
            gallery_bind_ms: 500,
            answer_reveal_ms: 200,
            answer_activate_ms: 100,
        }
    }
}

/// IntersectionObserver options for reveal-on-visibility.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RevealOptions {
    pub threshold: f64,
    pub root_margin: String,
    /// Selector of elements that fade/slide in when scrolled into view.
    pub selector: String,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "0px 0px -100px 0px".to_string(),
            selector: ".photo-item, .emotional-content, .final-content".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EffectTimings {
    pub particle_count: u32,
    pub heart_burst: u32,
    pub heart_stagger_ms: Millis,
    pub heart_interval_ms: Millis,
    pub heart_lifetime_ms: Millis,
    /// Stop the repeating hearts after this many interval hearts. `None` keeps
    /// them coming for the rest of the session.
    pub heart_limit: Option<u32>,
    pub sparkle_chance: f64,
    pub sparkle_lifetime_ms: Millis,
    pub confetti_count: u32,
    pub confetti_stagger_ms: Millis,
    pub confetti_lifetime_ms: Millis,
    /// Particle container moves this fraction of the scroll offset.
    pub parallax_factor: f64,
}

impl Default for EffectTimings {
    fn default() -> Self {
        Self {
            particle_count: 50,
            heart_burst: 20,
            heart_stagger_ms: 200,
            heart_interval_ms: 1000,
            heart_lifetime_ms: 3000,
            heart_limit: None,
            sparkle_chance: 0.05,
            sparkle_lifetime_ms: 600,
            confetti_count: 100,
            confetti_stagger_ms: 30,
            confetti_lifetime_ms: 4000,
            parallax_factor: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LightboxTimings {
    /// Source set → overlay marked active.
    pub settle_ms: Millis,
    /// Overlay closed → image source cleared.
    pub clear_ms: Millis,
}

impl Default for LightboxTimings {
    fn default() -> Self {
        Self {
            settle_ms: 50,
            clear_ms: 400,
        }
    }
}

/// Every tunable of the page in one place.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageConfig {
    pub stages: StageTimings,
    pub reveal: RevealOptions,
    pub effects: EffectTimings,
    pub lightbox: LightboxTimings,
    pub secret_word: String,
    pub secret_buffer_len: usize,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            stages: StageTimings::default(),
            reveal: RevealOptions::default(),
            effects: EffectTimings::default(),
            lightbox: LightboxTimings::default(),
            secret_word: "amor".to_string(),
            secret_buffer_len: 10,
        }
    }
}

impl PageConfig {
    /// Parse a (possibly partial) JSON override of the defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, crate::PageError> {
        serde_json::from_str(json).map_err(|e| crate::PageError::Config(e.to_string()))
    }
}
