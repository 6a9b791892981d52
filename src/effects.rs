//! Decorative effect nodes: background particles, floating hearts, cursor
//! sparkles and confetti.
//!
//! Every emitter follows the same pattern: randomize a [`Look`], append it to
//! its container through the [`Surface`], and queue its removal on the
//! [`Timeline`]. Particles are the one kind that is never removed.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::config::Millis;
use crate::page::Task;
use crate::rng::Rng;
use crate::surface::Surface;
use crate::timeline::{TimerId, Timeline};

pub const CONFETTI_PALETTE: [&str; 3] = ["#c9a227", "#5a0e1a", "#f5f5f5"];
pub const SPARKLE_COLOR: &str = "#c9a227";

/// Keyframes and the heart-size rule the effects rely on. Injected once at
/// startup unless the page stylesheet already carries them.
pub const EFFECT_STYLES: &str = "
@keyframes sparkle {
    0% { opacity: 1; transform: scale(0); }
    100% { opacity: 0; transform: scale(1); }
}
@keyframes confettiFall {
    to { transform: translateY(100vh) rotate(720deg); opacity: 0; }
}
.heart::before,
.heart::after {
    width: var(--heart-size, 30px);
    height: var(--heart-size, 30px);
}
";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EffectKind {
    Particle,
    Heart,
    Sparkle,
    Confetti,
}

/// Which element an effect node is appended to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Particles,
    Hearts,
    Body,
}

impl EffectKind {
    pub fn layer(self) -> Layer {
        match self {
            EffectKind::Particle => Layer::Particles,
            EffectKind::Heart => Layer::Hearts,
            EffectKind::Sparkle | EffectKind::Confetti => Layer::Body,
        }
    }
}

/// Randomized visual parameters of one node.
#[derive(Clone, Debug, PartialEq)]
pub enum Look {
    Particle {
        left_pct: f64,
        top_pct: f64,
        delay_s: f64,
        duration_s: f64,
    },
    Heart {
        left_pct: f64,
        delay_s: f64,
        size_px: f64,
    },
    Sparkle {
        x: f64,
        y: f64,
    },
    Confetti {
        left_pct: f64,
        color: &'static str,
        fall_s: f64,
        rotation_deg: f64,
    },
}

impl Look {
    pub fn particle(rng: &mut Rng) -> Self {
        Look::Particle {
            left_pct: rng.range(0.0, 100.0),
            top_pct: rng.range(0.0, 100.0),
            delay_s: rng.range(0.0, 20.0),
            duration_s: rng.range(15.0, 25.0),
        }
    }

    pub fn heart(rng: &mut Rng) -> Self {
        Look::Heart {
            left_pct: rng.range(0.0, 100.0),
            delay_s: rng.range(0.0, 2.0),
            size_px: rng.range(20.0, 40.0),
        }
    }

    pub fn sparkle(x: f64, y: f64) -> Self {
        Look::Sparkle { x, y }
    }

    pub fn confetti(rng: &mut Rng) -> Self {
        Look::Confetti {
            left_pct: rng.range(0.0, 100.0),
            color: rng.pick(&CONFETTI_PALETTE).copied().unwrap_or(CONFETTI_PALETTE[0]),
            fall_s: rng.range(2.0, 4.0),
            rotation_deg: rng.range(0.0, 360.0),
        }
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            Look::Particle { .. } => EffectKind::Particle,
            Look::Heart { .. } => EffectKind::Heart,
            Look::Sparkle { .. } => EffectKind::Sparkle,
            Look::Confetti { .. } => EffectKind::Confetti,
        }
    }

    /// Stylesheet class carrying the animation, if the kind has one.
    pub fn class(&self) -> Option<&'static str> {
        match self {
            Look::Particle { .. } => Some("particle"),
            Look::Heart { .. } => Some("heart"),
            Look::Sparkle { .. } | Look::Confetti { .. } => None,
        }
    }

    /// Inline style for the node.
    pub fn style(&self) -> String {
        let mut s = String::new();
        match *self {
            Look::Particle {
                left_pct,
                top_pct,
                delay_s,
                duration_s,
            } => {
                let _ = write!(
                    s,
                    "left:{left_pct:.2}%;top:{top_pct:.2}%;animation-delay:{delay_s:.2}s;animation-duration:{duration_s:.2}s"
                );
            }
            Look::Heart {
                left_pct,
                delay_s,
                size_px,
            } => {
                let _ = write!(
                    s,
                    "left:{left_pct:.2}%;animation-delay:{delay_s:.2}s;width:{size_px:.1}px;height:{size_px:.1}px;--heart-size:{size_px:.1}px"
                );
            }
            Look::Sparkle { x, y } => {
                let _ = write!(
                    s,
                    "position:fixed;left:{x}px;top:{y}px;width:4px;height:4px;background:{SPARKLE_COLOR};\
                     border-radius:50%;pointer-events:none;z-index:9999;animation:sparkle 0.6s ease-out forwards"
                );
            }
            Look::Confetti {
                left_pct,
                color,
                fall_s,
                rotation_deg,
            } => {
                let _ = write!(
                    s,
                    "position:fixed;left:{left_pct:.2}%;top:-10px;width:10px;height:10px;background:{color};\
                     opacity:0.8;z-index:9999;pointer-events:none;animation:confettiFall {fall_s:.2}s linear forwards;\
                     transform:rotate({rotation_deg:.1}deg)"
                );
            }
        }
        s
    }
}

/// A node handed to the surface.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectNode {
    pub id: NodeId,
    pub look: Look,
    pub spawned_at: Millis,
    /// `None` for ambient nodes that stay for the whole session.
    pub expires_at: Option<Millis>,
}

/// Returned by [`EffectPool::emit`]; removes the node early when passed to
/// [`EffectPool::dispose`].
#[derive(Debug)]
pub struct Disposer {
    id: NodeId,
    removal: Option<TimerId>,
}

impl Disposer {
    pub fn id(&self) -> NodeId {
        self.id
    }
}

/// Tracks live effect nodes and their scheduled removals.
#[derive(Default)]
pub struct EffectPool {
    next_id: u64,
    live: BTreeMap<NodeId, EffectKind>,
    spawned: BTreeMap<EffectKind, u64>,
}

impl EffectPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `look` and, with a lifetime, queue its removal.
    pub fn emit(
        &mut self,
        look: Look,
        lifetime: Option<Millis>,
        timeline: &mut Timeline<Task>,
        surface: &mut dyn Surface,
    ) -> Disposer {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        let now = timeline.now();
        let kind = look.kind();
        let node = EffectNode {
            id,
            look,
            spawned_at: now,
            expires_at: lifetime.map(|l| now + l),
        };
        surface.spawn_effect(&node);
        self.live.insert(id, kind);
        *self.spawned.entry(kind).or_default() += 1;
        let removal = lifetime.map(|l| timeline.schedule_after(l, Task::Despawn(id)));
        Disposer { id, removal }
    }

    /// Remove a node whose lifetime elapsed. Unknown ids are ignored.
    pub fn despawn(&mut self, id: NodeId, surface: &mut dyn Surface) -> bool {
        if self.live.remove(&id).is_some() {
            surface.remove_effect(id);
            true
        } else {
            false
        }
    }

    /// Remove a node now and drop its pending removal.
    pub fn dispose(
        &mut self,
        disposer: Disposer,
        timeline: &mut Timeline<Task>,
        surface: &mut dyn Surface,
    ) -> bool {
        if let Some(timer) = disposer.removal {
            timeline.cancel(timer);
        }
        self.despawn(disposer.id, surface)
    }

    pub fn live(&self, kind: EffectKind) -> usize {
        self.live.values().filter(|k| **k == kind).count()
    }

    pub fn live_total(&self) -> usize {
        self.live.len()
    }

    /// Nodes of `kind` emitted since the page started.
    pub fn spawned(&self, kind: EffectKind) -> u64 {
        self.spawned.get(&kind).copied().unwrap_or(0)
    }
}
