// Decorative effects and the secret-word easter egg, driven through Page on
// virtual time.

mod common;

use common::{Recorder, page, page_with};
use valentine_page::config::EffectTimings;
use valentine_page::effects::{EffectKind, EffectPool, Look};
use valentine_page::rng::Rng;
use valentine_page::timeline::Timeline;
use valentine_page::{Input, Millis, Page, PageConfig};

fn type_keys(p: &mut Page<Recorder>, at: Millis, keys: &str) {
    for (i, c) in keys.chars().enumerate() {
        p.handle(at + i as Millis, Input::KeyPress(c.to_string()));
    }
}

/// Step the clock and check that no node outlives its deadline.
fn step_checking_deadlines(p: &mut Page<Recorder>, from: Millis, to: Millis) {
    let mut now = from;
    while now <= to {
        p.tick(now);
        for node in p.surface().live.values() {
            if let Some(deadline) = node.expires_at {
                assert!(deadline > now, "{:?} still live at {now}, deadline {deadline}", node.look.kind());
            }
        }
        now += 10;
    }
}

/// Advance in ~60fps frames, the way the browser's frame loop ticks the page.
fn run_frames(p: &mut Page<Recorder>, from: Millis, to: Millis) {
    let mut now = from;
    while now < to {
        now = (now + 16).min(to);
        p.tick(now);
    }
}

fn reach_answer(p: &mut Page<Recorder>) -> Millis {
    p.handle(0, Input::HeroClicked);
    p.tick(600);
    p.handle(700, Input::FinalClicked);
    p.tick(900);
    900
}

// --- Particles -----------------------------------------------------------------

#[test]
fn particle_field_is_laid_once_and_stays() {
    let mut p = page();
    p.start(5);
    assert_eq!(p.surface().live_of(EffectKind::Particle), 50);
    p.tick(3_600_000);
    assert_eq!(p.surface().live_of(EffectKind::Particle), 50);
    assert!(p.surface().live.values().all(|n| n.expires_at.is_none()));
}

// --- Hearts --------------------------------------------------------------------

#[test]
fn hearts_burst_then_keep_coming() {
    let mut p = page();
    let t = reach_answer(&mut p);
    // Burst: one per 200ms starting at the reveal; interval: every 1000ms.
    run_frames(&mut p, t, t + 3_800);
    assert_eq!(p.effects().spawned(EffectKind::Heart), 20 + 3);
    run_frames(&mut p, t + 3_800, t + 60_000);
    assert_eq!(p.effects().spawned(EffectKind::Heart), 20 + 60);
    assert!(p.hearts_running());
    // Only the last three seconds of hearts are on screen.
    assert!(p.surface().live_of(EffectKind::Heart) <= 3);
}

#[test]
fn hearts_are_removed_after_three_seconds() {
    let mut p = page();
    let t = reach_answer(&mut p);
    step_checking_deadlines(&mut p, t, t + 10_000);
    for node in p.surface().live.values().filter(|n| n.look.kind() == EffectKind::Heart) {
        assert_eq!(node.expires_at, Some(node.spawned_at + 3_000));
    }
}

#[test]
fn hidden_tab_gap_does_not_replay_missed_hearts() {
    let mut p = page();
    let t = reach_answer(&mut p);
    run_frames(&mut p, t, t + 5_000);
    let before = p.effects().spawned(EffectKind::Heart);
    assert_eq!(before, 20 + 5);

    // No frames for ten minutes, then one frame.
    let back = t + 5_000 + 600_000;
    p.tick(back);
    assert_eq!(p.effects().spawned(EffectKind::Heart), before + 1);
    // The late heart is stamped at the latest missed period, so it is still on screen.
    assert_eq!(p.surface().live_of(EffectKind::Heart), 1);
    assert!(p.hearts_running());

    run_frames(&mut p, back, back + 1_000);
    assert_eq!(p.effects().spawned(EffectKind::Heart), before + 2);
}

#[test]
fn stopping_hearts_ends_the_interval() {
    let mut p = page();
    let t = reach_answer(&mut p);
    p.tick(t + 4_000);
    assert!(p.stop_hearts());
    assert!(!p.stop_hearts());
    let so_far = p.effects().spawned(EffectKind::Heart);
    p.tick(t + 60_000);
    assert_eq!(p.effects().spawned(EffectKind::Heart), so_far);
    assert_eq!(p.surface().live_of(EffectKind::Heart), 0);
}

#[test]
fn heart_limit_caps_interval_hearts() {
    let config = PageConfig {
        effects: EffectTimings {
            heart_limit: Some(2),
            ..EffectTimings::default()
        },
        ..PageConfig::default()
    };
    let mut p = page_with(config);
    let t = reach_answer(&mut p);
    run_frames(&mut p, t, t + 30_000);
    assert_eq!(p.effects().spawned(EffectKind::Heart), 22);
    assert!(!p.hearts_running());
}

// --- Sparkles ------------------------------------------------------------------

#[test]
fn sparkles_are_occasional_and_short_lived() {
    let mut p = page();
    for i in 0..2_000u64 {
        p.handle(
            i,
            Input::MouseMoved {
                x: (i % 640) as f64,
                y: 100.0,
            },
        );
    }
    let spawned = p.effects().spawned(EffectKind::Sparkle);
    assert!((40..=170).contains(&spawned), "sparkles spawned: {spawned}");
    step_checking_deadlines(&mut p, 2_000, 3_000);
    assert_eq!(p.surface().live_of(EffectKind::Sparkle), 0);
}

// --- Secret word / confetti ------------------------------------------------------

#[test]
fn secret_word_fires_exactly_one_burst() {
    let mut p = page();
    type_keys(&mut p, 0, "xamo");
    assert_eq!(p.confetti_bursts(), 0);
    p.handle(4, Input::KeyPress("r".into()));
    assert_eq!(p.confetti_bursts(), 1);
    assert_eq!(p.secret().buffer(), "");
    p.handle(5, Input::KeyPress("y".into()));
    assert_eq!(p.confetti_bursts(), 1);

    type_keys(&mut p, 10, "amor");
    assert_eq!(p.confetti_bursts(), 2);
}

#[test]
fn secret_buffer_keeps_ten_most_recent() {
    let mut p = page();
    type_keys(&mut p, 0, "qwertyuiopzxcvb");
    assert_eq!(p.secret().buffer(), "yuiopzxcvb");
    assert_eq!(p.secret().buffer().chars().count(), 10);
    assert_eq!(p.confetti_bursts(), 0);
}

#[test]
fn confetti_pieces_stagger_and_clear() {
    let mut p = page();
    type_keys(&mut p, 0, "amor");
    let burst_at = 3;
    p.tick(burst_at + 29);
    assert_eq!(p.effects().spawned(EffectKind::Confetti), 1);
    p.tick(burst_at + 99 * 30);
    assert_eq!(p.effects().spawned(EffectKind::Confetti), 100);
    step_checking_deadlines(&mut p, burst_at + 99 * 30, burst_at + 99 * 30 + 4_000);
    assert_eq!(p.surface().live_of(EffectKind::Confetti), 0);
    assert_eq!(p.effects().spawned(EffectKind::Confetti), 100);
}

// --- Pool ----------------------------------------------------------------------

#[test]
fn disposer_removes_node_early() {
    let mut surface = Recorder::default();
    let mut timeline = Timeline::new();
    let mut pool = EffectPool::new();
    let mut rng = Rng::new(3);
    let disposer = pool.emit(Look::heart(&mut rng), Some(3_000), &mut timeline, &mut surface);
    assert_eq!(pool.live(EffectKind::Heart), 1);
    assert_eq!(timeline.len(), 1);

    assert!(pool.dispose(disposer, &mut timeline, &mut surface));
    assert_eq!(pool.live_total(), 0);
    assert!(timeline.is_empty());
    assert!(surface.live.is_empty());
}
