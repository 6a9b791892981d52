//! Hero → Main → Answer reveal sequencer.
//!
//! Each button press starts a short script of steps. The script is a table of
//! `{step, delay, next step}` rows run on the page [`Timeline`]; `Page` performs
//! the side effect of each step and reports it back through [`Sequencer::complete`],
//! which queues the next row. A step therefore always happens-before the one it
//! schedules.

use crate::config::{Millis, StageTimings};
use crate::page::Task;
use crate::timeline::Timeline;

/// Top-level view of the page. Only ever moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViewStage {
    Hero,
    Main,
    Answer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageStep {
    /// Hero button pressed: feedback + music.
    PressHero,
    HideHero,
    /// Main content shown; reveal-on-visibility starts.
    ShowMain,
    BindGallery,
    /// Final button pressed: feedback.
    PressFinal,
    /// Pre-answer hidden, answer un-hidden, hearts + music.
    RevealAnswer,
    /// Answer marked active so its CSS transition runs.
    ActivateAnswer,
}

#[derive(Clone, Copy, Debug)]
enum Delay {
    HeroExit,
    MainEnter,
    GalleryBind,
    AnswerReveal,
    AnswerActivate,
}

impl Delay {
    fn millis(self, t: &StageTimings) -> Millis {
        match self {
            Delay::HeroExit => t.hero_exit_ms,
            Delay::MainEnter => t.main_enter_ms,
            Delay::GalleryBind => t.gallery_bind_ms,
            Delay::AnswerReveal => t.answer_reveal_ms,
            Delay::AnswerActivate => t.answer_activate_ms,
        }
    }
}

struct Transition {
    after: StageStep,
    delay: Delay,
    next: StageStep,
}

const SCRIPT: &[Transition] = &[
    Transition { after: StageStep::PressHero, delay: Delay::HeroExit, next: StageStep::HideHero },
    Transition { after: StageStep::HideHero, delay: Delay::MainEnter, next: StageStep::ShowMain },
    Transition { after: StageStep::ShowMain, delay: Delay::GalleryBind, next: StageStep::BindGallery },
    Transition { after: StageStep::PressFinal, delay: Delay::AnswerReveal, next: StageStep::RevealAnswer },
    Transition { after: StageStep::RevealAnswer, delay: Delay::AnswerActivate, next: StageStep::ActivateAnswer },
];

#[derive(Debug)]
pub struct Sequencer {
    stage: ViewStage,
    hero_visible: bool,
    main_visible: bool,
    answer_visible: bool,
    answer_active: bool,
    history: Vec<StageStep>,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    pub fn new() -> Self {
        Self {
            stage: ViewStage::Hero,
            hero_visible: true,
            main_visible: false,
            answer_visible: false,
            answer_active: false,
            history: Vec::new(),
        }
    }

    pub fn stage(&self) -> ViewStage {
        self.stage
    }

    pub fn hero_visible(&self) -> bool {
        self.hero_visible
    }

    pub fn main_visible(&self) -> bool {
        self.main_visible
    }

    pub fn answer_visible(&self) -> bool {
        self.answer_visible
    }

    pub fn answer_active(&self) -> bool {
        self.answer_active
    }

    /// Steps completed so far, in order.
    pub fn history(&self) -> &[StageStep] {
        &self.history
    }

    /// Leave the hero. Returns false (and does nothing) unless the hero is the
    /// current stage.
    pub fn advance_to_main(&mut self) -> bool {
        if self.stage != ViewStage::Hero {
            return false;
        }
        self.stage = ViewStage::Main;
        true
    }

    /// Show the answer. Only accepted once the main content is on screen.
    pub fn advance_to_answer(&mut self) -> bool {
        if self.stage != ViewStage::Main || !self.main_visible {
            return false;
        }
        self.stage = ViewStage::Answer;
        true
    }

    /// Record that `step` ran and queue the step that follows it.
    pub fn complete(&mut self, step: StageStep, timings: &StageTimings, timeline: &mut Timeline<Task>) {
        match step {
            StageStep::HideHero => self.hero_visible = false,
            StageStep::ShowMain => self.main_visible = true,
            StageStep::RevealAnswer => self.answer_visible = true,
            StageStep::ActivateAnswer => self.answer_active = true,
            StageStep::PressHero | StageStep::BindGallery | StageStep::PressFinal => {}
        }
        self.history.push(step);
        if let Some(row) = SCRIPT.iter().find(|t| t.after == step) {
            timeline.schedule_after(row.delay.millis(timings), Task::Stage(row.next));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_all(seq: &mut Sequencer, tl: &mut Timeline<Task>, t: &StageTimings) -> Vec<(Millis, StageStep)> {
        let mut out = Vec::new();
        while let Some((_, task)) = tl.pop_due(Millis::MAX) {
            if let Task::Stage(step) = task {
                seq.complete(step, t, tl);
                out.push((tl.now(), step));
            }
        }
        out
    }

    #[test]
    fn hero_script_runs_in_order_with_cumulative_delays() {
        let t = StageTimings::default();
        let mut tl = Timeline::new();
        let mut seq = Sequencer::new();
        assert!(seq.advance_to_main());
        seq.complete(StageStep::PressHero, &t, &mut tl);
        let ran = run_all(&mut seq, &mut tl, &t);
        assert_eq!(
            ran,
            vec![
                (200, StageStep::HideHero),
                (600, StageStep::ShowMain),
                (1100, StageStep::BindGallery),
            ]
        );
        assert!(!seq.hero_visible());
        assert!(seq.main_visible());
    }

    #[test]
    fn answer_refused_before_main_is_shown() {
        let mut seq = Sequencer::new();
        assert!(!seq.advance_to_answer());
        assert!(seq.advance_to_main());
        assert!(!seq.advance_to_answer(), "main not on screen yet");
        assert_eq!(seq.stage(), ViewStage::Main);
    }

    #[test]
    fn stages_never_go_back() {
        let t = StageTimings::default();
        let mut tl = Timeline::new();
        let mut seq = Sequencer::new();
        seq.advance_to_main();
        seq.complete(StageStep::PressHero, &t, &mut tl);
        run_all(&mut seq, &mut tl, &t);
        assert!(seq.advance_to_answer());
        assert!(!seq.advance_to_main());
        assert!(!seq.advance_to_answer());
        assert_eq!(seq.stage(), ViewStage::Answer);
    }
}
