use std::collections::BTreeMap;

use dioxus::prelude::*;
use exam_core::model::{OptionIndex, Question, QuestionId, QuestionSet, Report};
use services::sessions::ports::{Screen, SessionDisplay};

use crate::vm::{NavigatorVm, QuestionVm, ReportVm, TimerVm, ViolationBannerVm, violation_banner};

use super::confirm::PendingConfirm;

/// Reactive state the assessment screens render from.
#[derive(Clone, Copy, PartialEq)]
pub struct SessionSignals {
    pub screen: Signal<Screen>,
    pub question: Signal<Option<QuestionVm>>,
    pub navigator: Signal<NavigatorVm>,
    pub timer: Signal<TimerVm>,
    pub banner: Signal<Option<ViolationBannerVm>>,
    pub report: Signal<Option<ReportVm>>,
    pub confirm: Signal<Option<PendingConfirm>>,
}

impl SessionSignals {
    /// Back to a blank start screen.
    pub fn reset(mut self) {
        self.screen.set(Screen::Start);
        self.question.set(None);
        self.navigator.set(NavigatorVm::default());
        self.timer.set(TimerVm::default());
        self.banner.set(None);
        self.report.set(None);
        self.confirm.set(None);
    }
}

pub fn use_session_signals() -> SessionSignals {
    SessionSignals {
        screen: use_signal(|| Screen::Start),
        question: use_signal(|| None),
        navigator: use_signal(NavigatorVm::default),
        timer: use_signal(TimerVm::default),
        banner: use_signal(|| None),
        report: use_signal(|| None),
        confirm: use_signal(|| None),
    }
}

/// `SessionDisplay` that writes view models into signals.
pub struct SignalDisplay {
    signals: SessionSignals,
    violation_limit: u32,
}

impl SignalDisplay {
    #[must_use]
    pub fn new(signals: SessionSignals, violation_limit: u32) -> Self {
        Self {
            signals,
            violation_limit,
        }
    }
}

impl SessionDisplay for SignalDisplay {
    fn show_screen(&mut self, screen: Screen) {
        self.signals.screen.set(screen);
    }

    fn render_question(&mut self, question: &Question, selected: Option<OptionIndex>) {
        self.signals
            .question
            .set(Some(QuestionVm::new(question, selected)));
    }

    fn render_navigator(
        &mut self,
        questions: &QuestionSet,
        answers: &BTreeMap<QuestionId, OptionIndex>,
        current_index: usize,
    ) {
        self.signals
            .navigator
            .set(NavigatorVm::new(questions, answers, current_index));
    }

    fn render_timer(&mut self, remaining_secs: u32, is_low_time: bool) {
        self.signals
            .timer
            .set(TimerVm::new(remaining_secs, is_low_time));
    }

    fn render_violation_banner(&mut self, remaining_attempts: u32) {
        self.signals
            .banner
            .set(violation_banner(remaining_attempts, self.violation_limit));
    }

    fn render_report(&mut self, report: &Report) {
        self.signals.report.set(Some(ReportVm::from(report)));
    }
}
