#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use exam_core::Clock;
use exam_core::SampleGenerator;
use exam_core::model::{
    AssessmentConfig, OptionIndex, Question, QuestionId, QuestionSet, Report, Session,
};
use exam_core::time::fixed_now;
use services::sessions::{
    CapabilityError, Collaborators, Confirmer, Countdown, ImmersiveMode, IntegrityMonitor,
    ReportSink, Screen, SessionController, SessionDisplay,
};

/// Everything the fakes observed, shared with the test body.
#[derive(Debug, Default)]
pub struct Log {
    pub screens: Vec<Screen>,
    pub questions_rendered: Vec<(QuestionId, Option<OptionIndex>)>,
    pub navigator_renders: usize,
    pub timers: Vec<(u32, bool)>,
    pub banners: Vec<u32>,
    pub reports: Vec<Report>,
    pub sink_reports: Vec<Report>,
    pub confirmations: Vec<String>,
    pub countdown_starts: usize,
    pub countdown_cancels: usize,
    pub registers: usize,
    pub deregisters: usize,
    pub immersive_enters: usize,
    pub immersive_exits: usize,
}

pub type SharedLog = Rc<RefCell<Log>>;

struct FakeDisplay(SharedLog);

impl SessionDisplay for FakeDisplay {
    fn show_screen(&mut self, screen: Screen) {
        self.0.borrow_mut().screens.push(screen);
    }

    fn render_question(&mut self, question: &Question, selected: Option<OptionIndex>) {
        self.0
            .borrow_mut()
            .questions_rendered
            .push((question.id(), selected));
    }

    fn render_navigator(
        &mut self,
        _questions: &QuestionSet,
        _answers: &BTreeMap<QuestionId, OptionIndex>,
        _current_index: usize,
    ) {
        self.0.borrow_mut().navigator_renders += 1;
    }

    fn render_timer(&mut self, remaining_secs: u32, is_low_time: bool) {
        self.0.borrow_mut().timers.push((remaining_secs, is_low_time));
    }

    fn render_violation_banner(&mut self, remaining_attempts: u32) {
        self.0.borrow_mut().banners.push(remaining_attempts);
    }

    fn render_report(&mut self, report: &Report) {
        self.0.borrow_mut().reports.push(report.clone());
    }
}

struct FakeImmersive {
    log: SharedLog,
    available: bool,
    active: bool,
}

impl ImmersiveMode for FakeImmersive {
    fn enter(&mut self) -> Result<(), CapabilityError> {
        if !self.available {
            return Err(CapabilityError::EnvironmentCapabilityUnavailable(
                "fullscreen".into(),
            ));
        }
        self.log.borrow_mut().immersive_enters += 1;
        self.active = true;
        Ok(())
    }

    fn exit(&mut self) -> Result<(), CapabilityError> {
        self.log.borrow_mut().immersive_exits += 1;
        self.active = false;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Answers confirmations from a script; an exhausted script declines.
struct ScriptedConfirmer {
    log: SharedLog,
    answers: RefCell<VecDeque<bool>>,
}

#[async_trait(?Send)]
impl Confirmer for ScriptedConfirmer {
    async fn confirm(&self, message: &str) -> bool {
        self.log.borrow_mut().confirmations.push(message.to_owned());
        self.answers.borrow_mut().pop_front().unwrap_or(false)
    }
}

struct FakeCountdown(SharedLog);

impl Countdown for FakeCountdown {
    fn start(&mut self) {
        self.0.borrow_mut().countdown_starts += 1;
    }

    fn cancel(&mut self) {
        self.0.borrow_mut().countdown_cancels += 1;
    }
}

struct FakeMonitor(SharedLog);

impl IntegrityMonitor for FakeMonitor {
    fn register(&mut self) {
        self.0.borrow_mut().registers += 1;
    }

    fn deregister(&mut self) {
        self.0.borrow_mut().deregisters += 1;
    }
}

struct FakeSink(SharedLog);

#[async_trait(?Send)]
impl ReportSink for FakeSink {
    async fn accept(&self, report: &Report) {
        self.0.borrow_mut().sink_reports.push(report.clone());
    }
}

pub struct Harness {
    pub controller: SessionController,
    pub log: SharedLog,
}

pub struct HarnessBuilder {
    config: AssessmentConfig,
    confirmations: Vec<bool>,
    immersive_available: bool,
    seed: u64,
    countdown: Option<Box<dyn Countdown>>,
    session: Option<Session>,
    sink: Option<Box<dyn ReportSink>>,
}

impl HarnessBuilder {
    pub fn new(total_questions: u32) -> Self {
        Self {
            config: AssessmentConfig::default().with_total_questions(total_questions),
            confirmations: Vec::new(),
            immersive_available: true,
            seed: 42,
            countdown: None,
            session: None,
            sink: None,
        }
    }

    pub fn config(mut self, f: impl FnOnce(AssessmentConfig) -> AssessmentConfig) -> Self {
        self.config = f(self.config);
        self
    }

    pub fn confirmations(mut self, answers: &[bool]) -> Self {
        self.confirmations = answers.to_vec();
        self
    }

    pub fn without_immersive(mut self) -> Self {
        self.immersive_available = false;
        self
    }

    pub fn countdown(mut self, countdown: Box<dyn Countdown>) -> Self {
        self.countdown = Some(countdown);
        self
    }

    /// Drive this session instead of a generated one.
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Replace the recording sink.
    pub fn sink(mut self, sink: Box<dyn ReportSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> Harness {
        let log = SharedLog::default();
        let session = match self.session {
            Some(session) => session,
            None => {
                let questions = SampleGenerator::new(self.seed)
                    .generate(self.config.total_questions)
                    .unwrap();
                Session::new(questions, self.config).unwrap()
            }
        };

        let ports = Collaborators {
            display: Box::new(FakeDisplay(Rc::clone(&log))),
            immersive: Box::new(FakeImmersive {
                log: Rc::clone(&log),
                available: self.immersive_available,
                active: false,
            }),
            confirmer: Box::new(ScriptedConfirmer {
                log: Rc::clone(&log),
                answers: RefCell::new(self.confirmations.into()),
            }),
            countdown: self
                .countdown
                .unwrap_or_else(|| Box::new(FakeCountdown(Rc::clone(&log)))),
            monitors: vec![
                Box::new(FakeMonitor(Rc::clone(&log))),
                Box::new(FakeMonitor(Rc::clone(&log))),
            ],
            sink: self
                .sink
                .unwrap_or_else(|| Box::new(FakeSink(Rc::clone(&log)))),
        };

        Harness {
            controller: SessionController::new(session, Clock::fixed(fixed_now()), ports),
            log,
        }
    }
}

impl Harness {
    pub fn started(total_questions: u32) -> Self {
        let mut harness = HarnessBuilder::new(total_questions).build();
        assert!(harness.controller.start());
        harness
    }

    pub fn answer_all_correctly(&mut self) {
        let answers: Vec<_> = self
            .controller
            .session()
            .questions()
            .iter()
            .map(|q| (q.id(), q.correct().value()))
            .collect();
        for (id, option) in answers {
            self.controller.record_answer(id, option);
        }
    }

    pub fn report(&self) -> Report {
        self.controller.report().cloned().expect("finished")
    }
}
