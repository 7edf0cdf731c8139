use exam_core::Clock;
use exam_core::model::{
    QuestionId, Report, Session, SessionError, SubmitReason, TickOutcome, ViolationKind,
    ViolationOutcome,
};

use super::ports::{
    Confirmer, Countdown, ImmersiveMode, IntegrityMonitor, ReportSink, Screen, SessionDisplay,
};

/// Final confirmation shown before every manual submission.
pub const SUBMIT_CONFIRMATION: &str =
    "Are you sure you want to submit the test? This action cannot be undone.";

/// First confirmation, only shown while questions remain unanswered.
#[must_use]
pub fn unanswered_confirmation(unanswered: usize) -> String {
    format!("You have {unanswered} unanswered questions. Do you want to submit?")
}

/// The host-side collaborators a controller drives.
pub struct Collaborators {
    pub display: Box<dyn SessionDisplay>,
    pub immersive: Box<dyn ImmersiveMode>,
    pub confirmer: Box<dyn Confirmer>,
    pub countdown: Box<dyn Countdown>,
    pub monitors: Vec<Box<dyn IntegrityMonitor>>,
    pub sink: Box<dyn ReportSink>,
}

/// Drives one `Session` and keeps its collaborators in step.
///
/// Invalid operations (wrong phase, out-of-range input) are logged and
/// ignored. Timer, monitors and immersive mode are torn down exactly once,
/// when the session finishes or when the controller is dropped.
pub struct SessionController {
    session: Session,
    clock: Clock,
    ports: Collaborators,
    countdown_running: bool,
    monitors_registered: bool,
    immersive_requested: bool,
}

fn ignored(op: &'static str, err: &SessionError) {
    tracing::debug!(op, error = %err, "session operation ignored");
}

impl SessionController {
    #[must_use]
    pub fn new(session: Session, clock: Clock, ports: Collaborators) -> Self {
        Self {
            session,
            clock,
            ports,
            countdown_running: false,
            monitors_registered: false,
            immersive_requested: false,
        }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }

    #[must_use]
    pub fn report(&self) -> Option<&Report> {
        self.session.report()
    }

    /// Begin the attempt: countdown, monitors, immersive mode, first render.
    ///
    /// Returns `false` when the session was already started.
    pub fn start(&mut self) -> bool {
        if let Err(err) = self.session.start(self.clock.now()) {
            ignored("start", &err);
            return false;
        }

        self.ports.countdown.start();
        self.countdown_running = true;
        for monitor in &mut self.ports.monitors {
            monitor.register();
        }
        self.monitors_registered = true;

        self.immersive_requested = true;
        if let Err(err) = self.ports.immersive.enter() {
            tracing::warn!(error = %err, "immersive mode unavailable; continuing without it");
        }

        tracing::info!(
            questions = self.session.questions().len(),
            duration_secs = self.session.config().duration_secs,
            "assessment started"
        );

        self.ports.display.show_screen(Screen::Test);
        self.render_question();
        self.render_timer();
        self.ports
            .display
            .render_violation_banner(self.session.remaining_attempts());
        true
    }

    pub fn record_answer(&mut self, question_id: QuestionId, option: u8) {
        match self.session.record_answer(question_id, option) {
            Ok(choice) => {
                tracing::debug!(question = %question_id, option = %choice, "answer recorded");
                self.render_question();
            }
            Err(err) => ignored("record_answer", &err),
        }
    }

    pub fn go_to(&mut self, index: usize) {
        match self.session.go_to(index) {
            Ok(_) => self.render_question(),
            Err(err) => ignored("go_to", &err),
        }
    }

    pub fn next(&mut self) {
        match self.session.next() {
            Ok(_) => self.render_question(),
            Err(err) => ignored("next", &err),
        }
    }

    pub fn previous(&mut self) {
        match self.session.previous() {
            Ok(_) => self.render_question(),
            Err(err) => ignored("previous", &err),
        }
    }

    /// Count one violation; forces submission once the limit is reached.
    pub async fn report_violation(&mut self, kind: ViolationKind) {
        let outcome = self.session.report_violation(kind);
        self.apply_violation(kind, outcome).await;
    }

    pub async fn visibility_hidden(&mut self) {
        self.report_violation(ViolationKind::TabHidden).await;
    }

    /// Fullscreen state changed in the host window.
    pub async fn fullscreen_changed(&mut self, active: bool) {
        if active {
            if let Err(err) = self.session.fullscreen_entered() {
                ignored("fullscreen_entered", &err);
            }
            return;
        }
        let outcome = self.session.fullscreen_exited();
        self.apply_violation(ViolationKind::FullscreenExit, outcome)
            .await;
    }

    /// Submit the attempt.
    ///
    /// Non-forced submissions ask for confirmation first; a declined dialog
    /// leaves the session active. Returns `true` when the session finished.
    pub async fn submit(&mut self, force: bool, reason: SubmitReason) -> bool {
        if !self.session.is_active() {
            tracing::debug!(%reason, phase = %self.session.phase(), "submit ignored");
            return false;
        }

        if !force {
            let unanswered = self.session.unanswered_count();
            if unanswered > 0
                && !self
                    .ports
                    .confirmer
                    .confirm(&unanswered_confirmation(unanswered))
                    .await
            {
                tracing::debug!(unanswered, "submission declined");
                return false;
            }
            if !self.ports.confirmer.confirm(SUBMIT_CONFIRMATION).await {
                tracing::debug!("submission declined");
                return false;
            }
        }

        self.finish(reason).await
    }

    /// Consume one second; forces `time-expired` at zero.
    pub async fn tick(&mut self) {
        match self.session.tick() {
            Ok(TickOutcome::Running { .. }) => self.render_timer(),
            Ok(TickOutcome::Expired) => {
                self.render_timer();
                tracing::info!("time expired");
                self.submit(true, SubmitReason::TimeExpired).await;
            }
            Err(err) => ignored("tick", &err),
        }
    }

    async fn apply_violation(
        &mut self,
        kind: ViolationKind,
        outcome: Result<ViolationOutcome, SessionError>,
    ) {
        match outcome {
            Ok(ViolationOutcome::Counted { count, remaining }) => {
                tracing::warn!(?kind, count, remaining, "integrity violation");
                self.ports.display.render_violation_banner(remaining);
            }
            Ok(ViolationOutcome::LimitReached { count, reason }) => {
                tracing::warn!(?kind, count, %reason, "violation limit reached");
                self.ports.display.render_violation_banner(0);
                self.submit(true, reason).await;
            }
            Ok(ViolationOutcome::Latched) => {
                tracing::debug!(?kind, "fullscreen exit already counted");
            }
            Err(err) => ignored("report_violation", &err),
        }
    }

    async fn finish(&mut self, reason: SubmitReason) -> bool {
        let report = match self.session.finish(reason, self.clock.now()) {
            Ok(report) => report.clone(),
            Err(err) => {
                ignored("submit", &err);
                return false;
            }
        };

        self.teardown();
        tracing::info!(
            %reason,
            score = report.score(),
            passed = report.passed(),
            code = report.assessment_code(),
            "assessment submitted"
        );

        self.ports.display.render_report(&report);
        self.ports.display.show_screen(Screen::Result);
        self.ports.sink.accept(&report).await;
        true
    }

    fn teardown(&mut self) {
        if self.countdown_running {
            self.ports.countdown.cancel();
            self.countdown_running = false;
        }
        if self.monitors_registered {
            for monitor in &mut self.ports.monitors {
                monitor.deregister();
            }
            self.monitors_registered = false;
        }
        // Fullscreen may still be applying; exit whenever it was requested.
        if self.immersive_requested {
            self.immersive_requested = false;
            if let Err(err) = self.ports.immersive.exit() {
                tracing::warn!(error = %err, "failed to leave immersive mode");
            }
        }
    }

    fn render_question(&mut self) {
        let question = self.session.current_question();
        let selected = self.session.selected_for(question.id());
        self.ports.display.render_question(question, selected);
        self.ports.display.render_navigator(
            self.session.questions(),
            self.session.state().answers(),
            self.session.state().current_index(),
        );
    }

    fn render_timer(&mut self) {
        self.ports.display.render_timer(
            self.session.state().time_remaining_secs(),
            self.session.is_low_time(),
        );
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if self.session.is_active() {
            tracing::warn!(
                answered = self.session.answered_count(),
                "session dropped before submission"
            );
        }
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unanswered_message_includes_count() {
        assert_eq!(
            unanswered_confirmation(4),
            "You have 4 unanswered questions. Do you want to submit?"
        );
    }
}
