use std::time::Duration;

use exam_core::model::{QuestionId, SubmitReason};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use super::controller::SessionController;
use super::ports::Countdown;

/// Input to a running session, in arrival order.
///
/// The webview bridge posts these as JSON (`{"kind": "visibility-hidden"}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SessionEvent {
    Answer { question_id: QuestionId, option: u8 },
    GoTo { index: usize },
    Next,
    Previous,
    /// Manual submission; asks for confirmation.
    Submit,
    Tick,
    VisibilityHidden,
    FullscreenChanged { active: bool },
}

impl SessionController {
    /// Apply one event.
    pub async fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Answer {
                question_id,
                option,
            } => self.record_answer(question_id, option),
            SessionEvent::GoTo { index } => self.go_to(index),
            SessionEvent::Next => self.next(),
            SessionEvent::Previous => self.previous(),
            SessionEvent::Submit => {
                self.submit(false, SubmitReason::Manual).await;
            }
            SessionEvent::Tick => self.tick().await,
            SessionEvent::VisibilityHidden => self.visibility_hidden().await,
            SessionEvent::FullscreenChanged { active } => self.fullscreen_changed(active).await,
        }
    }
}

/// Consume events one at a time until the session finishes or every sender
/// is dropped. Returns the controller so the caller can read the report.
///
/// Handlers never overlap: while a confirmation dialog is pending nothing
/// else is processed, and events queued behind a submission are no-ops.
pub async fn run_session_loop(
    mut controller: SessionController,
    mut events: UnboundedReceiver<SessionEvent>,
) -> SessionController {
    while let Some(event) = events.recv().await {
        controller.handle(event).await;
        if controller.is_finished() {
            break;
        }
    }
    events.close();
    tracing::debug!(finished = controller.is_finished(), "session loop stopped");
    controller
}

/// `Countdown` backed by a spawned tokio task sending `SessionEvent::Tick`.
pub struct TokioCountdown {
    events: UnboundedSender<SessionEvent>,
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl TokioCountdown {
    /// Ticks every second.
    #[must_use]
    pub fn new(events: UnboundedSender<SessionEvent>) -> Self {
        Self::with_period(events, Duration::from_secs(1))
    }

    #[must_use]
    pub fn with_period(events: UnboundedSender<SessionEvent>, period: Duration) -> Self {
        Self {
            events,
            period,
            task: None,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

impl Countdown for TokioCountdown {
    fn start(&mut self) {
        if self.task.is_some() {
            return;
        }
        let events = self.events.clone();
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if events.send(SessionEvent::Tick).is_err() {
                    break;
                }
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TokioCountdown {
    fn drop(&mut self) {
        self.cancel();
    }
}
