use std::sync::Arc;

use async_trait::async_trait;
use exam_core::model::{
    AssessmentId, AttemptId, AttemptSummary, QuestionId, SubmitReason, score_percent,
};
use exam_core::time::fixed_now;
use services::SessionEvent;
use services::sessions::{SUBMIT_CONFIRMATION, Screen, unanswered_confirmation};
use storage::repository::{
    AssessmentRecord, AttemptRepository, AttemptRow, InMemoryRepository, QuestionRepository,
    Storage, StorageError,
};

use super::test_harness::{
    SAMPLE_QUESTIONS, TestRoute, ViewHarness, ViewKind, sample_questions, setup_view_harness,
    setup_view_harness_with_storage,
};
use crate::webview::answer_pending;

async fn started_harness() -> ViewHarness {
    let mut harness = setup_view_harness(ViewKind::Assessment).await;
    harness.rebuild();
    harness.settle().await;
    let start = harness.handles().start();
    harness.act(|| start.call(()));
    harness.settle().await;
    harness
}

fn send(harness: &mut ViewHarness, event: SessionEvent) {
    let dispatch = harness.handles().dispatch();
    harness.act(|| dispatch.call(event));
}

fn confirm(harness: &mut ViewHarness, accepted: bool) {
    let pending = harness.handles().signals().confirm;
    harness.act(|| answer_pending(pending, accepted));
}

#[tokio::test(flavor = "current_thread")]
async fn assessment_view_smoke_renders_start_screen() {
    let mut harness = setup_view_harness(ViewKind::Assessment).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Sample Assessment"), "missing title in {html}");
    assert!(html.contains("Start Test"), "missing start button in {html}");
    assert!(
        html.contains(&format!("The test has {SAMPLE_QUESTIONS} multiple-choice questions")),
        "missing rules in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn assessment_view_smoke_start_shows_first_question() {
    let harness = started_harness().await;
    let signals = harness.handles().signals();
    assert_eq!(*signals.screen.peek(), Screen::Test);

    let html = harness.render();
    assert!(html.contains("Question 1 of 3"), "missing position in {html}");
    assert!(html.contains("(Question 1)"), "missing prompt in {html}");
    assert!(html.contains("0 / 3 answered"), "missing progress in {html}");
    assert!(html.contains("Submit Test"), "missing submit in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn assessment_view_smoke_navigates_and_records_answers() {
    let mut harness = started_harness().await;

    send(&mut harness, SessionEvent::Answer { question_id: QuestionId::new(1), option: 2 });
    send(&mut harness, SessionEvent::Next);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Question 2 of 3"), "missing position in {html}");
    assert!(html.contains("1 / 3 answered"), "missing progress in {html}");

    send(&mut harness, SessionEvent::GoTo { index: 9 });
    harness.settle().await;
    assert!(harness.render().contains("Question 2 of 3"));
}

#[tokio::test(flavor = "current_thread")]
async fn assessment_view_smoke_confirmed_submit_shows_report_and_saves_attempt() {
    let mut harness = started_harness().await;
    let questions = sample_questions();
    for question in questions.iter() {
        send(
            &mut harness,
            SessionEvent::Answer {
                question_id: question.id(),
                option: question.correct().value(),
            },
        );
    }
    send(&mut harness, SessionEvent::Submit);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains(SUBMIT_CONFIRMATION), "missing dialog in {html}");

    confirm(&mut harness, true);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("PASSED"), "missing verdict in {html}");
    assert!(html.contains("Grade A+"), "missing grade in {html}");
    assert!(html.contains("Correct: 3"), "missing counts in {html}");
    assert!(!html.contains(SUBMIT_CONFIRMATION), "dialog still open in {html}");

    let rows = harness
        .storage
        .attempts
        .list_attempts(harness.assessment_id, 10)
        .await
        .expect("list attempts");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].summary.score(), 100);
    assert_eq!(rows[0].summary.reason(), SubmitReason::Manual);
}

#[tokio::test(flavor = "current_thread")]
async fn assessment_view_smoke_declined_submit_keeps_test_running() {
    let mut harness = started_harness().await;
    send(&mut harness, SessionEvent::Submit);
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains(&unanswered_confirmation(3)),
        "missing unanswered prompt in {html}"
    );

    confirm(&mut harness, false);
    harness.settle().await;

    let signals = harness.handles().signals();
    assert_eq!(*signals.screen.peek(), Screen::Test);
    assert!(signals.confirm.peek().is_none());
    let rows = harness
        .storage
        .attempts
        .list_attempts(harness.assessment_id, 10)
        .await
        .expect("list attempts");
    assert!(rows.is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn assessment_view_smoke_tab_switch_limit_forces_submission() {
    let mut harness = started_harness().await;

    send(&mut harness, SessionEvent::VisibilityHidden);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("2 attempts left"), "missing banner in {html}");

    send(&mut harness, SessionEvent::VisibilityHidden);
    send(&mut harness, SessionEvent::VisibilityHidden);
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("Test auto-submitted: Tab switch limit exceeded"),
        "missing notice in {html}"
    );
    assert!(html.contains("FAILED"), "missing verdict in {html}");
    assert!(html.contains("Unanswered: 3"), "missing counts in {html}");

    let rows = harness
        .storage
        .attempts
        .list_attempts(harness.assessment_id, 10)
        .await
        .expect("list attempts");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].summary.reason(), SubmitReason::TabSwitchLimit);
    assert_eq!(rows[0].summary.violation_count(), 3);
}

#[tokio::test(flavor = "current_thread")]
async fn assessment_view_smoke_leaving_route_keeps_session_running() {
    let mut harness = started_harness().await;
    send(&mut harness, SessionEvent::Answer { question_id: QuestionId::new(1), option: 0 });
    send(&mut harness, SessionEvent::VisibilityHidden);
    harness.settle().await;

    harness.navigate(TestRoute::History {});
    harness.settle().await;
    let host = harness.handles().host();
    assert!(host.is_running());
    assert_eq!(*host.signals.screen.peek(), Screen::Test);

    harness.navigate(TestRoute::Root {});
    harness.settle().await;

    // Same attempt: no start screen, answers and violations kept.
    let html = harness.render();
    assert!(!html.contains("Start Test"), "session restarted in {html}");
    assert!(html.contains("1 / 3 answered"), "lost answers in {html}");
    assert!(html.contains("2 attempts left"), "lost violations in {html}");

    send(&mut harness, SessionEvent::VisibilityHidden);
    send(&mut harness, SessionEvent::VisibilityHidden);
    harness.settle().await;

    assert!(!harness.handles().host().is_running());
    let rows = harness
        .storage
        .attempts
        .list_attempts(harness.assessment_id, 10)
        .await
        .expect("list attempts");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].summary.reason(), SubmitReason::TabSwitchLimit);
    assert_eq!(rows[0].summary.violation_count(), 3);
    assert_eq!(rows[0].summary.unanswered(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn shell_smoke_hides_navigation_while_test_runs() {
    let mut harness = setup_view_harness(ViewKind::Shell).await;
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("topbar-nav"), "missing nav in {html}");

    let start = harness.handles().start();
    harness.act(|| start.call(()));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Question 1 of 3"), "test not shown in {html}");
    assert!(!html.contains("topbar-nav"), "nav visible during test in {html}");

    for _ in 0..3 {
        send(&mut harness, SessionEvent::VisibilityHidden);
    }
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("FAILED"), "missing verdict in {html}");
    assert!(html.contains("topbar-nav"), "nav not restored in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_renders_attempt_card() {
    let storage = Storage::in_memory();
    storage
        .assessments
        .upsert_assessment(&AssessmentRecord::with_defaults(
            AssessmentId::new(1),
            "Java",
            fixed_now(),
        ))
        .await
        .expect("upsert assessment");
    let started = fixed_now();
    let summary = AttemptSummary::from_persisted(
        AssessmentId::new(1),
        started,
        started + chrono::Duration::seconds(754),
        score_percent(8, 10),
        true,
        8,
        1,
        1,
        10,
        754,
        SubmitReason::TimeExpired,
        1,
        "TTS-00000042".into(),
    )
    .expect("summary");
    storage
        .attempts
        .append_attempt(&summary)
        .await
        .expect("append attempt");

    let mut harness = setup_view_harness_with_storage(ViewKind::History, storage).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("TTS-00000042"), "missing code in {html}");
    assert!(html.contains("Score: 80%"), "missing score in {html}");
    assert!(html.contains("Time: 12:34"), "missing time in {html}");
    assert!(html.contains("time-expired"), "missing reason in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_renders_empty_state() {
    let mut harness = setup_view_harness(ViewKind::History).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("No attempts yet."), "missing empty state in {html}");
}

struct FailingAttempts;

#[async_trait]
impl AttemptRepository for FailingAttempts {
    async fn append_attempt(&self, _summary: &AttemptSummary) -> Result<AttemptId, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn get_attempt(&self, _id: AttemptId) -> Result<AttemptRow, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn list_attempts(
        &self,
        _assessment_id: AssessmentId,
        _limit: u32,
    ) -> Result<Vec<AttemptRow>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_renders_error_state() {
    let storage = Storage {
        assessments: Arc::new(InMemoryRepository::new()),
        attempts: Arc::new(FailingAttempts),
    };
    let mut harness = setup_view_harness_with_storage(ViewKind::History, storage).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("Could not read saved data."),
        "missing error message in {html}"
    );
}
