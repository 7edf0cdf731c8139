mod support;

use exam_core::Clock;
use exam_core::model::{AssessmentId, SubmitReason};
use exam_core::time::fixed_now;
use services::{AppServices, ConfigOverrides, QuestionSource};
use support::HarnessBuilder;

async fn sqlite_services(name: &str) -> AppServices {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    AppServices::new_sqlite(
        &url,
        Clock::fixed(fixed_now()),
        AssessmentId::new(1),
        ConfigOverrides {
            total_questions: Some(3),
            ..ConfigOverrides::default()
        },
    )
    .await
    .expect("sqlite services")
}

#[tokio::test]
async fn unseeded_database_saves_finished_attempt() {
    let services = sqlite_services("svc_unseeded_history").await;
    let id = services.assessment_id();

    let loaded = services.catalog().load(id).await.expect("load");
    assert_eq!(loaded.source, QuestionSource::Sample);
    assert_eq!(loaded.questions.len(), 3);

    let mut h = HarnessBuilder::new(3)
        .session(loaded.new_session().expect("session"))
        .sink(Box::new(services.history().sink(id)))
        .build();
    assert!(h.controller.start());
    let first = loaded.questions.iter().next().expect("question");
    h.controller
        .record_answer(first.id(), first.correct().value());
    assert!(h.controller.submit(true, SubmitReason::TimeExpired).await);

    let rows = services.history().list(id, 10).await.expect("list");
    assert_eq!(rows.len(), 1);
    let summary = &rows[0].summary;
    assert_eq!(summary.reason(), SubmitReason::TimeExpired);
    assert_eq!(summary.correct(), 1);
    assert_eq!(summary.unanswered(), 2);
    assert_eq!(summary.total(), 3);
}

#[tokio::test]
async fn reloading_registered_assessment_keeps_history() {
    let services = sqlite_services("svc_reload_history").await;
    let id = services.assessment_id();

    let loaded = services.catalog().load(id).await.expect("load");
    let mut h = HarnessBuilder::new(3)
        .session(loaded.new_session().expect("session"))
        .sink(Box::new(services.history().sink(id)))
        .build();
    h.controller.start();
    assert!(h.controller.submit(true, SubmitReason::Manual).await);

    let again = services.catalog().load(id).await.expect("reload");
    assert_eq!(again.title, loaded.title);
    assert_eq!(services.catalog().list(10).await.expect("list").len(), 1);
    assert_eq!(services.history().list(id, 10).await.expect("history").len(), 1);
}
