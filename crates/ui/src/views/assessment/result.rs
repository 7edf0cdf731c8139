use dioxus::prelude::*;
use dioxus_router::Link;
use exam_core::model::ReviewFilter;

use crate::routes::Route;
use crate::vm::{ReportVm, ReviewEntryVm, filter_entries};

#[component]
pub(super) fn ResultScreen(report: Signal<Option<ReportVm>>, on_retake: EventHandler<()>) -> Element {
    let mut filter = use_signal(ReviewFilter::default);
    let Some(vm) = report.read().clone() else {
        return rsx! {
            p { "Preparing results..." }
        };
    };
    let active = filter();
    let entries = filter_entries(&vm.entries, active);

    rsx! {
        div { class: "result-screen",
            if let Some(notice) = vm.notice {
                div { class: "result-notice", role: "alert", "{notice}" }
            }
            div { class: "result-summary",
                div { class: "score-circle",
                    span { class: "score-value", id: "score-value", "{vm.score}" }
                    span { class: "score-unit", "%" }
                }
                div { class: "result-headline",
                    span { class: "grade-badge", "Grade {vm.grade}" }
                    span { class: "{vm.verdict_class()}", "{vm.verdict()}" }
                }
                dl { class: "result-meta",
                    dt { "Date" }
                    dd { "{vm.test_date}" }
                    dt { "Assessment ID" }
                    dd { "{vm.assessment_code}" }
                    dt { "Marks" }
                    dd { "{vm.marks_obtained} / {vm.total}" }
                    dt { "Time taken" }
                    dd { "{vm.time_taken}" }
                }
                div { class: "result-counts",
                    span { class: "count correct", "Correct: {vm.correct}" }
                    span { class: "count wrong", "Wrong: {vm.wrong}" }
                    span { class: "count unanswered", "Unanswered: {vm.unanswered}" }
                    if vm.violation_count > 0 {
                        span { class: "count violations", "Violations: {vm.violation_count}" }
                    }
                }
            }

            section { class: "answer-review",
                h3 { "Answer Review" }
                div { class: "review-filters",
                    for option in ReviewFilter::ALL {
                        button {
                            key: "{option.label()}",
                            class: if option == active { "filter-btn active" } else { "filter-btn" },
                            r#type: "button",
                            onclick: move |_| filter.set(option),
                            "{option.label()}"
                        }
                    }
                }
                if entries.is_empty() {
                    p { class: "review-empty", "No questions found in this category." }
                } else {
                    for entry in entries {
                        ReviewItem { key: "{entry.number}", entry }
                    }
                }
            }

            div { class: "result-actions",
                button {
                    class: "btn btn-primary",
                    id: "retake-test",
                    r#type: "button",
                    onclick: move |_| on_retake.call(()),
                    "Retake Test"
                }
                Link { class: "btn btn-secondary", to: Route::History {}, "View History" }
            }
        }
    }
}

#[component]
fn ReviewItem(entry: ReviewEntryVm) -> Element {
    let mut expanded = use_signal(|| false);
    let class = if expanded() {
        format!("{} expanded", entry.class())
    } else {
        entry.class().to_owned()
    };
    rsx! {
        div { class: "{class}", onclick: move |_| expanded.toggle(),
            div { class: "review-header-row",
                span { class: "review-question", "Question {entry.number}" }
                span { class: "review-result", "{entry.status_label()}" }
            }
            if expanded() {
                div { class: "review-content",
                    p {
                        strong { "Question: " }
                        "{entry.prompt}"
                    }
                    p {
                        strong { "Your Answer: " }
                        "{entry.your_answer}"
                    }
                    if let Some(correct) = entry.correct_answer.clone() {
                        p {
                            strong { "Correct Answer: " }
                            "{correct}"
                        }
                    }
                }
            }
        }
    }
}
