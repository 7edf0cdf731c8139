use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{AttemptCardVm, map_attempt_cards};

const HISTORY_LIMIT: u32 = 20;

#[derive(Clone, Debug, PartialEq)]
struct HistoryData {
    cards: Vec<AttemptCardVm>,
}

#[component]
pub fn HistoryView() -> Element {
    let ctx = use_context::<AppContext>();
    let history = ctx.history();
    let assessment_id = ctx.assessment_id();

    let resource = use_resource(move || {
        let history = history.clone();
        async move {
            let rows = history
                .list(assessment_id, HISTORY_LIMIT)
                .await
                .map_err(ViewError::from)?;
            Ok(HistoryData {
                cards: map_attempt_cards(&rows),
            })
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            h2 { "History" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    if data.cards.is_empty() {
                        p { "No attempts yet." }
                    } else {
                        ul { class: "attempt-list",
                            for card in data.cards {
                                AttemptCard { key: "{card.id}", card }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn AttemptCard(card: AttemptCardVm) -> Element {
    let verdict_class = if card.passed { "verdict pass" } else { "verdict fail" };
    rsx! {
        li { class: "attempt-card",
            div { class: "attempt-card__header",
                span { class: "attempt-date", "{card.completed_at_str}" }
                span { class: "attempt-code", "{card.assessment_code}" }
            }
            p { class: "attempt-score",
                "Score: {card.score}% | Grade: {card.grade} | "
                span { class: "{verdict_class}", "{card.verdict()}" }
            }
            p {
                "Correct: {card.correct} | Wrong: {card.wrong} | Unanswered: {card.unanswered} | Total: {card.total}"
            }
            p { class: "attempt-meta", "Time: {card.time_taken} | Submitted: {card.reason}" }
        }
    }
}
