use dioxus::prelude::*;
use exam_core::model::QuestionId;
use exam_core::shortcuts::{KeyModifiers, is_blocked_shortcut};
use services::SessionEvent;

use crate::vm::OptionVm;
use crate::webview::SessionSignals;

fn key_modifiers(modifiers: Modifiers) -> KeyModifiers {
    KeyModifiers {
        ctrl: modifiers.contains(Modifiers::CONTROL),
        shift: modifiers.contains(Modifiers::SHIFT),
        alt: modifiers.contains(Modifiers::ALT),
        meta: modifiers.contains(Modifiers::META),
    }
}

#[component]
pub(super) fn TestScreen(
    signals: SessionSignals,
    title: String,
    on_event: EventHandler<SessionEvent>,
) -> Element {
    let question = signals.question.read().clone();
    let navigator = signals.navigator.read().clone();
    let timer = signals.timer.read().clone();
    let banner = signals.banner.read().clone();

    let on_key = move |evt: KeyboardEvent| {
        let key = evt.data.key().to_string();
        if is_blocked_shortcut(&key, key_modifiers(evt.data.modifiers())) {
            evt.prevent_default();
            tracing::debug!(%key, "shortcut blocked");
        }
    };

    let position_label = navigator.position_label();
    let progress_label = navigator.progress_label();
    let is_first = navigator.is_first();
    let is_last = navigator.is_last();

    rsx! {
        div {
            class: "test-screen",
            id: "test-root",
            tabindex: "0",
            onkeydown: on_key,
            oncontextmenu: move |evt: MouseEvent| evt.prevent_default(),
            header { class: "test-header",
                h2 { class: "test-title", "{title}" }
                span { class: "{timer.class()}", id: "timer", "{timer.label}" }
            }
            if let Some(banner) = banner {
                div { class: "warning-banner", role: "alert", "{banner.message()}" }
            }
            div { class: "test-body",
                section { class: "question-panel",
                    if let Some(question) = question {
                        div { class: "question-card",
                            div { class: "question-header",
                                span { class: "question-number", "{position_label}" }
                                span { class: "question-marks", "1 Mark" }
                            }
                            p { class: "question-text", "{question.prompt}" }
                            div { class: "options",
                                {question.options.iter().map(|option| rsx! {
                                    OptionButton {
                                        key: "{option.index}",
                                        question_id: question.id,
                                        option: option.clone(),
                                        on_event,
                                    }
                                })}
                            }
                        }
                    }
                    div { class: "question-actions",
                        button {
                            class: "btn btn-secondary",
                            id: "prev-question",
                            r#type: "button",
                            disabled: is_first,
                            onclick: move |_| on_event.call(SessionEvent::Previous),
                            "Previous"
                        }
                        if is_last {
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                onclick: move |_| on_event.call(SessionEvent::Submit),
                                "Submit Test"
                            }
                        } else {
                            button {
                                class: "btn btn-primary",
                                id: "next-question",
                                r#type: "button",
                                onclick: move |_| on_event.call(SessionEvent::Next),
                                "Next"
                            }
                        }
                    }
                }
                aside { class: "navigator",
                    p { class: "navigator-progress", "{progress_label}" }
                    div { class: "navigator-grid",
                        {navigator.items.iter().map(|item| {
                            let index = item.index;
                            rsx! {
                                button {
                                    key: "{index}",
                                    class: "{item.class()}",
                                    r#type: "button",
                                    onclick: move |_| on_event.call(SessionEvent::GoTo { index }),
                                    "{item.number}"
                                }
                            }
                        })}
                    }
                    button {
                        class: "btn btn-primary submit-btn",
                        id: "submit-test",
                        r#type: "button",
                        onclick: move |_| on_event.call(SessionEvent::Submit),
                        "Submit Test"
                    }
                }
            }
        }
    }
}

#[component]
fn OptionButton(
    question_id: QuestionId,
    option: OptionVm,
    on_event: EventHandler<SessionEvent>,
) -> Element {
    let class = if option.selected {
        "option selected"
    } else {
        "option"
    };
    let index = option.index;
    rsx! {
        button {
            class: "{class}",
            r#type: "button",
            aria_pressed: "{option.selected}",
            onclick: move |_| on_event.call(SessionEvent::Answer { question_id, option: index }),
            span { class: "option-letter", "{option.letter}" }
            span { class: "option-text", "{option.text}" }
        }
    }
}
