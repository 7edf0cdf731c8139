use dioxus::prelude::*;

use crate::webview::{PendingConfirm, answer_pending};

#[component]
pub(super) fn ConfirmDialog(pending: Signal<Option<PendingConfirm>>) -> Element {
    let message = pending.read().as_ref().map(|open| open.message().to_owned());
    let Some(message) = message else {
        return rsx! {};
    };

    rsx! {
        div { class: "dialog-overlay",
            div {
                class: "dialog",
                role: "dialog",
                aria_modal: "true",
                aria_labelledby: "dialog-message",
                p { class: "dialog-message", id: "dialog-message", "{message}" }
                div { class: "dialog-actions",
                    button {
                        class: "btn btn-secondary",
                        id: "dialog-cancel",
                        r#type: "button",
                        onclick: move |_| answer_pending(pending, false),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-primary",
                        id: "dialog-confirm",
                        r#type: "button",
                        onclick: move |_| answer_pending(pending, true),
                        "OK"
                    }
                }
            }
        }
    }
}
