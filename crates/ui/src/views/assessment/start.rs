use dioxus::prelude::*;

use crate::views::ViewError;
use crate::vm::StartVm;

#[component]
pub(super) fn StartScreen(vm: StartVm, error: Option<ViewError>, on_start: EventHandler<()>) -> Element {
    let rules = vm.rules();
    rsx! {
        div { class: "start-screen",
            h2 { class: "start-title", "{vm.title}" }
            div { class: "start-facts",
                span { "Questions: {vm.total_questions}" }
                span { "Duration: {vm.duration_label()}" }
                span { "Pass mark: {vm.pass_threshold}%" }
            }
            if vm.sample {
                p { class: "start-note", "No question bank is stored for this assessment; sample questions are used." }
            }
            h3 { "Instructions" }
            ol { class: "start-rules",
                for (i, rule) in rules.into_iter().enumerate() {
                    li { key: "{i}", "{rule}" }
                }
            }
            if let Some(err) = error {
                p { class: "error", "{err.message()}" }
            }
            button {
                class: "btn btn-primary start-btn",
                id: "start-test",
                r#type: "button",
                onclick: move |_| on_start.call(()),
                "Start Test"
            }
        }
    }
}
