use dioxus::prelude::*;
use dioxus_router::Router;

use crate::routes::Route;
use crate::webview::use_session_host_provider;

#[component]
pub fn App() -> Element {
    use_session_host_provider();

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        document::Title { "Technical Test" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
