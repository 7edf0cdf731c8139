use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{AssessmentView, HistoryView};
use crate::webview::SessionHost;

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", AssessmentView)] Assessment {},
        #[route("/history", HistoryView)] History {},
}

#[component]
fn Layout() -> Element {
    let host = use_context::<SessionHost>();
    // No way out of a running test except submitting it.
    let show_nav = !host.is_running();

    rsx! {
        div { class: "app",
            header { class: "topbar",
                h1 { "Technical Test" }
                if show_nav {
                    nav { class: "topbar-nav",
                        Link { to: Route::Assessment {}, "Assessment" }
                        Link { to: Route::History {}, "History" }
                    }
                }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
