use dioxus::prelude::*;
use services::sessions::ports::Screen;
use services::{Collaborators, SessionController, SessionEvent, TokioCountdown, run_session_loop};
use tokio::sync::mpsc;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::StartVm;
use crate::webview::{
    DialogConfirmer, SessionHost, SignalDisplay, WebviewImmersive, WebviewMonitor,
};

use super::dialog::ConfirmDialog;
use super::result::ResultScreen;
use super::start::StartScreen;
use super::test_screen::TestScreen;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[component]
pub fn AssessmentView() -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let history = ctx.history();
    let assessment_id = ctx.assessment_id();
    let clock = ctx.clock();

    let host = use_context::<SessionHost>();
    let signals = host.signals;
    let mut start_error = use_signal(|| None::<ViewError>);

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        async move { catalog.load(assessment_id).await.map_err(ViewError::from) }
    });
    let state = view_state_from_resource(resource);

    let dispatch = use_callback(move |event: SessionEvent| host.send(event));

    let on_start = use_callback(move |()| {
        if host.is_running() {
            return;
        }
        let loaded = match resource.value().read().as_ref() {
            Some(Ok(loaded)) => loaded.clone(),
            _ => return,
        };
        let session = match loaded.new_session() {
            Ok(session) => session,
            Err(err) => {
                start_error.set(Some(ViewError::from(err)));
                return;
            }
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let ports = Collaborators {
            display: Box::new(SignalDisplay::new(signals, loaded.config.violation_limit)),
            immersive: Box::new(WebviewImmersive::from_context()),
            confirmer: Box::new(DialogConfirmer::new(signals.confirm)),
            countdown: Box::new(TokioCountdown::new(tx.clone())),
            monitors: vec![
                Box::new(WebviewMonitor::visibility(tx.clone())),
                Box::new(WebviewMonitor::fullscreen(tx.clone())),
            ],
            sink: Box::new(history.sink(assessment_id)),
        };
        let mut controller = SessionController::new(session, clock, ports);
        if !controller.start() {
            return;
        }
        start_error.set(None);
        host.attach(tx);

        // Owned by the root scope so route changes cannot cancel it.
        spawn_forever(async move {
            let controller = run_session_loop(controller, rx).await;
            if let Some(report) = controller.report() {
                tracing::debug!(code = report.assessment_code(), "session closed");
            }
            host.detach();
        });
    });

    let on_retake = use_callback(move |()| {
        let mut resource = resource;
        signals.reset();
        start_error.set(None);
        resource.restart();
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<AssessmentTestHandles>() {
                handles.register(on_start, dispatch, host);
            }
        }
    }

    let screen = *signals.screen.read();

    rsx! {
        div { class: "page assessment-page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(loaded) => rsx! {
                    match screen {
                        Screen::Start => rsx! {
                            StartScreen {
                                vm: StartVm::from(&loaded),
                                error: start_error(),
                                on_start,
                            }
                        },
                        Screen::Test => rsx! {
                            TestScreen {
                                signals,
                                title: loaded.title.clone(),
                                on_event: dispatch,
                            }
                        },
                        Screen::Result => rsx! {
                            ResultScreen { report: signals.report, on_retake }
                        },
                    }
                },
            }
            ConfirmDialog { pending: signals.confirm }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct AssessmentTestHandles {
    start: Rc<RefCell<Option<Callback<()>>>>,
    dispatch: Rc<RefCell<Option<Callback<SessionEvent>>>>,
    host: Rc<RefCell<Option<SessionHost>>>,
}

#[cfg(test)]
impl AssessmentTestHandles {
    pub(crate) fn register(
        &self,
        start: Callback<()>,
        dispatch: Callback<SessionEvent>,
        host: SessionHost,
    ) {
        *self.start.borrow_mut() = Some(start);
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.host.borrow_mut() = Some(host);
    }

    pub(crate) fn start(&self) -> Callback<()> {
        (*self.start.borrow()).expect("start registered")
    }

    pub(crate) fn dispatch(&self) -> Callback<SessionEvent> {
        (*self.dispatch.borrow()).expect("dispatch registered")
    }

    pub(crate) fn host(&self) -> SessionHost {
        (*self.host.borrow()).expect("host registered")
    }

    pub(crate) fn signals(&self) -> crate::webview::SessionSignals {
        self.host().signals
    }
}
