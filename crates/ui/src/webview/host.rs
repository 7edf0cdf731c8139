use dioxus::prelude::*;
use services::SessionEvent;
use tokio::sync::mpsc::UnboundedSender;

use super::display::{SessionSignals, use_session_signals};

/// Session state owned above the router.
///
/// A running attempt keeps its event channel and view state here, so leaving
/// the assessment route neither stops nor restarts it.
#[derive(Clone, Copy, PartialEq)]
pub struct SessionHost {
    pub signals: SessionSignals,
    events: Signal<Option<UnboundedSender<SessionEvent>>>,
}

impl SessionHost {
    /// `true` between start and the end of the session loop.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.events.read().is_some()
    }

    /// Forward an event to the running session.
    pub fn send(&self, event: SessionEvent) {
        match self.events.peek().as_ref() {
            Some(tx) => {
                if tx.send(event).is_err() {
                    tracing::debug!(?event, "session loop closed; event dropped");
                }
            }
            None => tracing::debug!(?event, "no running session; event dropped"),
        }
    }

    pub(crate) fn attach(mut self, events: UnboundedSender<SessionEvent>) {
        self.events.set(Some(events));
    }

    pub(crate) fn detach(mut self) {
        self.events.set(None);
    }
}

/// Create the host and provide it to every route below.
pub fn use_session_host_provider() -> SessionHost {
    let signals = use_session_signals();
    let events = use_signal(|| None::<UnboundedSender<SessionEvent>>);
    use_context_provider(|| SessionHost { signals, events })
}
