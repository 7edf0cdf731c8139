use dioxus::document;
use dioxus::prelude::*;
use services::SessionEvent;
use services::sessions::ports::IntegrityMonitor;
use tokio::sync::mpsc::UnboundedSender;

use super::scripts::{
    fullscreen_cleanup_script, fullscreen_monitor_script, visibility_cleanup_script,
    visibility_monitor_script,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorKind {
    /// Document hidden (window minimized or switched away).
    Visibility,
    /// Window left fullscreen.
    Fullscreen,
}

impl MonitorKind {
    fn install_script(self) -> &'static str {
        match self {
            MonitorKind::Visibility => visibility_monitor_script(),
            MonitorKind::Fullscreen => fullscreen_monitor_script(),
        }
    }

    fn cleanup_script(self) -> &'static str {
        match self {
            MonitorKind::Visibility => visibility_cleanup_script(),
            MonitorKind::Fullscreen => fullscreen_cleanup_script(),
        }
    }
}

/// `IntegrityMonitor` that installs DOM listeners in the webview and forwards
/// what they post as `SessionEvent`s.
pub struct WebviewMonitor {
    kind: MonitorKind,
    events: UnboundedSender<SessionEvent>,
    task: Option<Task>,
}

impl WebviewMonitor {
    #[must_use]
    pub fn new(kind: MonitorKind, events: UnboundedSender<SessionEvent>) -> Self {
        Self {
            kind,
            events,
            task: None,
        }
    }

    #[must_use]
    pub fn visibility(events: UnboundedSender<SessionEvent>) -> Self {
        Self::new(MonitorKind::Visibility, events)
    }

    #[must_use]
    pub fn fullscreen(events: UnboundedSender<SessionEvent>) -> Self {
        Self::new(MonitorKind::Fullscreen, events)
    }

    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.task.is_some()
    }
}

impl IntegrityMonitor for WebviewMonitor {
    fn register(&mut self) {
        if self.task.is_some() {
            return;
        }
        let kind = self.kind;
        let events = self.events.clone();
        // Root-owned, so the listener outlives the view that started it.
        self.task = spawn_forever(async move {
            let mut listener = document::eval(kind.install_script());
            loop {
                match listener.recv::<SessionEvent>().await {
                    Ok(event) => {
                        if events.send(event).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::debug!(?kind, error = ?err, "monitor channel closed");
                        break;
                    }
                }
            }
        })
        .into();
        tracing::debug!(kind = ?self.kind, "monitor registered");
    }

    fn deregister(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
            // Evaluation starts immediately; the cleanup script posts nothing back.
            let _cleanup = document::eval(self.kind.cleanup_script());
            tracing::debug!(kind = ?self.kind, "monitor deregistered");
        }
    }
}
