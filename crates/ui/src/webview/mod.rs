//! Session collaborators backed by the Dioxus desktop webview.

mod confirm;
mod display;
mod host;
mod immersive;
mod monitor;
mod scripts;

pub use confirm::{DialogConfirmer, PendingConfirm, answer_pending};
pub use display::{SessionSignals, SignalDisplay};
pub use host::{SessionHost, use_session_host_provider};
pub use immersive::WebviewImmersive;
pub use monitor::{MonitorKind, WebviewMonitor};
