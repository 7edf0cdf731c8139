mod controller;
mod event_loop;
pub mod ports;

// Public API of the session subsystem.
pub use controller::{
    Collaborators, SUBMIT_CONFIRMATION, SessionController, unanswered_confirmation,
};
pub use event_loop::{SessionEvent, TokioCountdown, run_session_loop};
pub use ports::{
    CapabilityError, Confirmer, Countdown, DiscardSink, ImmersiveMode, IntegrityMonitor,
    ReportSink, Screen, SessionDisplay,
};
