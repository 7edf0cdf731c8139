//! Collaborator seams the session controller drives.
//!
//! Every port is a plain trait object so the desktop webview, tests and any
//! future host can plug in their own implementation. None of them require
//! `Send`: the controller runs on a single logical thread.

use std::collections::BTreeMap;

use async_trait::async_trait;
use exam_core::model::{OptionIndex, Question, QuestionId, QuestionSet, Report};
use thiserror::Error;

/// Top-level screens of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Start,
    Test,
    Result,
}

/// A host capability (fullscreen, dialogs) that is not available.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CapabilityError {
    #[error("environment capability unavailable: {0}")]
    EnvironmentCapabilityUnavailable(String),
}

/// Everything the controller paints.
pub trait SessionDisplay {
    fn show_screen(&mut self, screen: Screen);
    fn render_question(&mut self, question: &Question, selected: Option<OptionIndex>);
    fn render_navigator(
        &mut self,
        questions: &QuestionSet,
        answers: &BTreeMap<QuestionId, OptionIndex>,
        current_index: usize,
    );
    fn render_timer(&mut self, remaining_secs: u32, is_low_time: bool);
    fn render_violation_banner(&mut self, remaining_attempts: u32);
    fn render_report(&mut self, report: &Report);
}

/// Fullscreen-style immersive mode of the host window.
pub trait ImmersiveMode {
    /// # Errors
    ///
    /// Returns `CapabilityError` when the host cannot enter immersive mode.
    fn enter(&mut self) -> Result<(), CapabilityError>;

    /// # Errors
    ///
    /// Returns `CapabilityError` when the host cannot leave immersive mode.
    fn exit(&mut self) -> Result<(), CapabilityError>;

    fn is_active(&self) -> bool;
}

/// Yes/no dialog. Resolves to `false` when the user declines or dismisses.
#[async_trait(?Send)]
pub trait Confirmer {
    async fn confirm(&self, message: &str) -> bool;
}

/// One-second countdown feeding ticks back to the controller.
pub trait Countdown {
    fn start(&mut self);
    fn cancel(&mut self);
}

/// A detector (visibility, fullscreen) attached while the session is active.
pub trait IntegrityMonitor {
    fn register(&mut self);
    fn deregister(&mut self);
}

/// Receives the finished report (history, export).
#[async_trait(?Send)]
pub trait ReportSink {
    async fn accept(&self, report: &Report);
}

/// Sink that drops every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

#[async_trait(?Send)]
impl ReportSink for DiscardSink {
    async fn accept(&self, _report: &Report) {}
}
