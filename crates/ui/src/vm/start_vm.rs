use services::{LoadedAssessment, QuestionSource};

/// Start screen: title plus the rules of the attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartVm {
    pub title: String,
    pub total_questions: u32,
    pub duration_minutes: u32,
    pub violation_limit: u32,
    pub pass_threshold: u8,
    pub sample: bool,
}

impl StartVm {
    #[must_use]
    pub fn duration_label(&self) -> String {
        format!("{} minutes", self.duration_minutes)
    }

    #[must_use]
    pub fn rules(&self) -> Vec<String> {
        vec![
            format!(
                "The test has {} multiple-choice questions, 1 mark each.",
                self.total_questions
            ),
            format!(
                "You have {} to finish. The test submits automatically when time runs out.",
                self.duration_label()
            ),
            "The test runs in fullscreen. Leaving fullscreen or switching away from the window counts as a violation.".to_owned(),
            format!(
                "After {} violations the test is submitted automatically.",
                self.violation_limit
            ),
            format!("You need {}% to pass.", self.pass_threshold),
        ]
    }
}

impl From<&LoadedAssessment> for StartVm {
    fn from(loaded: &LoadedAssessment) -> Self {
        Self {
            title: loaded.title.clone(),
            total_questions: loaded.config.total_questions,
            duration_minutes: loaded.config.duration_secs.div_ceil(60),
            violation_limit: loaded.config.violation_limit,
            pass_threshold: loaded.config.pass_threshold,
            sample: loaded.source == QuestionSource::Sample,
        }
    }
}
