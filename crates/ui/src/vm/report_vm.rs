use exam_core::model::{Report, ReviewEntry, ReviewFilter, ReviewStatus};

use crate::vm::time_fmt::format_date;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewEntryVm {
    pub number: u32,
    pub prompt: String,
    pub status: ReviewStatus,
    pub your_answer: String,
    /// Only shown for entries that were not answered correctly.
    pub correct_answer: Option<String>,
}

impl ReviewEntryVm {
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        self.status.label()
    }

    #[must_use]
    pub fn class(&self) -> &'static str {
        match self.status {
            ReviewStatus::Correct => "review correct",
            ReviewStatus::Incorrect => "review incorrect",
            ReviewStatus::Unanswered => "review unanswered",
        }
    }
}

impl From<&ReviewEntry> for ReviewEntryVm {
    fn from(entry: &ReviewEntry) -> Self {
        Self {
            number: entry.question_id.value(),
            prompt: entry.prompt.clone(),
            status: entry.status,
            your_answer: entry.selected_text.clone(),
            correct_answer: (entry.status != ReviewStatus::Correct)
                .then(|| entry.correct_text.clone()),
        }
    }
}

/// Result screen contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportVm {
    pub score: u8,
    pub grade: &'static str,
    pub passed: bool,
    pub marks_obtained: u32,
    pub total: u32,
    pub correct: u32,
    pub wrong: u32,
    pub unanswered: u32,
    pub time_taken: String,
    pub test_date: String,
    pub assessment_code: String,
    pub violation_count: u32,
    /// Set when the system submitted on the user's behalf.
    pub notice: Option<&'static str>,
    pub entries: Vec<ReviewEntryVm>,
}

impl ReportVm {
    #[must_use]
    pub fn verdict(&self) -> &'static str {
        if self.passed { "PASSED" } else { "FAILED" }
    }

    #[must_use]
    pub fn verdict_class(&self) -> &'static str {
        if self.passed {
            "verdict pass"
        } else {
            "verdict fail"
        }
    }
}

impl From<&Report> for ReportVm {
    fn from(report: &Report) -> Self {
        let reason = report.reason();
        Self {
            score: report.score(),
            grade: report.grade().as_str(),
            passed: report.passed(),
            marks_obtained: report.marks_obtained(),
            total: report.total(),
            correct: report.correct(),
            wrong: report.wrong(),
            unanswered: report.unanswered(),
            time_taken: report.time_taken_label(),
            test_date: format_date(report.completed_at()),
            assessment_code: report.assessment_code().to_owned(),
            violation_count: report.violation_count(),
            notice: reason.is_forced().then(|| reason.notice()),
            entries: report.entries().iter().map(ReviewEntryVm::from).collect(),
        }
    }
}

/// Entries matching `filter`, original order preserved.
#[must_use]
pub fn filter_entries(entries: &[ReviewEntryVm], filter: ReviewFilter) -> Vec<ReviewEntryVm> {
    entries
        .iter()
        .filter(|entry| filter.matches(entry.status))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::SampleGenerator;
    use exam_core::model::{AssessmentConfig, NOT_ANSWERED, QuestionId, Session, SubmitReason};
    use exam_core::time::fixed_now;

    fn report(reason: SubmitReason) -> Report {
        let questions = SampleGenerator::new(8).generate(3).unwrap();
        let first_correct = questions.get(0).unwrap().correct().value();
        let second_wrong = (questions.get(1).unwrap().correct().value() + 1) % 4;
        let config = AssessmentConfig::default().with_total_questions(3);
        let mut session = Session::new(questions, config).unwrap();
        session.start(fixed_now()).unwrap();
        session.record_answer(QuestionId::new(1), first_correct).unwrap();
        session.record_answer(QuestionId::new(2), second_wrong).unwrap();
        session.finish(reason, fixed_now()).unwrap().clone()
    }

    #[test]
    fn maps_counts_and_verdict() {
        let vm = ReportVm::from(&report(SubmitReason::Manual));
        assert_eq!((vm.correct, vm.wrong, vm.unanswered), (1, 1, 1));
        assert_eq!(vm.score, 33);
        assert_eq!(vm.grade, "F");
        assert_eq!(vm.verdict(), "FAILED");
        assert_eq!(vm.test_date, "Nov 14, 2023");
        assert!(vm.notice.is_none());
    }

    #[test]
    fn forced_submission_carries_notice() {
        let vm = ReportVm::from(&report(SubmitReason::TimeExpired));
        assert_eq!(vm.notice, Some("Test auto-submitted: Time expired"));
    }

    #[test]
    fn correct_answer_hidden_for_correct_entries() {
        let vm = ReportVm::from(&report(SubmitReason::Manual));
        assert!(vm.entries[0].correct_answer.is_none());
        assert!(vm.entries[1].correct_answer.is_some());
        assert_eq!(vm.entries[2].your_answer, NOT_ANSWERED);
    }

    #[test]
    fn filter_keeps_order() {
        let vm = ReportVm::from(&report(SubmitReason::Manual));
        let all = filter_entries(&vm.entries, ReviewFilter::All);
        assert_eq!(all.iter().map(|e| e.number).collect::<Vec<_>>(), vec![1, 2, 3]);
        let unanswered = filter_entries(&vm.entries, ReviewFilter::Unanswered);
        assert_eq!(unanswered.len(), 1);
        assert_eq!(unanswered[0].number, 3);
    }
}
