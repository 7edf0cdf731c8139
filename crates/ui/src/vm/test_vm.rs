use std::collections::BTreeMap;

use exam_core::model::{OptionIndex, Question, QuestionId, QuestionSet};
use exam_core::time::format_clock;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: u8,
    pub letter: char,
    pub text: String,
    pub selected: bool,
}

/// The question card currently on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub id: QuestionId,
    pub prompt: String,
    pub options: Vec<OptionVm>,
}

impl QuestionVm {
    #[must_use]
    pub fn new(question: &Question, selected: Option<OptionIndex>) -> Self {
        let options = OptionIndex::all()
            .map(|option| OptionVm {
                index: option.value(),
                letter: option.letter(),
                text: question.option_text(option).to_owned(),
                selected: selected == Some(option),
            })
            .collect();
        Self {
            id: question.id(),
            prompt: question.prompt().to_owned(),
            options,
        }
    }

    #[must_use]
    pub fn has_selection(&self) -> bool {
        self.options.iter().any(|option| option.selected)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavItemVm {
    pub index: usize,
    pub number: u32,
    pub answered: bool,
    pub current: bool,
}

impl NavItemVm {
    #[must_use]
    pub fn class(&self) -> &'static str {
        match (self.answered, self.current) {
            (true, true) => "nav-btn answered current",
            (false, true) => "nav-btn current",
            (true, false) => "nav-btn answered",
            (false, false) => "nav-btn",
        }
    }
}

/// Question grid plus the position/progress labels around it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigatorVm {
    pub items: Vec<NavItemVm>,
    pub current_index: usize,
    pub answered: usize,
}

impl NavigatorVm {
    #[must_use]
    pub fn new(
        questions: &QuestionSet,
        answers: &BTreeMap<QuestionId, OptionIndex>,
        current_index: usize,
    ) -> Self {
        let items = questions
            .iter()
            .enumerate()
            .map(|(index, question)| NavItemVm {
                index,
                number: question.id().value(),
                answered: answers.contains_key(&question.id()),
                current: index == current_index,
            })
            .collect();
        Self {
            items,
            current_index,
            answered: answers.len(),
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current_index == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current_index + 1 >= self.total()
    }

    #[must_use]
    pub fn position_label(&self) -> String {
        format!("Question {} of {}", self.current_index + 1, self.total())
    }

    #[must_use]
    pub fn progress_label(&self) -> String {
        format!("{} / {} answered", self.answered, self.total())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerVm {
    pub label: String,
    pub low_time: bool,
}

impl TimerVm {
    #[must_use]
    pub fn new(remaining_secs: u32, low_time: bool) -> Self {
        Self {
            label: format_clock(remaining_secs),
            low_time,
        }
    }

    #[must_use]
    pub fn class(&self) -> &'static str {
        if self.low_time {
            "timer warning"
        } else {
            "timer"
        }
    }
}

impl Default for TimerVm {
    fn default() -> Self {
        Self::new(0, false)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViolationBannerVm {
    pub remaining_attempts: u32,
}

impl ViolationBannerVm {
    #[must_use]
    pub fn message(&self) -> String {
        match self.remaining_attempts {
            0 => "Violation limit reached. Your test is being submitted.".to_owned(),
            1 => "Warning: leaving the test window is not allowed. 1 attempt left.".to_owned(),
            n => format!("Warning: leaving the test window is not allowed. {n} attempts left."),
        }
    }
}

/// Banner shown once at least one violation has been counted.
#[must_use]
pub fn violation_banner(remaining_attempts: u32, limit: u32) -> Option<ViolationBannerVm> {
    (remaining_attempts < limit).then_some(ViolationBannerVm { remaining_attempts })
}
