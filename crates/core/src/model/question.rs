use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{OPTION_COUNT, OptionIndex, QuestionId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("option {index} cannot be empty")]
    EmptyOption { index: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionSetError {
    #[error("question set must contain at least one question")]
    Empty,

    #[error("question ids must be sequential: expected {expected}, found {found}")]
    NonSequentialId { expected: u32, found: u32 },

    #[error("too many questions: {len}")]
    TooMany { len: usize },
}

/// A single multiple-choice question with exactly four options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: [String; OPTION_COUNT],
    correct: OptionIndex,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` for a blank prompt and
    /// `QuestionError::EmptyOption` for any blank option text.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct: OptionIndex,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if let Some(index) = options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }

        Ok(Self {
            id,
            prompt,
            options,
            correct,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn option_text(&self, option: OptionIndex) -> &str {
        &self.options[option.as_usize()]
    }

    #[must_use]
    pub fn correct(&self) -> OptionIndex {
        self.correct
    }

    #[must_use]
    pub fn correct_text(&self) -> &str {
        self.option_text(self.correct)
    }
}

/// Ordered, immutable question set with ids `1..=N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Question>", into = "Vec<Question>")]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Wrap a list of questions, checking that ids run `1..=N` in order.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSetError::Empty` when no questions are given and
    /// `QuestionSetError::NonSequentialId` when an id is out of sequence.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionSetError> {
        if questions.is_empty() {
            return Err(QuestionSetError::Empty);
        }
        if u32::try_from(questions.len()).is_err() {
            return Err(QuestionSetError::TooMany {
                len: questions.len(),
            });
        }

        for (expected, question) in (1_u32..).zip(&questions) {
            if question.id().value() != expected {
                return Err(QuestionSetError::NonSequentialId {
                    expected,
                    found: question.id().value(),
                });
            }
        }

        Ok(Self { questions })
    }

    /// Number of questions (N). Always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn by_id(&self, id: QuestionId) -> Option<&Question> {
        id.position().and_then(|pos| self.questions.get(pos))
    }

    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        self.by_id(id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Question] {
        &self.questions
    }
}

impl TryFrom<Vec<Question>> for QuestionSet {
    type Error = QuestionSetError;

    fn try_from(value: Vec<Question>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QuestionSet> for Vec<Question> {
    fn from(value: QuestionSet) -> Self {
        value.questions
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}
