//! Placeholder question bank used when no authored bank is available.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::model::{
    OPTION_COUNT, OptionIndex, Question, QuestionError, QuestionId, QuestionSet, QuestionSetError,
};

const SAMPLE_OPTIONS: [&str; OPTION_COUNT] = [
    "Option A: Compilation Error",
    "Option B: Runtime Exception",
    "Option C: Prints \"Hello World\"",
    "Option D: No output",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GeneratorError {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Set(#[from] QuestionSetError),
}

/// Deterministic sample question generator.
///
/// The correct option of each question is drawn from a seeded RNG when the set
/// is generated and never changes afterwards. The same seed always yields the
/// same set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleGenerator {
    seed: u64,
}

impl SampleGenerator {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// A generator seeded from the OS entropy source.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Produce `count` questions with ids `1..=count`.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::Set` when `count` is zero.
    pub fn generate(&self, count: u32) -> Result<QuestionSet, GeneratorError> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut questions = Vec::with_capacity(usize::try_from(count).unwrap_or_default());

        for n in 1..=count {
            let correct = OptionIndex::wrapping(rng.random_range(0..OPTION_COUNT as u8));
            questions.push(Question::new(
                QuestionId::new(n),
                format!("What is the output of the following Java code snippet? (Question {n})"),
                SAMPLE_OPTIONS.map(String::from),
                correct,
            )?);
        }

        Ok(QuestionSet::new(questions)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_sequential_ids_and_four_options() {
        let set = SampleGenerator::new(5).generate(30).unwrap();
        assert_eq!(set.len(), 30);
        for (i, q) in set.iter().enumerate() {
            assert_eq!(q.id().value() as usize, i + 1);
            assert_eq!(q.options().len(), 4);
            assert!(q.correct().as_usize() < 4);
        }
    }

    #[test]
    fn same_seed_same_answers() {
        let a = SampleGenerator::new(99).generate(20).unwrap();
        let b = SampleGenerator::new(99).generate(20).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_count_is_rejected() {
        let err = SampleGenerator::new(1).generate(0).unwrap_err();
        assert_eq!(err, GeneratorError::Set(QuestionSetError::Empty));
    }
}
