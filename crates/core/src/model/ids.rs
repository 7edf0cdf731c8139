use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

/// 1-based identifier of a question inside its question set.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(u32);

impl QuestionId {
    /// Creates a new `QuestionId`
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the underlying u32 value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Zero-based position this id occupies in a sequential question set.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        usize::try_from(self.0).ok()?.checked_sub(1)
    }
}

/// Index of an answer option, always within `0..OPTION_COUNT`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct OptionIndex(u8);

impl OptionIndex {
    /// Returns `None` when `index` is not a valid option slot.
    #[must_use]
    pub fn new(index: u8) -> Option<Self> {
        (usize::from(index) < OPTION_COUNT).then_some(Self(index))
    }

    /// Maps any value onto a valid slot (`value % OPTION_COUNT`).
    #[must_use]
    pub fn wrapping(value: u8) -> Self {
        Self(value % OPTION_COUNT as u8)
    }

    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn as_usize(&self) -> usize {
        usize::from(self.0)
    }

    /// Letter label used on option buttons (`A`..`D`).
    #[must_use]
    pub fn letter(&self) -> char {
        char::from(b'A' + self.0)
    }

    /// All option slots in display order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..OPTION_COUNT as u8).map(Self)
    }
}

impl TryFrom<u8> for OptionIndex {
    type Error = ParseIdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ParseIdError {
            kind: "OptionIndex".to_string(),
        })
    }
}

impl From<OptionIndex> for u8 {
    fn from(value: OptionIndex) -> Self {
        value.0
    }
}

/// Identifier of an assessment (a named question bank).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssessmentId(u64);

impl AssessmentId {
    /// Creates a new `AssessmentId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Storage identifier for a persisted attempt (`SQLite` row id).
pub type AttemptId = i64;

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Debug for OptionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionIndex({})", self.0)
    }
}

impl fmt::Debug for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssessmentId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for OptionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing an id from a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for QuestionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>()
            .ok()
            .filter(|v| *v > 0)
            .map(QuestionId::new)
            .ok_or_else(|| ParseIdError {
                kind: "QuestionId".to_string(),
            })
    }
}

impl FromStr for AssessmentId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(AssessmentId::new)
            .map_err(|_| ParseIdError {
                kind: "AssessmentId".to_string(),
            })
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_id_maps_to_zero_based_position() {
        assert_eq!(QuestionId::new(1).position(), Some(0));
        assert_eq!(QuestionId::new(30).position(), Some(29));
        assert_eq!(QuestionId::new(0).position(), None);
    }

    #[test]
    fn question_id_from_str_rejects_zero() {
        assert!("0".parse::<QuestionId>().is_err());
        assert_eq!("7".parse::<QuestionId>().unwrap(), QuestionId::new(7));
    }

    #[test]
    fn option_index_bounds() {
        assert!(OptionIndex::new(0).is_some());
        assert!(OptionIndex::new(3).is_some());
        assert!(OptionIndex::new(4).is_none());
    }

    #[test]
    fn option_index_letters() {
        let letters: String = OptionIndex::all().map(|o| o.letter()).collect();
        assert_eq!(letters, "ABCD");
    }

    #[test]
    fn option_index_deserialize_rejects_out_of_range() {
        let ok: OptionIndex = serde_json::from_str("2").unwrap();
        assert_eq!(ok.value(), 2);
        assert!(serde_json::from_str::<OptionIndex>("9").is_err());
    }

    #[test]
    fn assessment_id_display_and_parse() {
        let id: AssessmentId = "12".parse().unwrap();
        assert_eq!(id, AssessmentId::new(12));
        assert_eq!(id.to_string(), "12");
        assert!("abc".parse::<AssessmentId>().is_err());
    }
}
