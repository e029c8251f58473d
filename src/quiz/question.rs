use serde::{Deserialize, Serialize};

/// One normalized quiz question as consumed by the quiz player.
///
/// Field names serialize in camelCase to match the platform's JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// question text
    pub question: String,

    /// ordered answer choices; `None` for open-ended/true-false questions
    /// that come without discrete options
    pub options: Option<Vec<String>>,

    /// index of the correct choice into `options`; `None` when no correct
    /// index could be determined from the payload
    pub answer_idx: Option<usize>,

    /// human-readable correct answer, used when `options` is `None` or as a
    /// fallback display value
    pub answer_text: String,
}

impl Question {
    /// True for questions without discrete options, which the player renders
    /// as an open/true-false placeholder.
    pub fn is_open_ended(&self) -> bool {
        self.options.is_none()
    }

    /// Text of the correct answer: the correct option when one is
    /// determined, otherwise `answer_text` (possibly empty).
    pub fn correct_text(&self) -> &str {
        match (&self.options, self.answer_idx) {
            (Some(options), Some(idx)) => options
                .get(idx)
                .map(String::as_str)
                .unwrap_or(&self.answer_text),
            _ => &self.answer_text,
        }
    }
}
