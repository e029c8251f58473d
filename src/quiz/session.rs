use super::question::Question;

/// One attempt at a loaded quiz: steps through the questions one at a time,
/// records the chosen option per question and scores the attempt once the
/// user advances past the last question.
///
/// The session performs no I/O and enforces its preconditions by making
/// invalid calls no-ops; the presentation layer is expected to gate controls
/// (e.g. disable Next while the current question is unanswered).
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    selected: Vec<Option<usize>>,
    completed: bool,
}

/// Per-question entry of the final review screen.
#[derive(Debug, PartialEq, Eq)]
pub struct ReviewEntry<'a> {
    pub question: &'a str,
    /// text of the user's chosen option; `None` when unanswered or when the
    /// question has no discrete options
    pub chosen: Option<&'a str>,
    /// correct answer text, empty when none could be determined
    pub correct: &'a str,
    pub is_correct: bool,
}

impl QuizSession {
    /// Starts a session at the first question with nothing selected.
    /// Returns `None` for an empty question list, which the caller renders
    /// as "no quiz could be generated" instead of a quiz.
    pub fn new(questions: Vec<Question>) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }
        let selected = vec![None; questions.len()];
        Some(Self {
            questions,
            current: 0,
            selected,
            completed: false,
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question currently shown, or `None` once the session completed.
    pub fn current_question(&self) -> Option<&Question> {
        if self.completed {
            return None;
        }
        self.questions.get(self.current)
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Chosen option index for question `idx`, if one was recorded.
    pub fn selection(&self, idx: usize) -> Option<usize> {
        self.selected.get(idx).copied().flatten()
    }

    pub fn selections(&self) -> &[Option<usize>] {
        &self.selected
    }

    /// Whether the current question has a recorded selection; the UI's
    /// Next/Finish gate.
    pub fn current_answered(&self) -> bool {
        !self.completed && self.selection(self.current).is_some()
    }

    /// Records `option_idx` for the current question, overwriting any
    /// previous choice. The index is not validated against the option list;
    /// an out-of-range value is kept and simply never grades correct.
    /// No-op once completed.
    pub fn select_option(&mut self, option_idx: usize) {
        if self.completed {
            return;
        }
        self.selected[self.current] = Some(option_idx);
    }

    /// Moves to the next question, or completes the session from the last
    /// one. No-op once completed.
    pub fn advance(&mut self) {
        if self.completed {
            return;
        }
        if self.current + 1 == self.questions.len() {
            self.completed = true;
        } else {
            self.current += 1;
        }
    }

    /// Moves back one question, keeping the selection of the question being
    /// left. No-op at the first question or once completed.
    pub fn retreat(&mut self) {
        if self.completed || self.current == 0 {
            return;
        }
        self.current -= 1;
    }

    /// Number of questions whose recorded selection matches the determined
    /// correct index. A question without a determinable correct answer never
    /// counts, even while it is also unanswered.
    pub fn score(&self) -> usize {
        self.selected
            .iter()
            .zip(&self.questions)
            .filter(|(sel, q)| matches!((sel, q.answer_idx), (Some(s), Some(a)) if *s == a))
            .count()
    }

    /// Back to the first question with all selections cleared, keeping the
    /// same questions. No re-fetch, no re-parse.
    pub fn restart(&mut self) {
        self.current = 0;
        self.selected = vec![None; self.questions.len()];
        self.completed = false;
    }

    /// Per-question review for the score screen, in question order.
    pub fn review(&self) -> Vec<ReviewEntry<'_>> {
        self.questions
            .iter()
            .zip(&self.selected)
            .map(|(q, sel)| {
                let chosen = q
                    .options
                    .as_ref()
                    .zip(*sel)
                    .and_then(|(options, s)| options.get(s))
                    .map(String::as_str);
                let is_correct =
                    matches!((sel, q.answer_idx), (Some(s), Some(a)) if *s == a);
                ReviewEntry {
                    question: &q.question,
                    chosen,
                    correct: q.correct_text(),
                    is_correct,
                }
            })
            .collect()
    }
}
