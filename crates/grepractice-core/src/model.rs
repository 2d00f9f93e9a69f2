//! Canonical question model.
//!
//! These are the UI-facing types every quiz renderer works with, independent
//! of how the remote service happens to name its fields. The serialized form
//! uses the service's own field names, so a serialized question is also a
//! valid raw record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder explanation when the service has none.
pub const NO_EXPLANATION: &str = "No explanation available.";

/// Default difficulty label, matching the service default.
pub const DEFAULT_DIFFICULTY: &str = "medium";

/// A normalized, immutable quiz item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalQuestion {
    /// Stable identifier.
    pub id: String,
    /// Question type.
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// The question stem. Empty only when the upstream record had none.
    #[serde(rename = "content")]
    pub prompt_text: String,
    /// Selectable answers, in display order. Never empty.
    pub options: Vec<QuestionOption>,
    /// Id of the correct entry in `options`.
    #[serde(rename = "correct_answer")]
    pub correct_option_id: String,
    /// Worked solution shown after submitting.
    pub explanation: String,
    /// Difficulty label, e.g. "easy" or "hard".
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    /// Topic tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Data-quality issues found while decoding this record.
    #[serde(skip)]
    pub quality: Vec<WarningKind>,
}

fn default_difficulty() -> String {
    DEFAULT_DIFFICULTY.to_string()
}

impl CanonicalQuestion {
    /// The option `correct_option_id` points at.
    pub fn correct_option(&self) -> Option<&QuestionOption> {
        self.options
            .iter()
            .find(|o| o.option_id == self.correct_option_id)
    }

    /// Position of an option id within `options`.
    pub fn option_index(&self, option_id: &str) -> Option<usize> {
        self.options.iter().position(|o| o.option_id == option_id)
    }

    /// True when the answer key was substituted because the upstream answer
    /// matched no option. Such a key must not be trusted for scoring.
    pub fn is_answer_fallback(&self) -> bool {
        self.quality.contains(&WarningKind::UnmatchedCorrectAnswer)
    }

    /// True when no data-quality issue was found.
    pub fn is_clean(&self) -> bool {
        self.quality.is_empty()
    }
}

/// One selectable answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    #[serde(rename = "id")]
    pub option_id: String,
    pub text: String,
}

impl QuestionOption {
    pub fn new(option_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            option_id: option_id.into(),
            text: text.into(),
        }
    }
}

/// Supported question kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    SingleChoice,
    Other,
}

impl QuestionKind {
    /// Map the service's `type` field. An absent type is the service default.
    pub fn from_upstream(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("single_choice") => QuestionKind::SingleChoice,
            Some(_) => QuestionKind::Other,
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::SingleChoice => write!(f, "single choice"),
            QuestionKind::Other => write!(f, "other"),
        }
    }
}

/// Kinds of non-fatal data-quality problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// `correct_answer` matched no option; the first option was substituted.
    UnmatchedCorrectAnswer,
    /// None of the prompt fields were present.
    EmptyPrompt,
    /// The record had no options; the placeholder set was substituted.
    PlaceholderOptions,
    /// The record had no id; a positional id was substituted.
    MissingId,
    /// The record was not a JSON object.
    UndecodableRecord,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            WarningKind::UnmatchedCorrectAnswer => {
                "correct answer matches no option, first option substituted"
            }
            WarningKind::EmptyPrompt => "question has no prompt text",
            WarningKind::PlaceholderOptions => "question has no options, placeholders substituted",
            WarningKind::MissingId => "question has no id, positional id substituted",
            WarningKind::UndecodableRecord => "record is not a JSON object",
        };
        f.write_str(msg)
    }
}

/// A data-quality warning tied to one input record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualityWarning {
    /// Position of the record in the input.
    pub index: usize,
    /// Id of the resulting canonical question.
    pub question_id: String,
    pub kind: WarningKind,
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.question_id, self.kind)
    }
}
