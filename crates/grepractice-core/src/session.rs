//! Practice session state machine.
//!
//! Mirrors the practice screen: a loading phase that ends exactly once, then
//! one question at a time with select, submit, next, and a countdown clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FetchError;
use crate::loader::{LoadOutcome, QuestionOrigin};
use crate::model::CanonicalQuestion;

/// Default exam length: 20 minutes.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 1200;

/// Lifecycle of a practice session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Loading,
    Active,
    Finished,
}

/// What the student sees after submitting an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub selected_option_id: String,
    pub correct_option_id: String,
    pub is_correct: bool,
    /// The answer key was a fallback substitution and cannot be trusted.
    pub answer_unverified: bool,
    pub explanation: String,
}

/// Final tally of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub score: u32,
    pub total: usize,
    /// Questions answered whose answer key was unverified.
    pub unscored: u32,
    pub origin: Option<QuestionOrigin>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// One pass through a loaded question set: selection, submission, scoring
/// and the countdown clock.
#[derive(Debug, Clone)]
pub struct PracticeSession {
    id: Uuid,
    phase: SessionPhase,
    questions: Vec<CanonicalQuestion>,
    origin: Option<QuestionOrigin>,
    load_failure: Option<FetchError>,
    banner: Option<String>,
    current: usize,
    selected: Option<usize>,
    result_shown: bool,
    score: u32,
    unscored: u32,
    time_limit_secs: u64,
    time_left_secs: u64,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl PracticeSession {
    pub fn new(time_limit_secs: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: SessionPhase::Loading,
            questions: Vec::new(),
            origin: None,
            load_failure: None,
            banner: None,
            current: 0,
            selected: None,
            result_shown: false,
            score: 0,
            unscored: 0,
            time_limit_secs,
            time_left_secs: time_limit_secs,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::Loading
    }

    pub fn questions(&self) -> &[CanonicalQuestion] {
        &self.questions
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn load_failure(&self) -> Option<&FetchError> {
        self.load_failure.as_ref()
    }

    /// Zero-based index of the question on screen.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&CanonicalQuestion> {
        match self.phase {
            SessionPhase::Active => self.questions.get(self.current),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_result_shown(&self) -> bool {
        self.result_shown
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left_secs(&self) -> u64 {
        self.time_left_secs
    }

    pub fn time_up(&self) -> bool {
        self.time_left_secs == 0
    }

    /// End the loading phase. Only the first call has any effect.
    pub fn finish_loading(&mut self, outcome: LoadOutcome) -> bool {
        if self.phase != SessionPhase::Loading {
            tracing::debug!(session = %self.id, "ignoring duplicate load completion");
            return false;
        }

        self.banner = outcome.banner();
        self.load_failure = outcome.failure;
        self.origin = Some(outcome.origin);
        self.questions = outcome.questions;
        self.started_at = Utc::now();
        self.phase = if self.questions.is_empty() {
            self.finished_at = Some(self.started_at);
            SessionPhase::Finished
        } else {
            SessionPhase::Active
        };
        true
    }

    /// Pick an option. Ignored once the result is shown or out of range.
    pub fn select_option(&mut self, index: usize) -> bool {
        let Some(question) = self.current_question() else {
            return false;
        };
        if self.result_shown || index >= question.options.len() {
            return false;
        }
        self.selected = Some(index);
        true
    }

    /// Reveal the answer for the current selection.
    pub fn submit(&mut self) -> Option<AnswerFeedback> {
        if self.result_shown {
            return None;
        }
        let question = self.current_question()?;
        let selected = question.options.get(self.selected?)?;

        let feedback = AnswerFeedback {
            selected_option_id: selected.option_id.clone(),
            correct_option_id: question.correct_option_id.clone(),
            is_correct: selected.option_id == question.correct_option_id,
            answer_unverified: question.is_answer_fallback(),
            explanation: question.explanation.clone(),
        };
        self.result_shown = true;
        Some(feedback)
    }

    /// Score the current question and move on, finishing after the last one.
    pub fn next(&mut self) -> bool {
        if !self.result_shown {
            return false;
        }
        let Some(question) = self.current_question() else {
            return false;
        };

        let chosen = self
            .selected
            .and_then(|i| question.options.get(i))
            .map(|o| o.option_id.as_str());
        if question.is_answer_fallback() {
            self.unscored += 1;
        } else if chosen == Some(question.correct_option_id.as_str()) {
            self.score += 1;
        }

        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.selected = None;
            self.result_shown = false;
        } else {
            self.phase = SessionPhase::Finished;
            self.finished_at = Some(Utc::now());
        }
        true
    }

    /// Advance the countdown while the session is active.
    pub fn tick(&mut self, secs: u64) {
        if self.phase == SessionPhase::Active {
            self.time_left_secs = self.time_left_secs.saturating_sub(secs);
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.id,
            score: self.score,
            total: self.questions.len(),
            unscored: self.unscored,
            origin: self.origin,
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }

    /// Throw the session away and start loading again.
    pub fn restart(&mut self) {
        *self = Self::new(self.time_limit_secs);
    }
}

/// Render seconds as `m:ss`.
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
