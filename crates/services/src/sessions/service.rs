use std::fmt;

use chrono::{DateTime, Duration, Utc};

use quiz_core::model::{Pair, PairSet, SessionSummary, SessionSummaryError, SourceId};

/// How long the user has to answer one question before it counts as a skip.
pub const QUESTION_TIME_LIMIT_SECS: i64 = 5;

/// The per-question time limit as a `Duration`.
#[must_use]
pub fn question_time_limit() -> Duration {
    Duration::seconds(QUESTION_TIME_LIMIT_SECS)
}

/// Which of the two options was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    OptionA,
    OptionB,
}

/// One presented question: the pair, its original index in the backing file
/// (needed for deletion), the queue length after the draw, and the moment the
/// per-question timer runs out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub index: u32,
    pub pair: Pair,
    pub remaining: usize,
    pub answer_by: DateTime<Utc>,
}

impl Question {
    /// Question text presented to the user.
    #[must_use]
    pub fn prompt(&self) -> String {
        self.pair.prompt()
    }

    /// Display text of the picked option.
    #[must_use]
    pub fn chosen_text(&self, choice: Choice) -> &str {
        match choice {
            Choice::OptionA => self.pair.option_a(),
            Choice::OptionB => self.pair.option_b(),
        }
    }
}

/// Ephemeral state for one run of questions against one source file.
///
/// Nothing here is persisted: the resumable part of the experience lives in
/// the schedule repository, while the session only tracks the loaded pairs,
/// the optional deadline, and the running answered count.
pub struct QuizSession {
    source: SourceId,
    pairs: PairSet,
    started_at: DateTime<Utc>,
    deadline: Option<DateTime<Utc>>,
    answered: u32,
    active: bool,
    current: Option<Question>,
}

impl QuizSession {
    /// Start a session over an already-loaded pair set.
    ///
    /// `started_at` should come from the services layer clock; a `target`
    /// duration arms the session countdown.
    #[must_use]
    pub fn new(
        source: SourceId,
        pairs: PairSet,
        started_at: DateTime<Utc>,
        target: Option<Duration>,
    ) -> Self {
        Self {
            source,
            pairs,
            started_at,
            deadline: target.map(|t| started_at + t),
            answered: 0,
            active: true,
            current: None,
        }
    }

    #[must_use]
    pub fn source(&self) -> &SourceId {
        &self.source
    }

    #[must_use]
    pub fn pairs(&self) -> &PairSet {
        &self.pairs
    }

    #[must_use]
    pub fn pair_count(&self) -> u32 {
        self.pairs.count()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    /// True once the session countdown has run out.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Time left on the session countdown, clamped at zero; `None` when the
    /// session has no target duration.
    #[must_use]
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.deadline
            .map(|deadline| (deadline - now).max(Duration::zero()))
    }

    pub(crate) fn begin_question(&mut self, question: Question) {
        self.current = Some(question);
    }

    pub(crate) fn take_current(&mut self) -> Option<Question> {
        self.current.take()
    }

    pub(crate) fn record_answer(&mut self) {
        self.answered += 1;
    }

    /// Deactivate the session and produce its summary.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError` if `now` precedes the session start.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<SessionSummary, SessionSummaryError> {
        self.active = false;
        self.current = None;
        SessionSummary::from_parts(self.source.clone(), self.started_at, now, self.answered)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("source", &self.source)
            .field("pair_count", &self.pairs.len())
            .field("answered", &self.answered)
            .field("active", &self.active)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
