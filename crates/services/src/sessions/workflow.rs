use std::sync::Arc;

use chrono::Duration;

use quiz_core::Clock;
use quiz_core::model::{SessionSummary, SourceId};

use crate::error::SessionError;
use crate::gateway::MutationGateway;
use crate::loader::PairStore;
use crate::schedule::ScheduleService;

use super::service::{Choice, Question, QuizSession, question_time_limit};

/// What a request for the next question produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionOutcome {
    /// A question to present.
    Question(Question),
    /// Every pair in the source has been shown; not an error.
    Exhausted,
    /// The session countdown ran out; no further questions this session.
    SessionEnded(SessionSummary),
}

/// Result of answering the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerResult {
    pub chosen: String,
    pub answered: u32,
}

/// Orchestrates loader, scheduler, and mutation gateway for one client.
///
/// Deletion of consumed pairs is submitted on a spawned task and never
/// awaited; its failure is logged and the session advances regardless,
/// because the remaining queue alone guarantees a pair is not shown again.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    store: Arc<dyn PairStore>,
    schedules: ScheduleService,
    gateway: Arc<dyn MutationGateway>,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        store: Arc<dyn PairStore>,
        schedules: ScheduleService,
        gateway: Arc<dyn MutationGateway>,
    ) -> Self {
        Self {
            clock,
            store,
            schedules,
            gateway,
        }
    }

    /// Load a source and begin a session over it.
    ///
    /// A `target` duration arms the session countdown; `None` runs until the
    /// source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Load` when the source cannot be loaded.
    pub async fn start(
        &self,
        source: SourceId,
        target: Option<Duration>,
    ) -> Result<QuizSession, SessionError> {
        let pairs = self.store.load(&source).await?;
        Ok(QuizSession::new(source, pairs, self.clock.now(), target))
    }

    /// Draw the next question for the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Inactive` once the session has been finished,
    /// and propagates scheduler/storage failures.
    pub async fn next_question(
        &self,
        session: &mut QuizSession,
    ) -> Result<QuestionOutcome, SessionError> {
        if !session.is_active() {
            return Err(SessionError::Inactive);
        }

        let now = self.clock.now();
        if session.is_expired(now) {
            let summary = session.finish(now)?;
            return Ok(QuestionOutcome::SessionEnded(summary));
        }

        let Some(draw) = self
            .schedules
            .next(session.source(), session.pair_count())
            .await?
        else {
            return Ok(QuestionOutcome::Exhausted);
        };

        let Some(pair) = session.pairs().get(draw.index).cloned() else {
            return Err(SessionError::MissingPair { index: draw.index });
        };

        let question = Question {
            index: draw.index,
            pair,
            remaining: draw.remaining,
            answer_by: now + question_time_limit(),
        };
        session.begin_question(question.clone());
        Ok(QuestionOutcome::Question(question))
    }

    /// Record an answer for the current question, submit deletion of the
    /// consumed pair, and report the running count.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoCurrentQuestion` when nothing is presented.
    pub fn answer(
        &self,
        session: &mut QuizSession,
        choice: Choice,
    ) -> Result<AnswerResult, SessionError> {
        let question = session
            .take_current()
            .ok_or(SessionError::NoCurrentQuestion)?;

        session.record_answer();
        self.submit_delete(session.source().clone(), question.index);

        Ok(AnswerResult {
            chosen: question.chosen_text(choice).to_owned(),
            answered: session.answered(),
        })
    }

    /// Discard the current question without counting it as answered; used
    /// for both explicit skips and per-question timeouts. The consumed pair
    /// is still submitted for deletion.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoCurrentQuestion` when nothing is presented.
    pub fn skip(&self, session: &mut QuizSession) -> Result<(), SessionError> {
        let question = session
            .take_current()
            .ok_or(SessionError::NoCurrentQuestion)?;
        self.submit_delete(session.source().clone(), question.index);
        Ok(())
    }

    /// Forget which pairs were already shown for a source. The seed is kept,
    /// so the regenerated order matches the original one.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn reset_history(&self, source: &SourceId) -> Result<(), SessionError> {
        self.schedules.reset(source).await?;
        Ok(())
    }

    /// Persisted remaining count for a source, for progress displays.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn remaining_count(&self, source: &SourceId) -> Result<Option<usize>, SessionError> {
        Ok(self.schedules.remaining_count(source).await?)
    }

    /// Manifest of available sources.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Load` when the manifest cannot be loaded.
    pub async fn manifest(&self) -> Result<Vec<crate::loader::ManifestEntry>, SessionError> {
        Ok(self.store.manifest().await?)
    }

    fn submit_delete(&self, source: SourceId, index: u32) {
        let gateway = Arc::clone(&self.gateway);
        tokio::spawn(async move {
            if !gateway.delete_pair(&source, index).await {
                tracing::warn!(%source, index, "pair deletion was not applied");
            }
        });
    }
}
