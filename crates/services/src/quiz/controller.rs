use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use quiz_core::{
    AdvanceOutcome, AdvanceTicket, FetchTicket, QuizPhase, QuizSession, SessionSnapshot, Topic,
    TransitionError,
};

use crate::question_source::QuestionSource;

/// How long answer feedback stays visible before the quiz advances.
pub const DEFAULT_FEEDBACK_DELAY: Duration = Duration::from_millis(1500);

/// Owns the process-wide quiz session and runs its asynchronous steps.
///
/// The session lock is never held across an `.await`: fetches and the
/// feedback delay run unlocked and re-enter through tickets, so a `reset`
/// that happens meanwhile turns their results into no-ops.
pub struct QuizController {
    session: Mutex<QuizSession>,
    source: Arc<dyn QuestionSource>,
    feedback_delay: Duration,
}

impl QuizController {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self {
            session: Mutex::new(QuizSession::new()),
            source,
            feedback_delay: DEFAULT_FEEDBACK_DELAY,
        }
    }

    #[must_use]
    pub fn with_feedback_delay(mut self, feedback_delay: Duration) -> Self {
        self.feedback_delay = feedback_delay;
        self
    }

    #[must_use]
    pub fn feedback_delay(&self) -> Duration {
        self.feedback_delay
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }

    /// Enter `Loading` for `topic` without starting the fetch.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError` if a fetch is in flight or a quiz is active.
    pub fn begin(&self, topic: Topic) -> Result<FetchTicket, TransitionError> {
        let ticket = self.lock().select_category(topic)?;
        info!(topic = %topic, "quiz category selected");
        Ok(ticket)
    }

    /// Fetch questions for a ticket issued by `begin` and apply the result.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::StaleTicket` if the session was reset while
    /// the fetch was in flight; the result is discarded.
    pub async fn load(&self, ticket: FetchTicket) -> Result<(), TransitionError> {
        let topic = ticket.topic();
        let result = self.source.fetch_questions(topic).await;

        let mut session = self.lock();
        let applied = match result {
            Ok(questions) => {
                let count = questions.len();
                let applied = session.fetch_succeeded(ticket, questions, &mut rand::rng());
                if applied.is_ok() && session.phase() == QuizPhase::Errored {
                    warn!(topic = %topic, count, "question source returned the wrong number of questions");
                } else if applied.is_ok() {
                    info!(topic = %topic, count, "quiz started");
                }
                applied
            }
            Err(err) => {
                warn!(topic = %topic, error = %err, "question fetch failed");
                session.fetch_failed(ticket)
            }
        };

        if let Err(err) = &applied {
            debug!(topic = %topic, error = %err, "discarding fetch result");
        }
        applied
    }

    /// `begin` followed by `load`.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError` if the category cannot be selected or the
    /// fetch result became stale.
    pub async fn select_category(&self, topic: Topic) -> Result<(), TransitionError> {
        let ticket = self.begin(topic)?;
        self.load(ticket).await
    }

    /// Answer the current question. The caller schedules the advance with
    /// `advance_after_delay`.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError` if no answer is expected or `value` is not
    /// an option of the current question.
    pub fn select_option(&self, value: &str) -> Result<AdvanceTicket, TransitionError> {
        let ticket = self.lock().select_option(value)?;
        debug!(
            position = ticket.position(),
            correct = ticket.correct(),
            "answer recorded"
        );
        Ok(ticket)
    }

    /// Wait for the feedback delay, then advance.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::StaleTicket` if the session was reset during
    /// the delay.
    pub async fn advance_after_delay(
        &self,
        ticket: AdvanceTicket,
    ) -> Result<AdvanceOutcome, TransitionError> {
        tokio::time::sleep(self.feedback_delay).await;

        let outcome = self.lock().advance(ticket);
        match &outcome {
            Ok(AdvanceOutcome::Finished { score, total }) => {
                info!(score, total, "quiz finished");
            }
            Ok(AdvanceOutcome::NextQuestion { position }) => {
                debug!(position, "next question");
            }
            Err(err) => debug!(error = %err, "discarding pending advance"),
        }
        outcome
    }

    /// `select_option` followed by `advance_after_delay`.
    ///
    /// # Errors
    ///
    /// See `select_option` and `advance_after_delay`.
    pub async fn answer(&self, value: &str) -> Result<AdvanceOutcome, TransitionError> {
        let ticket = self.select_option(value)?;
        self.advance_after_delay(ticket).await
    }

    pub fn reset(&self) {
        self.lock().reset();
        info!("quiz reset");
    }

    fn lock(&self) -> MutexGuard<'_, QuizSession> {
        // Transitions leave the session consistent even if a holder panicked.
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for QuizController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizController")
            .field("phase", &self.lock().phase())
            .field("feedback_delay", &self.feedback_delay)
            .finish_non_exhaustive()
    }
}
