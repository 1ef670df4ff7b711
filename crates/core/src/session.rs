use rand::Rng;
use thiserror::Error;

use crate::model::{Question, Topic};
use crate::shuffle::shuffle_options;

/// Number of questions a quiz must contain.
pub const QUESTIONS_PER_QUIZ: usize = 5;

/// Static message shown for every fetch failure.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to load questions. Please try again.";

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// A transition that was rejected and left the session untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransitionError {
    #[error("questions are already loading")]
    AlreadyLoading,

    #[error("a quiz is in progress")]
    QuizInProgress,

    #[error("not waiting for an answer")]
    NotAwaitingAnswer,

    #[error("{0:?} is not an option of the current question")]
    UnknownOption(String),

    #[error("ticket belongs to a superseded session state")]
    StaleTicket,
}

//
// ─── PHASE & TICKETS ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Idle,
    Loading,
    AwaitingAnswer,
    ShowingFeedback,
    Finished,
    Errored,
}

impl QuizPhase {
    /// `AwaitingAnswer` or `ShowingFeedback`.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, QuizPhase::AwaitingAnswer | QuizPhase::ShowingFeedback)
    }
}

/// Authorises exactly one fetch completion for the session generation that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    topic: Topic,
}

impl FetchTicket {
    #[must_use]
    pub fn topic(&self) -> Topic {
        self.topic
    }
}

/// Authorises the delayed advance after an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTicket {
    generation: u64,
    position: usize,
    correct: bool,
}

impl AdvanceTicket {
    /// Whether the answer that issued this ticket was correct.
    #[must_use]
    pub fn correct(&self) -> bool {
        self.correct
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    NextQuestion { position: usize },
    Finished { score: usize, total: usize },
}

//
// ─── SNAPSHOT ─────────────────────────────────────────────────────────────────
//

/// Render-ready view of the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub text: String,
    pub options: Vec<String>,
    pub correct_option: String,
}

/// Immutable copy of the session handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub category: Option<Topic>,
    pub phase: QuizPhase,
    pub error_message: Option<&'static str>,
    pub current: Option<QuestionView>,
    pub selected: Option<String>,
    pub correctness: Option<bool>,
    pub score: usize,
    pub position: usize,
    pub total: usize,
}

impl SessionSnapshot {
    #[must_use]
    pub fn loading(&self) -> bool {
        self.phase == QuizPhase::Loading
    }

    #[must_use]
    pub fn feedback_visible(&self) -> bool {
        self.phase == QuizPhase::ShowingFeedback
    }

    #[must_use]
    pub fn finished(&self) -> bool {
        self.phase == QuizPhase::Finished
    }

    /// Questions answered so far, counting the one whose feedback is showing.
    #[must_use]
    pub fn answered(&self) -> usize {
        self.position + usize::from(self.feedback_visible())
    }

    #[must_use]
    pub fn score_label(&self) -> String {
        format!("{}/{}", self.score, self.total)
    }
}

//
// ─── SESSION ──────────────────────────────────────────────────────────────────
//

/// The single quiz session and its transitions.
///
/// Every transition is synchronous. Work that happens later (the question
/// fetch, the post-answer delay) is represented by tickets; `reset` bumps
/// the generation so tickets issued before it are refused.
#[derive(Debug, Clone)]
pub struct QuizSession {
    category: Option<Topic>,
    questions: Vec<Question>,
    position: usize,
    score: usize,
    selected: Option<String>,
    correctness: Option<bool>,
    phase: QuizPhase,
    error_message: Option<&'static str>,
    generation: u64,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            category: None,
            questions: Vec::new(),
            position: 0,
            score: 0,
            selected: None,
            correctness: None,
            phase: QuizPhase::Idle,
            error_message: None,
            generation: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn category(&self) -> Option<Topic> {
        self.category
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase.is_active() {
            self.questions.get(self.position)
        } else {
            None
        }
    }

    /// Choose a topic and enter `Loading`.
    ///
    /// From `Finished` or `Errored` the session is reset first.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::AlreadyLoading` while a fetch is in flight and
    /// `TransitionError::QuizInProgress` while a quiz is active.
    pub fn select_category(&mut self, topic: Topic) -> Result<FetchTicket, TransitionError> {
        match self.phase {
            QuizPhase::Loading => return Err(TransitionError::AlreadyLoading),
            QuizPhase::AwaitingAnswer | QuizPhase::ShowingFeedback => {
                return Err(TransitionError::QuizInProgress);
            }
            QuizPhase::Finished | QuizPhase::Errored => self.reset(),
            QuizPhase::Idle => {}
        }

        self.category = Some(topic);
        self.phase = QuizPhase::Loading;

        Ok(FetchTicket {
            generation: self.generation,
            topic,
        })
    }

    /// Apply a successful fetch. Options of every question are shuffled.
    ///
    /// A result that does not contain exactly `QUESTIONS_PER_QUIZ` questions
    /// moves the session to `Errored`.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::StaleTicket` if the session was reset since
    /// the ticket was issued.
    pub fn fetch_succeeded<R: Rng + ?Sized>(
        &mut self,
        ticket: FetchTicket,
        questions: Vec<Question>,
        rng: &mut R,
    ) -> Result<(), TransitionError> {
        self.check_fetch_ticket(ticket)?;

        if questions.len() != QUESTIONS_PER_QUIZ {
            self.enter_errored();
            return Ok(());
        }

        self.questions = questions
            .into_iter()
            .map(|question| shuffle_options(question, rng))
            .collect();
        self.position = 0;
        self.score = 0;
        self.selected = None;
        self.correctness = None;
        self.error_message = None;
        self.phase = QuizPhase::AwaitingAnswer;
        Ok(())
    }

    /// Apply a failed fetch.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::StaleTicket` if the session was reset since
    /// the ticket was issued.
    pub fn fetch_failed(&mut self, ticket: FetchTicket) -> Result<(), TransitionError> {
        self.check_fetch_ticket(ticket)?;
        self.enter_errored();
        Ok(())
    }

    /// Answer the current question and show feedback.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::NotAwaitingAnswer` outside `AwaitingAnswer`
    /// (including a second click while feedback shows) and
    /// `TransitionError::UnknownOption` if `value` is not an option.
    pub fn select_option(&mut self, value: &str) -> Result<AdvanceTicket, TransitionError> {
        if self.phase != QuizPhase::AwaitingAnswer {
            return Err(TransitionError::NotAwaitingAnswer);
        }
        let question = self
            .questions
            .get(self.position)
            .ok_or(TransitionError::NotAwaitingAnswer)?;
        if !question.has_option(value) {
            return Err(TransitionError::UnknownOption(value.to_string()));
        }

        let correct = question.is_correct(value);
        if correct {
            self.score += 1;
        }
        self.selected = Some(value.to_string());
        self.correctness = Some(correct);
        self.phase = QuizPhase::ShowingFeedback;

        Ok(AdvanceTicket {
            generation: self.generation,
            position: self.position,
            correct,
        })
    }

    /// Leave feedback and move to the next question or finish.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::StaleTicket` if the ticket does not match the
    /// feedback currently shown.
    pub fn advance(&mut self, ticket: AdvanceTicket) -> Result<AdvanceOutcome, TransitionError> {
        if ticket.generation != self.generation
            || ticket.position != self.position
            || self.phase != QuizPhase::ShowingFeedback
        {
            return Err(TransitionError::StaleTicket);
        }

        self.selected = None;
        self.correctness = None;

        if self.position + 1 < self.questions.len() {
            self.position += 1;
            self.phase = QuizPhase::AwaitingAnswer;
            Ok(AdvanceOutcome::NextQuestion {
                position: self.position,
            })
        } else {
            self.position = self.questions.len();
            self.phase = QuizPhase::Finished;
            Ok(AdvanceOutcome::Finished {
                score: self.score,
                total: self.questions.len(),
            })
        }
    }

    /// Return to `Idle` from any state, invalidating outstanding tickets.
    pub fn reset(&mut self) {
        let generation = self.generation.wrapping_add(1);
        *self = Self::new();
        self.generation = generation;
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            category: self.category,
            phase: self.phase,
            error_message: self.error_message,
            current: self.current_question().map(|question| QuestionView {
                text: question.text().to_string(),
                options: question.options().to_vec(),
                correct_option: question.correct_option().to_string(),
            }),
            selected: self.selected.clone(),
            correctness: self.correctness,
            score: self.score,
            position: self.position,
            total: self.questions.len(),
        }
    }

    fn check_fetch_ticket(&self, ticket: FetchTicket) -> Result<(), TransitionError> {
        if ticket.generation != self.generation || self.phase != QuizPhase::Loading {
            return Err(TransitionError::StaleTicket);
        }
        Ok(())
    }

    fn enter_errored(&mut self) {
        self.questions.clear();
        self.position = 0;
        self.score = 0;
        self.selected = None;
        self.correctness = None;
        self.error_message = Some(FETCH_FAILED_MESSAGE);
        self.phase = QuizPhase::Errored;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
