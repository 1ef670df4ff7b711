use quiz_core::{QuizPhase, QuestionView, SessionSnapshot, Topic};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionTone {
    Neutral,
    Correct,
    Incorrect,
    Muted,
}

impl OptionTone {
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            OptionTone::Neutral => "quiz-option",
            OptionTone::Correct => "quiz-option quiz-option--correct",
            OptionTone::Incorrect => "quiz-option quiz-option--incorrect",
            OptionTone::Muted => "quiz-option quiz-option--muted",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub label: String,
    pub tone: OptionTone,
    pub disabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedbackVm {
    Correct,
    Incorrect { correct_option: String },
}

impl FeedbackVm {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            FeedbackVm::Correct => "Correct!".to_string(),
            FeedbackVm::Incorrect { correct_option } => {
                format!("Not quite. The answer is {correct_option}.")
            }
        }
    }

    #[must_use]
    pub fn class(&self) -> &'static str {
        match self {
            FeedbackVm::Correct => "quiz-feedback quiz-feedback--correct",
            FeedbackVm::Incorrect { .. } => "quiz-feedback quiz-feedback--incorrect",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TopicVm {
    pub topic: Topic,
    pub label: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub number: usize,
    pub total: usize,
    pub score: usize,
    pub text: String,
    pub options: Vec<OptionVm>,
    pub feedback: Option<FeedbackVm>,
}

impl QuestionVm {
    #[must_use]
    pub fn progress_label(&self) -> String {
        format!("Question {} of {}", self.number, self.total)
    }
}

/// Everything the quiz page can show, derived from one session snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizScreenVm {
    Pick {
        topics: Vec<TopicVm>,
        error: Option<&'static str>,
    },
    Loading {
        topic: String,
    },
    Question(QuestionVm),
    Finished {
        score_label: String,
        topic: Option<String>,
    },
}

#[must_use]
pub fn map_quiz_screen(snapshot: &SessionSnapshot, topics: &[Topic]) -> QuizScreenVm {
    let pick = || QuizScreenVm::Pick {
        topics: topics
            .iter()
            .map(|&topic| TopicVm {
                topic,
                label: topic.label(),
            })
            .collect(),
        error: snapshot.error_message,
    };

    match snapshot.phase {
        QuizPhase::Idle | QuizPhase::Errored => pick(),
        QuizPhase::Loading => QuizScreenVm::Loading {
            topic: snapshot
                .category
                .map_or_else(String::new, |topic| topic.label().to_string()),
        },
        QuizPhase::AwaitingAnswer | QuizPhase::ShowingFeedback => snapshot
            .current
            .as_ref()
            .map_or_else(pick, |current| {
                QuizScreenVm::Question(map_question(snapshot, current))
            }),
        QuizPhase::Finished => QuizScreenVm::Finished {
            score_label: snapshot.score_label(),
            topic: snapshot.category.map(|topic| topic.label().to_string()),
        },
    }
}

fn map_question(snapshot: &SessionSnapshot, current: &QuestionView) -> QuestionVm {
    let feedback_visible = snapshot.feedback_visible();
    let selected = snapshot.selected.as_deref();

    let options = current
        .options
        .iter()
        .map(|option| {
            let tone = if !feedback_visible {
                OptionTone::Neutral
            } else if *option == current.correct_option {
                OptionTone::Correct
            } else if Some(option.as_str()) == selected {
                OptionTone::Incorrect
            } else {
                OptionTone::Muted
            };
            OptionVm {
                label: option.clone(),
                tone,
                disabled: feedback_visible,
            }
        })
        .collect();

    let feedback = match snapshot.correctness {
        Some(true) if feedback_visible => Some(FeedbackVm::Correct),
        Some(false) if feedback_visible => Some(FeedbackVm::Incorrect {
            correct_option: current.correct_option.clone(),
        }),
        _ => None,
    };

    QuestionVm {
        number: snapshot.position + 1,
        total: snapshot.total,
        score: snapshot.score,
        text: current.text.clone(),
        options,
        feedback,
    }
}
