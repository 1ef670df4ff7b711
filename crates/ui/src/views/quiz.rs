#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

use dioxus::prelude::*;

use quiz_core::{Topic, TransitionError};

use crate::context::AppContext;
use crate::vm::{QuestionVm, QuizScreenVm, TopicVm, map_quiz_screen};

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let quiz = ctx.quiz();
    let topics = ctx.topics().to_vec();
    let mut snapshot = use_signal({
        let quiz = quiz.clone();
        move || quiz.snapshot()
    });

    let quiz_for_pick = quiz.clone();
    let pick_topic = use_callback(move |topic: Topic| {
        let quiz = quiz_for_pick.clone();
        // Refused while a fetch is in flight or a quiz is running.
        let Ok(ticket) = quiz.begin(topic) else {
            return;
        };
        snapshot.set(quiz.snapshot());

        spawn(async move {
            let loaded = quiz.load(ticket).await;
            // Only a reset during the fetch can refuse the result.
            debug_assert!(matches!(loaded, Ok(()) | Err(TransitionError::StaleTicket)));
            snapshot.set(quiz.snapshot());
        });
    });

    let quiz_for_answer = quiz.clone();
    let pick_option = use_callback(move |value: String| {
        let quiz = quiz_for_answer.clone();
        let Ok(ticket) = quiz.select_option(&value) else {
            return;
        };
        snapshot.set(quiz.snapshot());

        spawn(async move {
            let advanced = quiz.advance_after_delay(ticket).await;
            // A reset during the delay makes this a no-op.
            debug_assert!(matches!(advanced, Ok(_) | Err(TransitionError::StaleTicket)));
            snapshot.set(quiz.snapshot());
        });
    });

    let quiz_for_reset = quiz.clone();
    let reset = use_callback(move |()| {
        quiz_for_reset.reset();
        snapshot.set(quiz_for_reset.snapshot());
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(pick_topic, pick_option, reset);
            }
        }
    }

    let screen = map_quiz_screen(&snapshot.read(), &topics);

    rsx! {
        div { class: "page quiz-page",
            header { class: "view-header",
                h2 { class: "view-title", "Topic Quiz" }
            }
            div { class: "view-divider" }
            match screen {
                QuizScreenVm::Pick { topics, error } => rsx! {
                    TopicPicker {
                        topics,
                        error: error.unwrap_or_default(),
                        on_pick: pick_topic,
                    }
                },
                QuizScreenVm::Loading { topic } => rsx! {
                    p { class: "quiz-loading", "Generating {topic} questions..." }
                },
                QuizScreenVm::Question(question) => rsx! {
                    QuestionCard { question, on_pick: pick_option, on_quit: reset }
                },
                QuizScreenVm::Finished { score_label, topic } => {
                    let heading = topic.map_or_else(
                        || "Quiz complete".to_string(),
                        |topic| format!("{topic} quiz complete"),
                    );
                    rsx! {
                        ScoreCard { heading, score_label, on_reset: reset }
                    }
                },
            }
        }
    }
}

#[component]
fn TopicPicker(
    topics: Vec<TopicVm>,
    error: &'static str,
    on_pick: Callback<Topic>,
) -> Element {
    let has_error = !error.is_empty();
    let buttons = topics.iter().map(|item| {
        let topic = item.topic;
        let label = item.label;
        rsx! {
            button {
                key: "{label}",
                class: "btn btn-primary topic-button",
                r#type: "button",
                onclick: move |_| on_pick.call(topic),
                "{label}"
            }
        }
    });

    rsx! {
        section { class: "topic-picker",
            if has_error {
                p { class: "quiz-error", role: "alert", "{error}" }
            }
            p { class: "view-subtitle", "Pick a topic to start a five-question quiz." }
            div { class: "topic-grid", {buttons} }
        }
    }
}

#[component]
fn QuestionCard(question: QuestionVm, on_pick: Callback<String>, on_quit: Callback<()>) -> Element {
    let progress = question.progress_label();
    let score = question.score;
    let has_feedback = question.feedback.is_some();
    let feedback_message = question
        .feedback
        .as_ref()
        .map(|feedback| feedback.message())
        .unwrap_or_default();
    let feedback_class = question
        .feedback
        .as_ref()
        .map_or("quiz-feedback", |feedback| feedback.class());

    let options = question.options.iter().map(|option| {
        let value = option.label.clone();
        let label = option.label.clone();
        let class = option.tone.class();
        let disabled = option.disabled;
        rsx! {
            button {
                key: "{label}",
                class: class,
                r#type: "button",
                disabled: disabled,
                onclick: move |_| on_pick.call(value.clone()),
                "{label}"
            }
        }
    });

    rsx! {
        section { class: "question-card",
            div { class: "question-meta",
                span { class: "question-progress", "{progress}" }
                span { class: "question-score", "Score: {score}" }
                button {
                    class: "btn btn-secondary quiz-quit",
                    r#type: "button",
                    onclick: move |_| on_quit.call(()),
                    "Quit"
                }
            }
            h3 { class: "question-text", "{question.text}" }
            div { class: "quiz-options", {options} }
            if has_feedback {
                p { class: feedback_class, role: "status", "{feedback_message}" }
            }
        }
    }
}

#[component]
fn ScoreCard(heading: String, score_label: String, on_reset: Callback<()>) -> Element {
    rsx! {
        section { class: "score-card",
            h3 { "{heading}" }
            p { class: "score", "Your score: {score_label}" }
            button {
                class: "btn btn-primary",
                r#type: "button",
                onclick: move |_| on_reset.call(()),
                "Try again"
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    pick_topic: Rc<RefCell<Option<Callback<Topic>>>>,
    pick_option: Rc<RefCell<Option<Callback<String>>>>,
    reset: Rc<RefCell<Option<Callback<()>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(
        &self,
        pick_topic: Callback<Topic>,
        pick_option: Callback<String>,
        reset: Callback<()>,
    ) {
        *self.pick_topic.borrow_mut() = Some(pick_topic);
        *self.pick_option.borrow_mut() = Some(pick_option);
        *self.reset.borrow_mut() = Some(reset);
    }

    pub(crate) fn pick_topic(&self) -> Callback<Topic> {
        (*self.pick_topic.borrow()).expect("pick_topic registered")
    }

    pub(crate) fn pick_option(&self) -> Callback<String> {
        (*self.pick_option.borrow()).expect("pick_option registered")
    }

    pub(crate) fn reset(&self) -> Callback<()> {
        (*self.reset.borrow()).expect("reset registered")
    }
}
