use std::sync::Arc;
use std::time::Duration;

use quiz_core::{FETCH_FAILED_MESSAGE, Question, Topic};
use quiz_services::{QuizController, StaticQuestionSource};

use super::test_harness::{ViewHarness, setup_quiz_harness};

fn questions() -> Vec<Question> {
    (1..=5)
        .map(|n| {
            Question::new(
                format!("Capital number {n}?"),
                vec![
                    format!("Right {n}"),
                    format!("Wrong A{n}"),
                    format!("Wrong B{n}"),
                    format!("Wrong C{n}"),
                ],
                format!("Right {n}"),
            )
            .unwrap()
        })
        .collect()
}

fn controller() -> Arc<QuizController> {
    Arc::new(QuizController::new(Arc::new(StaticQuestionSource::new(
        questions(),
    ))))
}

#[tokio::test(flavor = "current_thread")]
async fn idle_view_lists_topics() {
    let mut harness = setup_quiz_harness(controller());
    harness.rebuild();
    let html = harness.render();

    for topic in Topic::ALL {
        assert!(html.contains(topic.label()), "missing {topic} in {html}");
    }
    assert!(!html.contains(FETCH_FAILED_MESSAGE), "unexpected error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn errored_view_shows_message_and_topics() {
    let quiz = Arc::new(QuizController::new(Arc::new(
        StaticQuestionSource::failing(),
    )));
    quiz.select_category(Topic::Math).await.unwrap();

    let mut harness = setup_quiz_harness(quiz);
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains(FETCH_FAILED_MESSAGE), "missing error in {html}");
    assert!(html.contains("Science"), "missing topics in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn active_view_shows_question_and_options() {
    let quiz = controller();
    quiz.select_category(Topic::GeneralKnowledge).await.unwrap();

    let mut harness = setup_quiz_harness(quiz);
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("Question 1 of 5"), "missing progress in {html}");
    assert!(html.contains("Capital number 1?"), "missing question in {html}");
    for option in ["Right 1", "Wrong A1", "Wrong B1", "Wrong C1"] {
        assert!(html.contains(option), "missing {option} in {html}");
    }
}

#[tokio::test(flavor = "current_thread")]
async fn feedback_view_shows_correct_message() {
    let quiz = controller();
    quiz.select_category(Topic::Math).await.unwrap();
    quiz.select_option("Right 1").unwrap();

    let mut harness = setup_quiz_harness(quiz);
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("Correct!"), "missing feedback in {html}");
    assert!(html.contains("quiz-option--correct"), "missing tone in {html}");
    assert!(html.contains("Score: 1"), "missing score in {html}");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn finished_view_shows_score() {
    let quiz = controller();
    quiz.select_category(Topic::Science).await.unwrap();
    for n in 1..=5 {
        quiz.answer(&format!("Right {n}")).await.unwrap();
    }

    let mut harness = setup_quiz_harness(quiz);
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("5/5"), "missing score in {html}");
    assert!(html.contains("Science quiz complete"), "missing heading in {html}");
    assert!(html.contains("Try again"), "missing reset in {html}");
}

fn controller_with_delay(delay_ms: u64) -> Arc<QuizController> {
    Arc::new(
        QuizController::new(Arc::new(StaticQuestionSource::new(questions())))
            .with_feedback_delay(Duration::from_millis(delay_ms)),
    )
}

async fn drive_until(harness: &mut ViewHarness, needle: &str) -> String {
    for _ in 0..10 {
        harness.drive_async().await;
        let html = harness.render();
        if html.contains(needle) {
            return html;
        }
    }
    harness.render()
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn clicking_through_the_view_advances_after_feedback() {
    let quiz = controller_with_delay(20);
    let mut harness = setup_quiz_harness(Arc::clone(&quiz));
    harness.rebuild();

    let pick_topic = harness.handles.pick_topic();
    harness.fire(pick_topic, Topic::Math);
    let html = drive_until(&mut harness, "Question 1 of 5").await;
    assert!(html.contains("Capital number 1?"), "missing question in {html}");

    let pick_option = harness.handles.pick_option();
    harness.fire(pick_option, "Right 1".to_string());
    let html = harness.render();
    assert!(html.contains("Correct!"), "missing feedback in {html}");
    assert!(html.contains("Question 1 of 5"), "advanced too early in {html}");

    let html = drive_until(&mut harness, "Question 2 of 5").await;
    assert!(html.contains("Capital number 2?"), "missing next question in {html}");
    assert!(!html.contains("Correct!"), "stale feedback in {html}");
    assert!(html.contains("Score: 1"), "missing score in {html}");
    assert_eq!(quiz.snapshot().position, 1);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn quitting_during_feedback_drops_the_pending_advance() {
    let quiz = controller_with_delay(20);
    let mut harness = setup_quiz_harness(Arc::clone(&quiz));
    harness.rebuild();

    let pick_topic = harness.handles.pick_topic();
    harness.fire(pick_topic, Topic::Science);
    drive_until(&mut harness, "Question 1 of 5").await;

    let pick_option = harness.handles.pick_option();
    harness.fire(pick_option, "Wrong A1".to_string());
    let reset = harness.handles.reset();
    harness.fire(reset, ());

    for _ in 0..3 {
        harness.drive_async().await;
    }
    let html = harness.render();
    assert!(html.contains("Pick a topic"), "expected picker in {html}");
    assert!(!html.contains("Question 2 of 5"), "advance leaked in {html}");
    assert!(!quiz.snapshot().phase.is_active());
}
