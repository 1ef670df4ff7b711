use std::sync::Arc;

use quiz_core::Topic;
use quiz_services::QuizController;

/// What the composition root must hand to the UI.
pub trait UiApp: Send + Sync {
    fn quiz(&self) -> Arc<QuizController>;

    /// Topics offered on the picker, in display order.
    fn topics(&self) -> Vec<Topic> {
        Topic::ALL.to_vec()
    }
}

#[derive(Clone)]
pub struct AppContext {
    quiz: Arc<QuizController>,
    topics: Vec<Topic>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            quiz: app.quiz(),
            topics: app.topics(),
        }
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizController> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
