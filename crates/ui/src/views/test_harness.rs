use std::sync::Arc;
use std::time::Duration;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use quiz_services::QuizController;

use crate::context::{UiApp, build_app_context};
use crate::views::{QuizTestHandles, QuizView};

struct TestApp {
    quiz: Arc<QuizController>,
}

impl UiApp for TestApp {
    fn quiz(&self) -> Arc<QuizController> {
        Arc::clone(&self.quiz)
    }
}

#[derive(Props, Clone)]
struct QuizHarnessProps {
    app: Arc<TestApp>,
    handles: QuizTestHandles,
}

impl PartialEq for QuizHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn QuizHarness(props: QuizHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { QuizView {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub handles: QuizTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    /// Fire a view callback inside the dom's runtime, then flush renders.
    pub fn fire<T: 'static>(&mut self, callback: Callback<T>, value: T) {
        self.dom.in_runtime(|| callback.call(value));
        drive_dom(&mut self.dom);
    }

    /// Let spawned tasks (fetch, feedback delay) run, then flush renders.
    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(Duration::from_millis(50), self.dom.wait_for_work()).await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Mount `QuizView` over a controller prepared by the test.
pub fn setup_quiz_harness(quiz: Arc<QuizController>) -> ViewHarness {
    let handles = QuizTestHandles::default();
    let dom = VirtualDom::new_with_props(
        QuizHarness,
        QuizHarnessProps {
            app: Arc::new(TestApp { quiz }),
            handles: handles.clone(),
        },
    );
    ViewHarness { dom, handles }
}
