mod quiz_vm;

pub use quiz_vm::{
    FeedbackVm, OptionTone, OptionVm, QuestionVm, QuizScreenVm, TopicVm, map_quiz_screen,
};
