use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::Question;

/// Returns the question with its options in a uniformly random order.
///
/// Only the display order changes; the correct answer is tracked by value.
pub fn shuffle_options<R: Rng + ?Sized>(mut question: Question, rng: &mut R) -> Question {
    question.options_mut().shuffle(rng);
    question
}
