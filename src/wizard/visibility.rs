//! Visibility resolution for conditional questions

use crate::core::answers::AnswerMap;
use crate::core::question::Question;

/// Whether a question is shown for the given answers
///
/// Conditional questions are shown only when the answer they depend on is
/// stored as text and, once trimmed, equals the required value exactly.
/// Validation and payload mapping read select answers the same way.
pub fn is_visible(question: &Question, answers: &AnswerMap) -> bool {
    match &question.condition {
        None => true,
        Some(cond) => answers.non_blank(&cond.depends_on) == Some(cond.equals.as_str()),
    }
}

/// Positions (in static order) of the questions shown for the given answers
pub fn visible_indices(questions: &[Question], answers: &AnswerMap) -> Vec<usize> {
    questions
        .iter()
        .enumerate()
        .filter(|(_, q)| is_visible(q, answers))
        .map(|(idx, _)| idx)
        .collect()
}

/// The ordered subset of questions shown for the given answers
pub fn resolve<'a>(questions: &'a [Question], answers: &AnswerMap) -> Vec<&'a Question> {
    questions.iter().filter(|q| is_visible(q, answers)).collect()
}
