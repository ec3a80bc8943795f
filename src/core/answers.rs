use chrono::{DateTime, Utc};

use crate::core::error::MatchError;
use crate::core::store::AnswerStore;
use crate::models::{Answer, AnswerSubmission, PossibleAnswer, PossibleAnswerId, ProfileId, Question, QuestionId};

/// Check that every referenced option belongs to the submitted question
pub fn validate_submission(
    possible_answers: &[PossibleAnswer],
    submission: &AnswerSubmission,
) -> Result<(), MatchError> {
    let belongs = |id: PossibleAnswerId| {
        possible_answers
            .iter()
            .any(|pa| pa.id == id && pa.question_id == submission.question_id)
    };

    let referenced = std::iter::once(submission.user_answer)
        .chain(submission.acceptable_answers.iter().copied());
    for id in referenced {
        if !belongs(id) {
            return Err(MatchError::InvalidChoice {
                question_id: submission.question_id,
                possible_answer_id: id,
            });
        }
    }
    Ok(())
}

pub fn has_answer<S: AnswerStore>(store: &S, question_id: QuestionId, profile_id: ProfileId) -> bool {
    store.get_answer(question_id, profile_id).is_some()
}

/// Time of the most recent answer to a question
pub fn last_answer<S: AnswerStore>(store: &S, question_id: QuestionId) -> Option<DateTime<Utc>> {
    store
        .list_answers(question_id)
        .into_iter()
        .map(|a| a.when)
        .max()
}

/// Questions the profile has answered
pub fn answered<S: AnswerStore>(store: &S, profile_id: ProfileId) -> Vec<&Question> {
    store
        .list_answers_by_profile(profile_id)
        .into_iter()
        .filter_map(|a| store.question(a.question_id))
        .collect()
}

/// Questions the profile has not answered yet
pub fn unanswered<S: AnswerStore>(store: &S, profile_id: ProfileId) -> Vec<&Question> {
    store
        .questions()
        .into_iter()
        .filter(|q| store.get_answer(q.id, profile_id).is_none())
        .collect()
}

pub fn public_answers<'a>(answers: impl IntoIterator<Item = &'a Answer>) -> Vec<&'a Answer> {
    answers.into_iter().filter(|a| a.is_public).collect()
}

/// Fraction of the question's answers that chose the same option as the profile
///
/// The profile's own answer is part of the denominator, so the result is
/// never zero once the profile has answered.
pub fn agreement_rate<S: AnswerStore>(
    store: &S,
    question_id: QuestionId,
    profile_id: ProfileId,
) -> Result<f64, MatchError> {
    store.require_question(question_id)?;
    let own = store
        .get_answer(question_id, profile_id)
        .ok_or_else(|| MatchError::not_found("answer", format!("{}/{}", question_id, profile_id)))?;

    let answers = store.list_answers(question_id);
    let agreeing = answers
        .iter()
        .filter(|a| a.user_answer == own.user_answer)
        .count();
    Ok(agreeing as f64 / answers.len() as f64)
}
