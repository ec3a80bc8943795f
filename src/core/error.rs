use thiserror::Error;

use crate::models::{PossibleAnswerId, ProfileId, QuestionId};

/// Errors raised by the aggregation, comparison and upsert logic
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("profile set is empty, fractions are undefined")]
    EmptyProfileSet,

    #[error("profile {profile_id} already has an answer for question {question_id}")]
    DuplicateAnswer {
        question_id: QuestionId,
        profile_id: ProfileId,
    },

    #[error("possible answer {possible_answer_id} does not belong to question {question_id}")]
    InvalidChoice {
        question_id: QuestionId,
        possible_answer_id: PossibleAnswerId,
    },

    #[error("{kind} level {level} is outside the five point scale")]
    InvalidLevel { kind: &'static str, level: i16 },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl MatchError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        MatchError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
