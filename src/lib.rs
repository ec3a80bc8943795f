//! match-questions - questionnaire based matchmaking service
//!
//! Profiles answer multiple choice questions, state which answers they would
//! accept from a match and how much the question matters to them. The core
//! module aggregates those answers into per-question statistics and compares
//! two profiles question by question.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{compare, question_stats, AnswerStore, MatchError, Snapshot};
pub use models::{Answer, ComparedQuestion, Gender, PossibleAnswer, Profile, Question, QuestionStats};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let snapshot = Snapshot::new();
        assert!(snapshot.questions().is_empty());
        assert!(matches!(question_stats(&snapshot, 1), Err(MatchError::NotFound { .. })));
    }
}
