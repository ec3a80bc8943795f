use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::core::{MatchError, Snapshot};
use crate::models::AnswerValue;

/// Errors that can occur while loading seed fixtures
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse fixture: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid fixture: {0}")]
    Invalid(#[from] MatchError),
}

/// Seed data: categories with their questions and possible answers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub categories: Vec<CategoryFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryFixture {
    pub title: String,
    #[serde(default)]
    pub questions: Vec<QuestionFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionFixture {
    pub question: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub answers: Vec<PossibleAnswerFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PossibleAnswerFixture {
    pub answer: String,
    #[serde(default)]
    pub value: AnswerValue,
}

impl Fixture {
    pub fn parse(text: &str) -> Result<Self, FixtureError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FixtureError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn question_count(&self) -> usize {
        self.categories.iter().map(|c| c.questions.len()).sum()
    }

    /// Build an in-memory store holding the fixture's rows
    pub fn to_snapshot(&self) -> Result<Snapshot, FixtureError> {
        let mut snapshot = Snapshot::new();
        for category in &self.categories {
            let category_id = snapshot.add_category(&category.title);
            for question in &category.questions {
                let question_id =
                    snapshot.add_question(&question.question, Some(category_id), None, question.active)?;
                for option in &question.answers {
                    snapshot.add_possible_answer(question_id, &option.answer, option.value)?;
                }
            }
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AnswerStore;

    const SAMPLE: &str = r#"
[[categories]]
title = "General"

  [[categories.questions]]
  question = "Hallo?"
  active = true

    [[categories.questions.answers]]
    answer = "Was!"
    value = 3

    [[categories.questions.answers]]
    answer = "Ich verstehe die Frage nicht."
"#;

    #[test]
    fn test_parse_fixture() {
        let fixture = Fixture::parse(SAMPLE).unwrap();
        assert_eq!(fixture.categories.len(), 1);
        assert_eq!(fixture.question_count(), 1);
        let answers = &fixture.categories[0].questions[0].answers;
        assert_eq!(answers[0].value, AnswerValue::Agree);
        assert_eq!(answers[1].value, AnswerValue::Neutral);
    }

    #[test]
    fn test_invalid_value_level_is_rejected() {
        let text = SAMPLE.replace("value = 3", "value = 9");
        assert!(matches!(Fixture::parse(&text), Err(FixtureError::Parse(_))));
    }

    #[test]
    fn test_fixture_to_snapshot() {
        let snapshot = Fixture::parse(SAMPLE).unwrap().to_snapshot().unwrap();
        let question = snapshot.questions()[0];
        assert_eq!(question.slug, "hallo");
        assert!(question.is_active);
        assert_eq!(snapshot.possible_answers(question.id).len(), 2);
    }
}
