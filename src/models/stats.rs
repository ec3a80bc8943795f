use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{Answer, PossibleAnswerId, Question, QuestionId};

/// Share of answers for a single possible answer, truncated to whole percent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionShare {
    #[serde(rename = "possibleAnswerId")]
    pub possible_answer_id: PossibleAnswerId,
    pub answer: String,
    pub percent: u32,
}

/// Gender breakdown over a set of profiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenderSplit {
    #[serde(rename = "femaleCount")]
    pub female_count: usize,
    #[serde(rename = "maleCount")]
    pub male_count: usize,
    #[serde(rename = "femaleFraction")]
    pub female_fraction: f64,
    #[serde(rename = "maleFraction")]
    pub male_fraction: f64,
}

/// Descriptive statistics for one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionStats {
    #[serde(rename = "questionId")]
    pub question_id: QuestionId,
    #[serde(rename = "possibleAnswerCount")]
    pub possible_answer_count: usize,
    #[serde(rename = "allAnswerCount")]
    pub all_answer_count: usize,
    #[serde(rename = "maleAnswerCount")]
    pub male_answer_count: usize,
    #[serde(rename = "femaleAnswerCount")]
    pub female_answer_count: usize,
    #[serde(rename = "maleQuote")]
    pub male_quote: f64,
    #[serde(rename = "femaleQuote")]
    pub female_quote: f64,
    #[serde(rename = "lastAnswer")]
    pub last_answer: Option<DateTime<Utc>>,
    #[serde(rename = "answerDistribution")]
    pub answer_distribution: Vec<OptionShare>,
    #[serde(rename = "acceptableDistribution")]
    pub acceptable_distribution: Vec<OptionShare>,
}

/// One row of a profile comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparedQuestion {
    pub question: Question,
    /// Absent when the viewing profile never answered the question
    #[serde(rename = "ownAnswer")]
    pub own_answer: Option<Answer>,
    #[serde(rename = "otherAnswer")]
    pub other_answer: Answer,
    pub agrees: bool,
    #[serde(rename = "mutuallyAcceptable")]
    pub mutually_acceptable: bool,
}
