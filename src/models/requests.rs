use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{CategoryId, Gender, Importance, LookFor, PossibleAnswerId};

/// Request to submit a new question
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitQuestionRequest {
    #[validate(length(min = 1, max = 2000))]
    pub question: String,
    #[serde(alias = "category_id", rename = "categoryId", default)]
    pub category_id: Option<CategoryId>,
}

/// Request to answer (or re-answer) a question
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnswerQuestionRequest {
    #[serde(alias = "user_answer", rename = "userAnswer")]
    pub user_answer: PossibleAnswerId,
    #[serde(alias = "acceptable_answers", rename = "acceptableAnswers", default)]
    pub acceptable_answers: Vec<PossibleAnswerId>,
    #[serde(default)]
    pub importance: Importance,
    #[serde(alias = "is_public", rename = "isPublic", default = "default_true")]
    pub is_public: bool,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Request to edit the caller's own profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub lookfor: LookFor,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(alias = "is_public", rename = "isPublic", default)]
    pub is_public: bool,
}

/// `?page=N`, 1-based
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

/// `?bornAfter=YYYY-MM-DD&bornBefore=YYYY-MM-DD`, both optional and exclusive
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileStatsQuery {
    #[serde(rename = "bornAfter", default)]
    pub born_after: Option<NaiveDate>,
    #[serde(rename = "bornBefore", default)]
    pub born_before: Option<NaiveDate>,
}

/// `?gender=M|F`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptanceQuery {
    pub gender: Gender,
}
