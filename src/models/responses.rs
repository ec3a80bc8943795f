use serde::{Deserialize, Serialize};
use crate::models::domain::{Answer, Category, CategoryId, PossibleAnswer, Profile, ProfileId, Question, QuestionId};
use crate::models::stats::{ComparedQuestion, GenderSplit, QuestionStats};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Landing page counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeResponse {
    #[serde(rename = "categoryCount")]
    pub category_count: i64,
    #[serde(rename = "questionCount")]
    pub question_count: i64,
    #[serde(rename = "profileCount")]
    pub profile_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub title: String,
    #[serde(rename = "questionCount")]
    pub question_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDetailResponse {
    pub category: Category,
    pub questions: Vec<Question>,
}

/// Question as exposed by the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub id: QuestionId,
    pub question: String,
    pub slug: String,
    pub category: Option<String>,
    #[serde(rename = "possibleAnswers")]
    pub possible_answers: Vec<String>,
    #[serde(rename = "maleAnswerCount")]
    pub male_answer_count: i64,
    #[serde(rename = "femaleAnswerCount")]
    pub female_answer_count: i64,
    #[serde(rename = "allAnswerCount")]
    pub all_answer_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDetailResponse {
    pub question: Question,
    #[serde(rename = "possibleAnswers")]
    pub possible_answers: Vec<PossibleAnswer>,
    pub stats: QuestionStats,
    /// Share of answers agreeing with the viewer's, when the viewer answered
    #[serde(rename = "agreementRate", skip_serializing_if = "Option::is_none", default)]
    pub agreement_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerUpsertResponse {
    pub answer: Answer,
    pub created: bool,
}

/// A profile with its current age
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: Profile,
    pub age: Option<u32>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            age: profile.age(),
            profile,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileListResponse {
    pub profiles: Vec<ProfileResponse>,
    pub page: u32,
    #[serde(rename = "hasNext")]
    pub has_next: bool,
}

/// `split` is null when there are no profiles at all
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileStatsResponse {
    pub total: usize,
    pub split: Option<GenderSplit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptanceResponse {
    #[serde(rename = "questionId")]
    pub question_id: QuestionId,
    #[serde(rename = "profileId")]
    pub profile_id: ProfileId,
    pub quote: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    pub profile: ProfileId,
    pub other: ProfileId,
    pub questions: Vec<ComparedQuestion>,
    pub agreed: usize,
    #[serde(rename = "mutuallyAcceptable")]
    pub mutually_acceptable: usize,
}
