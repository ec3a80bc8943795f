// Model exports
pub mod domain;
pub mod requests;
pub mod responses;
pub mod stats;

pub use domain::{
    Answer, AnswerId, AnswerSubmission, AnswerValue, Category, CategoryId, Gender, Importance,
    LookFor, PossibleAnswer, PossibleAnswerId, Profile, ProfileId, Question, QuestionId,
};
pub use requests::{
    AcceptanceQuery, AnswerQuestionRequest, PageQuery, ProfileStatsQuery, SubmitQuestionRequest, UpdateProfileRequest,
};
pub use responses::{
    AcceptanceResponse, AnswerUpsertResponse, CategoryDetailResponse, CategoryResponse, CompareResponse,
    ErrorResponse, HealthResponse, HomeResponse, ProfileListResponse, ProfileResponse,
    ProfileStatsResponse,
    QuestionDetailResponse, QuestionSummary,
};
pub use stats::{ComparedQuestion, GenderSplit, OptionShare, QuestionStats};
