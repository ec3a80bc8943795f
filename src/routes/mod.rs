// Route exports
pub mod answers;
pub mod auth;
pub mod catalog;
pub mod profiles;
pub mod questions;

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use std::sync::Arc;
use thiserror::Error;

use crate::config::PaginationSettings;
use crate::core::MatchError;
use crate::models::{ErrorResponse, Profile};
use crate::services::{CacheManager, PostgresClient, PostgresError};
use auth::{CurrentUser, JwtKeys};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub cache: Arc<CacheManager>,
    pub auth: Arc<JwtKeys>,
    pub pagination: PaginationSettings,
}

impl AppState {
    /// The caller's profile, or 403 when they have not created one yet
    pub async fn require_profile(&self, user: &CurrentUser) -> Result<Profile, ApiError> {
        self.postgres
            .get_profile_by_user(user.user_id)
            .await?
            .ok_or(ApiError::ProfileRequired)
    }
}

/// Errors surfaced by handlers, rendered as `ErrorResponse` JSON
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("create a profile before using this endpoint")]
    ProfileRequired,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Database(PostgresError),
}

impl From<PostgresError> for ApiError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::Domain(e) => ApiError::Match(e),
            other => ApiError::Database(other),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::ProfileRequired => "profile_required",
            ApiError::Validation(_) => "validation_failed",
            ApiError::Match(MatchError::NotFound { .. }) => "not_found",
            ApiError::Match(MatchError::EmptyProfileSet) => "empty_profile_set",
            ApiError::Match(MatchError::DuplicateAnswer { .. }) => "duplicate_answer",
            ApiError::Match(MatchError::InvalidChoice { .. }) => "invalid_choice",
            ApiError::Match(MatchError::InvalidLevel { .. }) => "invalid_level",
            ApiError::Match(MatchError::InvalidInput(_)) => "invalid_input",
            ApiError::Database(_) => "database_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::ProfileRequired => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Match(MatchError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Match(MatchError::DuplicateAnswer { .. }) => StatusCode::CONFLICT,
            ApiError::Match(MatchError::EmptyProfileSet) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Match(_) => StatusCode::BAD_REQUEST,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status.as_u16(), self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(catalog::configure)
            .configure(questions::configure)
            .configure(answers::configure)
            .configure(profiles::configure),
    );
}
