use actix_web::{web, HttpResponse};

use crate::core::MatchError;
use crate::models::AnswerId;
use crate::routes::auth::CurrentUser;
use crate::routes::{ApiError, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/answers", web::get().to(own_answers))
        .route("/answers/{id}", web::get().to(get_answer));
}

/// All of the caller's answers, private ones included
async fn own_answers(state: web::Data<AppState>, user: CurrentUser) -> Result<HttpResponse, ApiError> {
    let profile = state.require_profile(&user).await?;
    let answers = state.postgres.list_answers_for_profile(profile.id, false).await?;
    Ok(HttpResponse::Ok().json(answers))
}

/// A single public answer. Private answers are reported as missing.
async fn get_answer(state: web::Data<AppState>, path: web::Path<AnswerId>) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let answer = state
        .postgres
        .get_answer(id)
        .await?
        .filter(|answer| answer.is_public)
        .ok_or_else(|| MatchError::not_found("answer", id))?;

    Ok(HttpResponse::Ok().json(answer))
}
