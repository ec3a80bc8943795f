use actix_web::{web, HttpResponse};
use std::collections::HashMap;
use validator::Validate;

use crate::core::{self, MatchError};
use crate::models::{
    AcceptanceQuery, AcceptanceResponse, AnswerQuestionRequest, AnswerSubmission, AnswerUpsertResponse,
    QuestionDetailResponse, QuestionId, QuestionStats, QuestionSummary, SubmitQuestionRequest,
};
use crate::routes::auth::CurrentUser;
use crate::routes::{ApiError, AppState};
use crate::services::CacheKey;

/// Configure question routes
///
/// `/questions/unanswered` is registered ahead of `/questions/{id}` so the
/// literal segment wins.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/questions", web::get().to(list_questions))
        .route("/questions", web::post().to(submit_question))
        .route("/questions/unanswered", web::get().to(unanswered_questions))
        .route("/questions/{id}", web::get().to(get_question))
        .route("/questions/{id}/answer", web::put().to(answer_question))
        .route("/questions/{id}/acceptance", web::get().to(acceptance));
}

/// Question listing with possible answers and per-gender answer counts
///
/// GET /api/v1/questions
async fn list_questions(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let questions = state.postgres.list_questions().await?;
    let ids: Vec<QuestionId> = questions.iter().map(|q| q.id).collect();

    let mut options: HashMap<QuestionId, Vec<String>> = HashMap::new();
    for option in state.postgres.list_possible_answers(&ids).await? {
        options.entry(option.question_id).or_default().push(option.answer);
    }
    let categories: HashMap<i64, String> = state
        .postgres
        .list_categories()
        .await?
        .into_iter()
        .map(|(category, _)| (category.id, category.title))
        .collect();
    let counts = state.postgres.answer_counts().await?;

    let summaries: Vec<QuestionSummary> = questions
        .into_iter()
        .map(|question| {
            let count = counts.get(&question.id).copied().unwrap_or_default();
            QuestionSummary {
                category: question.category_id.and_then(|id| categories.get(&id).cloned()),
                possible_answers: options.remove(&question.id).unwrap_or_default(),
                male_answer_count: count.male,
                female_answer_count: count.female,
                all_answer_count: count.all,
                id: question.id,
                question: question.question,
                slug: question.slug,
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(summaries))
}

/// Question detail with statistics
///
/// GET /api/v1/questions/{id}
///
/// An authenticated caller who answered the question also gets the share
/// of answers agreeing with theirs.
async fn get_question(
    state: web::Data<AppState>,
    user: Option<CurrentUser>,
    path: web::Path<QuestionId>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let question = state
        .postgres
        .get_question(id)
        .await?
        .ok_or_else(|| MatchError::not_found("question", id))?;
    let possible_answers = state.postgres.list_possible_answers(&[id]).await?;
    let stats = cached_stats(&state, id).await?;

    let viewer = match &user {
        Some(user) => state.postgres.get_profile_by_user(user.user_id).await?,
        None => None,
    };
    let agreement_rate = match viewer {
        Some(profile) => {
            let snapshot = state.postgres.question_snapshot(id, Some(&profile)).await?;
            if core::has_answer(&snapshot, id, profile.id) {
                Some(core::agreement_rate(&snapshot, id, profile.id)?)
            } else {
                None
            }
        }
        None => None,
    };

    Ok(HttpResponse::Ok().json(QuestionDetailResponse {
        question,
        possible_answers,
        stats,
        agreement_rate,
    }))
}

/// Statistics of a question, served from the cache when present
///
/// Entries are keyed by the question's generation, read before computing,
/// so a result computed from data older than the last answer is stored
/// under a generation nobody reads any more. Cache failures only cost a
/// recomputation.
async fn cached_stats(state: &AppState, id: QuestionId) -> Result<QuestionStats, ApiError> {
    let key = match state.cache.generation(id).await {
        Ok(generation) => Some(CacheKey::question_stats(id, generation)),
        Err(e) => {
            tracing::warn!("Failed to read stats generation of question {}: {}", id, e);
            None
        }
    };

    if let Some(key) = &key {
        match state.cache.get::<QuestionStats>(key).await {
            Ok(Some(stats)) => return Ok(stats),
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to read cached stats for question {}: {}", id, e),
        }
    }

    let snapshot = state.postgres.question_snapshot(id, None).await?;
    let stats = core::question_stats(&snapshot, id)?;
    if let Some(key) = &key {
        if let Err(e) = state.cache.set(key, &stats).await {
            tracing::warn!("Failed to cache stats for question {}: {}", id, e);
        }
    }
    Ok(stats)
}

/// Active questions the caller has not answered yet
///
/// GET /api/v1/questions/unanswered
async fn unanswered_questions(state: web::Data<AppState>, user: CurrentUser) -> Result<HttpResponse, ApiError> {
    let profile = state.require_profile(&user).await?;
    let snapshot = state.postgres.profile_snapshot(&profile).await?;

    let questions: Vec<_> = core::unanswered(&snapshot, profile.id).into_iter().cloned().collect();
    tracing::debug!("Profile {} has {} unanswered questions", profile.id, questions.len());

    Ok(HttpResponse::Ok().json(questions))
}

/// Submit a new question for review
///
/// POST /api/v1/questions
///
/// Submitted questions start inactive.
async fn submit_question(
    state: web::Data<AppState>,
    user: CurrentUser,
    req: web::Json<SubmitQuestionRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let submitted_by = state.postgres.get_profile_by_user(user.user_id).await?.map(|p| p.id);
    let question = state
        .postgres
        .insert_question(&req.question, req.category_id, submitted_by, false)
        .await?;

    tracing::info!("User {} submitted question {}", user.user_id, question.id);
    Ok(HttpResponse::Created().json(question))
}

/// Answer (or re-answer) a question
///
/// PUT /api/v1/questions/{id}/answer
///
/// Request body:
/// ```json
/// {
///   "userAnswer": 12,
///   "acceptableAnswers": [12, 13],
///   "importance": 4,
///   "isPublic": true,
///   "description": "optional"
/// }
/// ```
async fn answer_question(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<QuestionId>,
    req: web::Json<AnswerQuestionRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;
    let question_id = path.into_inner();
    let profile = state.require_profile(&user).await?;

    let req = req.into_inner();
    let submission = AnswerSubmission {
        question_id,
        profile_id: profile.id,
        user_answer: req.user_answer,
        acceptable_answers: req.acceptable_answers.into_iter().collect(),
        importance: req.importance,
        is_public: req.is_public,
        description: req.description.filter(|d| !d.trim().is_empty()),
    };

    let (answer, created) = state.postgres.upsert_answer(&submission).await?;

    if let Err(e) = state.cache.bump_generation(question_id).await {
        tracing::warn!("Failed to invalidate stats for question {}: {}", question_id, e);
    }

    tracing::info!(
        "Profile {} answered question {} (created: {})",
        profile.id,
        question_id,
        created
    );

    let response = AnswerUpsertResponse { answer, created };
    if created {
        Ok(HttpResponse::Created().json(response))
    } else {
        Ok(HttpResponse::Ok().json(response))
    }
}

/// Share of `gender` answerers who would accept the caller's answer
///
/// GET /api/v1/questions/{id}/acceptance?gender=M|F
async fn acceptance(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<QuestionId>,
    query: web::Query<AcceptanceQuery>,
) -> Result<HttpResponse, ApiError> {
    let question_id = path.into_inner();
    let profile = state.require_profile(&user).await?;

    let snapshot = state.postgres.question_snapshot(question_id, Some(&profile)).await?;
    let quote = core::acceptance_quote(&snapshot, question_id, profile.id, query.gender)?;

    Ok(HttpResponse::Ok().json(AcceptanceResponse {
        question_id,
        profile_id: profile.id,
        quote,
    }))
}
