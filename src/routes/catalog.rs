use actix_web::{web, HttpResponse, Responder};

use crate::core::MatchError;
use crate::models::{CategoryDetailResponse, CategoryResponse, HealthResponse, HomeResponse};
use crate::routes::{ApiError, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/home", web::get().to(home))
        .route("/categories", web::get().to(list_categories))
        .route("/categories/{id}", web::get().to(get_category));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Landing page counters
///
/// GET /api/v1/home
async fn home(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let (category_count, question_count, profile_count) = state.postgres.counts().await?;

    Ok(HttpResponse::Ok().json(HomeResponse {
        category_count,
        question_count,
        profile_count,
    }))
}

async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let categories: Vec<CategoryResponse> = state
        .postgres
        .list_categories()
        .await?
        .into_iter()
        .map(|(category, question_count)| CategoryResponse {
            id: category.id,
            title: category.title,
            question_count,
        })
        .collect();

    Ok(HttpResponse::Ok().json(categories))
}

/// Category with its questions
///
/// GET /api/v1/categories/{id}
async fn get_category(state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let category = state
        .postgres
        .get_category(id)
        .await?
        .ok_or_else(|| MatchError::not_found("category", id))?;
    let questions = state.postgres.list_questions_in_category(id).await?;

    Ok(HttpResponse::Ok().json(CategoryDetailResponse { category, questions }))
}
