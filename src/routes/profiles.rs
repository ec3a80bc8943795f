use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::core::{self, MatchError};
use crate::models::{
    CompareResponse, PageQuery, ProfileId, ProfileListResponse, ProfileResponse, ProfileStatsQuery,
    ProfileStatsResponse, UpdateProfileRequest,
};
use crate::routes::auth::CurrentUser;
use crate::routes::{ApiError, AppState};

/// Configure profile and comparison routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profile", web::get().to(own_profile))
        .route("/profile", web::put().to(update_profile))
        .route("/profiles", web::get().to(list_profiles))
        .route("/profiles/stats", web::get().to(profile_stats))
        .route("/profiles/{id}", web::get().to(get_profile))
        .route("/compare/{other_id}", web::get().to(compare));
}

/// The caller's profile, created empty on first access
async fn own_profile(state: web::Data<AppState>, user: CurrentUser) -> Result<HttpResponse, ApiError> {
    let (profile, created) = state.postgres.get_or_create_profile(user.user_id).await?;
    if created {
        tracing::info!("Created profile {} for user {}", profile.id, user.user_id);
    }
    Ok(HttpResponse::Ok().json(ProfileResponse::from(profile)))
}

async fn update_profile(
    state: web::Data<AppState>,
    user: CurrentUser,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;
    let profile = state.postgres.update_profile(user.user_id, &req).await?;
    Ok(HttpResponse::Ok().json(ProfileResponse::from(profile)))
}

/// Public profiles, paginated
///
/// GET /api/v1/profiles?page=N
async fn list_profiles(
    state: web::Data<AppState>,
    _user: CurrentUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, ApiError> {
    if query.page == 0 {
        return Err(ApiError::Validation("page numbers start at 1".to_string()));
    }

    let per_page = i64::from(state.pagination.profiles_per_page.max(1));
    let offset = i64::from(query.page - 1) * per_page;

    // One extra row tells whether another page follows
    let mut profiles = state.postgres.list_public_profiles(per_page + 1, offset).await?;
    let has_next = (profiles.len() as i64) > per_page;
    profiles.truncate(per_page as usize);

    Ok(HttpResponse::Ok().json(ProfileListResponse {
        profiles: profiles.into_iter().map(ProfileResponse::from).collect(),
        page: query.page,
        has_next,
    }))
}

/// Gender split over all profiles, optionally narrowed to a birth date range
///
/// GET /api/v1/profiles/stats?bornAfter=1980-01-01&bornBefore=2000-01-01
///
/// `split` is null when no profile is left.
async fn profile_stats(
    state: web::Data<AppState>,
    query: web::Query<ProfileStatsQuery>,
) -> Result<HttpResponse, ApiError> {
    let all = state.postgres.list_profiles().await?;
    let profiles = if query.born_after.is_some() || query.born_before.is_some() {
        core::born_between(&all, query.born_after, query.born_before)
    } else {
        all.iter().collect()
    };

    let split = match core::gender_split(profiles.iter().copied()) {
        Ok(split) => Some(split),
        Err(MatchError::EmptyProfileSet) => None,
        Err(e) => return Err(e.into()),
    };

    Ok(HttpResponse::Ok().json(ProfileStatsResponse {
        total: profiles.len(),
        split,
    }))
}

/// A public profile, or the caller's own
async fn get_profile(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<ProfileId>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let profile = state
        .postgres
        .get_profile(id)
        .await?
        .filter(|p| p.is_public || p.user_id == user.user_id)
        .ok_or_else(|| MatchError::not_found("profile", id))?;

    Ok(HttpResponse::Ok().json(ProfileResponse::from(profile)))
}

/// Compare the caller's answers against another profile's
///
/// GET /api/v1/compare/{other_id}
async fn compare(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<ProfileId>,
) -> Result<HttpResponse, ApiError> {
    let other_id = path.into_inner();
    let profile = state.require_profile(&user).await?;

    let snapshot = state.postgres.compare_snapshot(&profile, other_id).await?;
    let questions = core::compare(&snapshot, profile.id, other_id)?;

    let agreed = questions.iter().filter(|q| q.agrees).count();
    let mutually_acceptable = questions.iter().filter(|q| q.mutually_acceptable).count();

    tracing::debug!(
        "Compared profile {} with {}: {} questions, {} agreed",
        profile.id,
        other_id,
        questions.len(),
        agreed
    );

    Ok(HttpResponse::Ok().json(CompareResponse {
        profile: profile.id,
        other: other_id,
        questions,
        agreed,
        mutually_acceptable,
    }))
}
