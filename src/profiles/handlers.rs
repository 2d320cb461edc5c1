use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    profiles::{
        dto::{
            DeletedResponse, EducationRequest, ExperienceRequest, ProfileResponse,
            UpsertProfileRequest,
        },
        repo::{EducationEntry, ExperienceEntry, Profile, ProfileWithOwner},
        services,
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(list_profiles))
        .route("/profile/me", get(own_profile))
        .route("/profile/user/:user_id", get(profile_by_user))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", post(upsert_profile).delete(delete_account))
        .route("/profile/experience", put(add_experience))
        .route("/profile/experience/:exp_id", delete(remove_experience))
        .route("/profile/education", put(add_education))
        .route("/profile/education/:edu_id", delete(remove_education))
}

/// GET /profile/me: the caller's own profile, joined with name and avatar.
/// Answers 401 when no profile exists yet, distinguishing "none yet" from a
/// store failure.
#[instrument(skip(state))]
pub async fn own_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let row = ProfileWithOwner::find_by_user(&state.db, user_id)
        .await?
        .ok_or(ApiError::Unauthorized("Profile does not exist"))?;
    Ok(Json(row.into()))
}

/// POST /profile: create-or-update the caller's profile.
#[instrument(skip(state, payload))]
pub async fn upsert_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpsertProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let errors = services::validate_upsert(&payload);
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let fields = services::build_profile_fields(&payload);
    let profile = Profile::upsert(&state.db, user_id, &fields).await?;
    info!(user_id = %user_id, profile_id = %profile.id, "profile upserted");
    Ok(Json(profile))
}

/// GET /profile: every profile, public.
#[instrument(skip(state))]
pub async fn list_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfileResponse>>, ApiError> {
    let rows = ProfileWithOwner::list_all(&state.db).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// GET /profile/user/:user_id: public lookup. A malformed id answers the
/// same 404 as a missing profile, so callers cannot probe id formats.
#[instrument(skip(state))]
pub async fn profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user_id: Uuid = user_id
        .parse()
        .map_err(|_| ApiError::NotFound("Profile not found"))?;
    let row = ProfileWithOwner::find_by_user(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("Profile not found"))?;
    Ok(Json(row.into()))
}

/// DELETE /profile: remove the caller's posts, profile and account, in that
/// order, as one logical operation.
#[instrument(skip(state))]
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DeletedResponse>, ApiError> {
    services::delete_account(&state.db, user_id).await?;
    Ok(Json(DeletedResponse {
        msg: "Profile deleted",
    }))
}

/// PUT /profile/experience: prepend a new entry.
#[instrument(skip(state, payload))]
pub async fn add_experience(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ExperienceRequest>,
) -> Result<Json<Profile>, ApiError> {
    let errors = services::validate_experience(&payload);
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let profile = Profile::find_by_user(&state.db, user_id)
        .await?
        .ok_or(ApiError::BadRequest("Profile not found"))?;

    let entry = ExperienceEntry {
        id: Uuid::new_v4(),
        title: payload.title.unwrap_or_default(),
        company: payload.company.unwrap_or_default(),
        location: payload.location,
        from: payload.from.unwrap_or_default(),
        to: payload.to,
        current: payload.current,
        description: payload.description,
    };
    let entries = services::push_front(profile.experience.0, entry);

    let updated = Profile::set_experience(&state.db, user_id, &entries)
        .await?
        .ok_or(ApiError::BadRequest("Profile not found"))?;
    Ok(Json(updated))
}

/// DELETE /profile/experience/:exp_id: targeted removal; a non-matching id
/// (including a malformed one) still succeeds with the list unchanged.
#[instrument(skip(state))]
pub async fn remove_experience(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(exp_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let profile = Profile::find_by_user(&state.db, user_id)
        .await?
        .ok_or(ApiError::BadRequest("Profile not found"))?;

    let entries = match exp_id.parse::<Uuid>() {
        Ok(id) => services::drop_experience(profile.experience.0, id),
        Err(_) => profile.experience.0,
    };

    let updated = Profile::set_experience(&state.db, user_id, &entries)
        .await?
        .ok_or(ApiError::BadRequest("Profile not found"))?;
    Ok(Json(updated))
}

/// PUT /profile/education: prepend a new entry.
#[instrument(skip(state, payload))]
pub async fn add_education(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<EducationRequest>,
) -> Result<Json<Profile>, ApiError> {
    let errors = services::validate_education(&payload);
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let profile = Profile::find_by_user(&state.db, user_id)
        .await?
        .ok_or(ApiError::BadRequest("Profile not found"))?;

    let entry = EducationEntry {
        id: Uuid::new_v4(),
        school: payload.school.unwrap_or_default(),
        degree: payload.degree.unwrap_or_default(),
        fieldofstudy: payload.fieldofstudy.unwrap_or_default(),
        from: payload.from.unwrap_or_default(),
        to: payload.to,
        current: payload.current,
        description: payload.description,
    };
    let entries = services::push_front(profile.education.0, entry);

    let updated = Profile::set_education(&state.db, user_id, &entries)
        .await?
        .ok_or(ApiError::BadRequest("Profile not found"))?;
    Ok(Json(updated))
}

/// DELETE /profile/education/:edu_id: same removal semantics as experience.
#[instrument(skip(state))]
pub async fn remove_education(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(edu_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let profile = Profile::find_by_user(&state.db, user_id)
        .await?
        .ok_or(ApiError::BadRequest("Profile not found"))?;

    let entries = match edu_id.parse::<Uuid>() {
        Ok(id) => services::drop_education(profile.education.0, id),
        Err(_) => profile.education.0,
    };

    let updated = Profile::set_education(&state.db, user_id, &entries)
        .await?
        .ok_or(ApiError::BadRequest("Profile not found"))?;
    Ok(Json(updated))
}
