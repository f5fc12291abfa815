use axum::{extract::State, Json};
use tracing::{info, instrument};

use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::instructors::dto::UpdateInstructorProfileRequest;
use crate::instructors::repo::{self, InstructorProfile};
use crate::state::AppState;

#[instrument(skip(state, user))]
pub async fn get_instructor_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<InstructorProfile>, ApiError> {
    let profile = repo::get_or_create(&state.db, user.id).await?;
    Ok(Json(profile))
}

#[instrument(skip(state, user, payload))]
pub async fn update_instructor_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateInstructorProfileRequest>,
) -> Result<Json<InstructorProfile>, ApiError> {
    repo::get_or_create(&state.db, user.id).await?;

    let teaching_languages = payload.teaching_languages.map(serde_json::Value::from);

    let profile = repo::update_partial(
        &state.db,
        user.id,
        payload.designation.as_deref(),
        payload.short_bio.as_deref(),
        payload.full_bio.as_deref(),
        teaching_languages.as_ref(),
        payload.organization.as_deref(),
        payload.years_of_experience,
    )
    .await?;

    info!(user_id = %user.id, "instructor profile updated");
    Ok(Json(profile))
}
