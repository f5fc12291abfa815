use axum::{extract::State, Json};
use tracing::{info, instrument};

use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::learners::dto::{LearnerProfileResponse, UpdateLearnerProfileRequest};
use crate::learners::repo;
use crate::state::AppState;

#[instrument(skip(state, user))]
pub async fn get_learner_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<LearnerProfileResponse>, ApiError> {
    let profile = repo::get_or_create(&state.db, user.id).await?;
    let interests = repo::list_interests(&state.db, profile.id).await?;
    Ok(Json(LearnerProfileResponse::from_parts(profile, interests)))
}

#[instrument(skip(state, user, payload))]
pub async fn update_learner_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateLearnerProfileRequest>,
) -> Result<Json<LearnerProfileResponse>, ApiError> {
    let profile = repo::get_or_create(&state.db, user.id).await?;

    if let Some(interest_ids) = payload.interest_ids {
        if !repo::tags_exist(&state.db, &interest_ids).await? {
            return Err(ApiError::Validation(
                "One or more interest ids do not exist.".into(),
            ));
        }
        repo::set_interests(&state.db, profile.id, &interest_ids).await?;
        info!(user_id = %user.id, count = interest_ids.len(), "learner interests updated");
    }

    let profile = repo::get_or_create(&state.db, user.id).await?;
    let interests = repo::list_interests(&state.db, profile.id).await?;
    Ok(Json(LearnerProfileResponse::from_parts(profile, interests)))
}
