use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, instrument};

use crate::auth::extractors::AuthUser;
use crate::auth::Role;
use crate::content::dto::{CreateLanguageRequest, CreateSubjectTagRequest};
use crate::content::repo::{self, Language, SubjectTag, TimezoneEntry};
use crate::error::ApiError;
use crate::state::AppState;

/// Reference data is world-readable; only admins may extend it.
async fn require_admin(state: &AppState, user: &AuthUser) -> Result<(), ApiError> {
    let role = crate::auth::repo::find_role(&state.db, user.id)
        .await?
        .as_deref()
        .and_then(Role::parse);
    if role == Some(Role::Admin) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

#[instrument(skip(state))]
pub async fn list_subject_tags(
    State(state): State<AppState>,
) -> Result<Json<Vec<SubjectTag>>, ApiError> {
    Ok(Json(repo::list_subject_tags(&state.db).await?))
}

#[instrument(skip(state, user, payload))]
pub async fn create_subject_tag(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateSubjectTagRequest>,
) -> Result<(StatusCode, Json<SubjectTag>), ApiError> {
    require_admin(&state, &user).await?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("This field may not be blank.".into()));
    }

    let tag = repo::create_subject_tag(&state.db, name).await?;
    info!(tag = %tag.slug, "subject tag created");
    Ok((StatusCode::CREATED, Json(tag)))
}

#[instrument(skip(state))]
pub async fn list_languages(State(state): State<AppState>) -> Result<Json<Vec<Language>>, ApiError> {
    Ok(Json(repo::list_languages(&state.db).await?))
}

#[instrument(skip(state, user, payload))]
pub async fn create_language(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateLanguageRequest>,
) -> Result<(StatusCode, Json<Language>), ApiError> {
    require_admin(&state, &user).await?;

    let name = payload.language_name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("This field may not be blank.".into()));
    }

    let language =
        repo::create_language(&state.db, name, payload.language_name_in_native.as_deref()).await?;
    info!(language = %language.language_name, "language created");
    Ok((StatusCode::CREATED, Json(language)))
}

#[instrument(skip(state))]
pub async fn list_timezones(
    State(state): State<AppState>,
) -> Result<Json<Vec<TimezoneEntry>>, ApiError> {
    Ok(Json(repo::list_timezones(&state.db).await?))
}
