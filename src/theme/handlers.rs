use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::theme::repo;

const THEME_VALUES: [&str; 2] = ["dark", "light"];

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub theme: String,
}

#[derive(Debug, Deserialize)]
pub struct SetThemeRequest {
    pub theme: String,
}

#[instrument(skip(state, user))]
pub async fn get_theme(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ThemeResponse>, ApiError> {
    let theme = repo::get_or_create(&state.db, user.id).await?;
    Ok(Json(ThemeResponse { theme }))
}

#[instrument(skip(state, user, payload))]
pub async fn set_theme(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SetThemeRequest>,
) -> Result<Json<ThemeResponse>, ApiError> {
    if !THEME_VALUES.contains(&payload.theme.as_str()) {
        return Err(ApiError::Validation(
            "Invalid theme value. Must be \"dark\" or \"light\".".into(),
        ));
    }

    repo::set(&state.db, user.id, &payload.theme).await?;
    info!(user_id = %user.id, theme = %payload.theme, "theme updated");
    Ok(Json(ThemeResponse {
        theme: payload.theme,
    }))
}

#[cfg(test)]
mod tests {
    use super::THEME_VALUES;

    #[test]
    fn only_dark_and_light_are_valid() {
        assert!(THEME_VALUES.contains(&"dark"));
        assert!(THEME_VALUES.contains(&"light"));
        assert!(!THEME_VALUES.contains(&"solarized"));
        assert!(!THEME_VALUES.contains(&"Dark"));
    }
}
