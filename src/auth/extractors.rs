use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use tracing::error;
use uuid::Uuid;

use crate::state::AppState;

/// Authenticated account resolved from an opaque bearer token.
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

pub(crate) fn parse_bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "missing Authorization header".to_string(),
            ))?;

        let token =
            parse_bearer(auth).ok_or((StatusCode::UNAUTHORIZED, "invalid auth scheme".to_string()))?;

        let row = sqlx::query_as::<_, (Uuid, String)>(
            r#"
            SELECT u.id, u.email
            FROM auth_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.key = $1 AND u.is_active
            "#,
        )
        .bind(token)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, "token lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        })?;

        let (id, email) = row.ok_or((StatusCode::UNAUTHORIZED, "invalid token".to_string()))?;
        Ok(AuthUser { id, email })
    }
}

#[cfg(test)]
mod tests {
    use super::parse_bearer;

    #[test]
    fn accepts_both_scheme_spellings() {
        assert_eq!(parse_bearer("Bearer abc123"), Some("abc123"));
        assert_eq!(parse_bearer("bearer abc123"), Some("abc123"));
    }

    #[test]
    fn rejects_other_schemes_and_empty_tokens() {
        assert_eq!(parse_bearer("Basic abc123"), None);
        assert_eq!(parse_bearer("Bearer "), None);
        assert_eq!(parse_bearer("abc123"), None);
    }
}
