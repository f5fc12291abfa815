use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{
            ForgotPasswordRequest, LoginRequest, MessageResponse, ProfileResponse,
            RegisterRequest, RegisterResponse, ResendOtpRequest, ResetPasswordRequest,
            UpdateProfileRequest, VerifyOtpRequest, VerifyOtpResponse, VerifyResetOtpRequest,
            LoginResponse,
        },
        extractors::AuthUser,
        repo,
        repo_types::{CommonProfile, PendingRegistration, Role, User},
        services::{
            generate_otp, generate_token_key, generate_username, hash_password, is_valid_email,
            otp_expired, validate_password, verify_password, within_resend_cooldown,
        },
    },
    error::ApiError,
    mail::{build_otp_email, MailKind},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/resend-otp", post(resend_otp))
        .route("/auth/login", post(login))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/verify-reset-otp", post(verify_reset_otp))
        .route("/auth/reset-password", post(reset_password))
        .route(
            "/auth/resend-forgot-password-otp",
            post(resend_forgot_password_otp),
        )
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/auth/profile", get(get_profile).patch(update_profile))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let email = normalize_email(&payload.email);

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.password != payload.password_confirm {
        return Err(ApiError::Validation("Password fields didn't match.".into()));
    }
    validate_password(&payload.password).map_err(ApiError::Validation)?;

    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::DuplicateEmail);
    }

    let hash = hash_password(&payload.password)?;
    let otp = generate_otp();
    let now = OffsetDateTime::now_utc();

    // Persisted before the send attempt; a delivery failure leaves a valid
    // pending code recoverable via resend.
    PendingRegistration::upsert(&state.db, &email, &hash, payload.user_type, &otp, now).await?;

    let mail = build_otp_email(MailKind::Verify, &otp, false);
    state
        .mailer
        .send(&email, &mail)
        .await
        .map_err(ApiError::DeliveryFailure)?;

    info!(email = %email, role = payload.user_type.as_str(), "registration pending, OTP sent");
    Ok(Json(RegisterResponse {
        message: "OTP sent to your email. Please verify.",
        email,
    }))
}

#[instrument(skip(state, payload))]
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<(StatusCode, Json<VerifyOtpResponse>), ApiError> {
    let email = normalize_email(&payload.email);

    let pending = PendingRegistration::find_by_email(&state.db, &email)
        .await?
        .ok_or(ApiError::NotFound("Invalid email or OTP expired"))?;

    if pending.otp != payload.otp {
        warn!(email = %email, "OTP mismatch");
        return Err(ApiError::InvalidCode);
    }
    if otp_expired(pending.otp_created_at, OffsetDateTime::now_utc()) {
        return Err(ApiError::Expired);
    }

    let role = Role::parse(&pending.role).ok_or_else(|| {
        error!(email = %email, role = %pending.role, "pending registration carries unknown role");
        anyhow::anyhow!("unknown role in pending registration")
    })?;

    let user = repo::promote(&state.db, &pending, role, &generate_username()).await?;

    info!(user_id = %user.id, email = %user.email, role = role.as_str(), "account promoted");
    Ok((
        StatusCode::CREATED,
        Json(VerifyOtpResponse {
            user_id: user.id,
            email: user.email,
            role,
            message: "Email verified and account created successfully",
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn resend_otp(
    State(state): State<AppState>,
    Json(payload): Json<ResendOtpRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = normalize_email(&payload.email);

    let pending = PendingRegistration::find_by_email(&state.db, &email)
        .await?
        .ok_or(ApiError::NotFound("Registration request not found"))?;

    let now = OffsetDateTime::now_utc();
    if within_resend_cooldown(pending.otp_created_at, now) {
        warn!(email = %email, "resend inside cooldown");
        return Err(ApiError::RateLimited);
    }

    let otp = generate_otp();
    PendingRegistration::refresh_otp(&state.db, &pending.email, &otp, now).await?;

    let mail = build_otp_email(MailKind::Verify, &otp, true);
    state
        .mailer
        .send(&email, &mail)
        .await
        .map_err(ApiError::DeliveryFailure)?;

    info!(email = %email, "registration OTP resent");
    Ok(Json(MessageResponse {
        message: "OTP resent successfully",
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = normalize_email(&payload.email);

    if !is_valid_email(&email) {
        return Err(ApiError::Validation("Invalid email".into()));
    }

    // Unknown email and wrong password are indistinguishable to the caller.
    let user = User::find_by_email(&state.db, &email)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| {
            warn!(email = %email, "login unknown or inactive account");
            ApiError::InvalidCredentials
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = repo::get_or_create_token(&state.db, user.id, &generate_token_key()).await?;

    // Promotion writes the role in the same transaction as the account, so
    // a missing row here is corrupted data.
    let role = repo::find_role(&state.db, user.id)
        .await?
        .as_deref()
        .and_then(Role::parse)
        .ok_or_else(|| {
            error!(user_id = %user.id, "account has no role assignment");
            anyhow::anyhow!("account has no role assignment")
        })?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
        email: user.email,
        role,
        message: "Login successful",
    }))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = normalize_email(&payload.email);

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or(ApiError::NotFound("User with this email does not exist"))?;

    let otp = generate_otp();
    User::set_reset_otp(&state.db, user.id, &otp, OffsetDateTime::now_utc()).await?;

    let mail = build_otp_email(MailKind::Reset, &otp, false);
    state
        .mailer
        .send(&email, &mail)
        .await
        .map_err(ApiError::DeliveryFailure)?;

    info!(user_id = %user.id, "password reset OTP sent");
    Ok(Json(MessageResponse {
        message: "OTP sent to your email.",
    }))
}

/// Stateless check; the code stays valid until `reset_password` consumes it.
#[instrument(skip(state, payload))]
pub async fn verify_reset_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyResetOtpRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = normalize_email(&payload.email);

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    check_reset_otp(&user, &payload.otp)?;

    Ok(Json(MessageResponse {
        message: "OTP verified successfully",
    }))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = normalize_email(&payload.email);

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    check_reset_otp(&user, &payload.otp)?;
    validate_password(&payload.new_password).map_err(ApiError::Validation)?;

    let hash = hash_password(&payload.new_password)?;
    User::set_password_and_clear_otp(&state.db, user.id, &hash).await?;

    info!(user_id = %user.id, "password reset completed");
    Ok(Json(MessageResponse {
        message: "Password reset successfully. Please login with your new password.",
    }))
}

#[instrument(skip(state, payload))]
pub async fn resend_forgot_password_otp(
    State(state): State<AppState>,
    Json(payload): Json<ResendOtpRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = normalize_email(&payload.email);

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    let now = OffsetDateTime::now_utc();
    if let Some(issued_at) = user.otp_created_at {
        if within_resend_cooldown(issued_at, now) {
            warn!(user_id = %user.id, "reset resend inside cooldown");
            return Err(ApiError::RateLimited);
        }
    }

    let otp = generate_otp();
    User::set_reset_otp(&state.db, user.id, &otp, now).await?;

    let mail = build_otp_email(MailKind::Reset, &otp, true);
    state
        .mailer
        .send(&email, &mail)
        .await
        .map_err(ApiError::DeliveryFailure)?;

    info!(user_id = %user.id, "password reset OTP resent");
    Ok(Json(MessageResponse {
        message: "OTP resent successfully",
    }))
}

/// Exact-match and expiry validation shared by both reset steps.
fn check_reset_otp(user: &User, submitted: &str) -> Result<(), ApiError> {
    if user.otp.as_deref() != Some(submitted) {
        return Err(ApiError::InvalidCode);
    }
    if let Some(issued_at) = user.otp_created_at {
        if otp_expired(issued_at, OffsetDateTime::now_utc()) {
            return Err(ApiError::Expired);
        }
    }
    Ok(())
}

#[instrument(skip(state, user))]
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = CommonProfile::get_or_create(&state.db, user.id, &user.email).await?;
    Ok(Json(profile_response(profile)))
}

#[instrument(skip(state, user, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    CommonProfile::get_or_create(&state.db, user.id, &user.email).await?;
    let profile = CommonProfile::update_partial(
        &state.db,
        user.id,
        payload.full_name.as_deref(),
        payload.bio.as_deref(),
        payload.profile_picture.as_deref(),
    )
    .await?;
    Ok(Json(profile_response(profile)))
}

fn profile_response(profile: CommonProfile) -> ProfileResponse {
    ProfileResponse {
        user_id: profile.user_id,
        full_name: profile.full_name,
        bio: profile.bio,
        profile_picture: profile.profile_picture,
        updated_at: profile.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use uuid::Uuid;

    fn user_with_otp(otp: Option<&str>, issued_seconds_ago: Option<i64>) -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: Uuid::new_v4(),
            email: "test@example.com".into(),
            username: "a1b2c3d4e5".into(),
            password_hash: "x".into(),
            is_staff: false,
            is_active: true,
            otp: otp.map(|s| s.to_string()),
            otp_created_at: issued_seconds_ago.map(|s| now - Duration::seconds(s)),
            created_at: now,
        }
    }

    #[test]
    fn reset_check_rejects_missing_or_wrong_code() {
        let no_otp = user_with_otp(None, None);
        assert!(matches!(
            check_reset_otp(&no_otp, "abc123"),
            Err(ApiError::InvalidCode)
        ));

        let wrong = user_with_otp(Some("abc123"), Some(10));
        assert!(matches!(
            check_reset_otp(&wrong, "ABC123"),
            Err(ApiError::InvalidCode)
        ));
    }

    #[test]
    fn reset_check_enforces_the_validity_window() {
        let fresh = user_with_otp(Some("abc123"), Some(599));
        assert!(check_reset_otp(&fresh, "abc123").is_ok());

        let stale = user_with_otp(Some("abc123"), Some(601));
        assert!(matches!(
            check_reset_otp(&stale, "abc123"),
            Err(ApiError::Expired)
        ));
    }

    #[test]
    fn emails_are_normalized_before_lookup() {
        assert_eq!(normalize_email("  Test@Example.COM "), "test@example.com");
    }
}
