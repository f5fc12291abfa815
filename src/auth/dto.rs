use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::Role;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub user_type: Role,
}

/// Request body for OTP verification.
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct ResendOtpRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyResetOtpRequest {
    pub email: String,
    pub otp: String,
}

/// Final step of the reset flow; re-validates the OTP on its own.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub email: String,
}

/// Account summary returned once the email is verified.
#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub full_name: String,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_parses_role() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"test@example.com","password":"Abc@12345",
                "password_confirm":"Abc@12345","user_type":"student"}"#,
        )
        .unwrap();
        assert_eq!(req.user_type, Role::Student);
    }

    #[test]
    fn register_request_rejects_unknown_role() {
        let res = serde_json::from_str::<RegisterRequest>(
            r#"{"email":"test@example.com","password":"Abc@12345",
                "password_confirm":"Abc@12345","user_type":"janitor"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn login_response_exposes_token_and_role() {
        let res = LoginResponse {
            token: "k".repeat(40),
            user_id: Uuid::new_v4(),
            email: "test@example.com".into(),
            role: Role::Teacher,
            message: "Login successful",
        };
        let json = serde_json::to_string(&res).unwrap();
        assert!(json.contains("\"role\":\"teacher\""));
        assert!(json.contains("\"token\""));
    }
}
