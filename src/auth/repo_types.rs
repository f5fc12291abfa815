use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Account role. Closed set so matches over it stay exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            "teacher" => Some(Role::Teacher),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

/// Permanent account record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String, // generated, immutable
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_staff: bool,
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub otp: Option<String>, // password-reset flow only
    #[serde(skip_serializing)]
    pub otp_created_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

/// Unconfirmed signup, keyed by email. Deleted on promotion.
#[derive(Debug, Clone, FromRow)]
pub struct PendingRegistration {
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub otp: String,
    pub otp_created_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

/// Public-facing profile shared by every account, created at promotion.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommonProfile {
    pub user_id: Uuid,
    pub full_name: String,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::Admin, Role::Teacher, Role::Student] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse("Admin"), None);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), "\"teacher\"");
        let parsed: Role = serde_json::from_str("\"student\"").unwrap();
        assert_eq!(parsed, Role::Student);
        assert!(serde_json::from_str::<Role>("\"manager\"").is_err());
    }
}
