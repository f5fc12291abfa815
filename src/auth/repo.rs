use anyhow::Context;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::{CommonProfile, PendingRegistration, Role, User};
use crate::auth::services::email_local_part;

impl User {
    /// Case-insensitive lookup by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password_hash, is_staff, is_active,
                   otp, otp_created_at, created_at
            FROM users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Stamp a fresh reset OTP onto the account.
    pub async fn set_reset_otp(
        db: &PgPool,
        user_id: Uuid,
        otp: &str,
        issued_at: OffsetDateTime,
    ) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET otp = $2, otp_created_at = $3 WHERE id = $1")
            .bind(user_id)
            .bind(otp)
            .bind(issued_at)
            .execute(db)
            .await
            .context("set reset otp")?;
        Ok(())
    }

    /// Store the rehashed password and consume the reset OTP.
    pub async fn set_password_and_clear_otp(
        db: &PgPool,
        user_id: Uuid,
        password_hash: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, otp = NULL, otp_created_at = NULL
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(db)
        .await
        .context("reset password")?;
        Ok(())
    }
}

impl PendingRegistration {
    /// Create or replace the pending attempt for this email.
    pub async fn upsert(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        role: Role,
        otp: &str,
        issued_at: OffsetDateTime,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO pending_registrations (email, password_hash, role, otp, otp_created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO UPDATE
            SET password_hash = EXCLUDED.password_hash,
                role = EXCLUDED.role,
                otp = EXCLUDED.otp,
                otp_created_at = EXCLUDED.otp_created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .bind(otp)
        .bind(issued_at)
        .execute(db)
        .await
        .context("upsert pending registration")?;
        Ok(())
    }

    pub async fn find_by_email(
        db: &PgPool,
        email: &str,
    ) -> anyhow::Result<Option<PendingRegistration>> {
        let pending = sqlx::query_as::<_, PendingRegistration>(
            r#"
            SELECT email, password_hash, role, otp, otp_created_at, created_at
            FROM pending_registrations
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(pending)
    }

    /// Overwrite the code and issuance time on resend.
    pub async fn refresh_otp(
        db: &PgPool,
        email: &str,
        otp: &str,
        issued_at: OffsetDateTime,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE pending_registrations SET otp = $2, otp_created_at = $3 WHERE email = $1",
        )
        .bind(email)
        .bind(otp)
        .bind(issued_at)
        .execute(db)
        .await
        .context("refresh pending otp")?;
        Ok(())
    }
}

/// Promote a verified pending registration into a permanent account.
///
/// Account, role assignment, and profile are created in one transaction and
/// the pending row is deleted in the same unit, so an account can never exist
/// without its role.
pub async fn promote(
    db: &PgPool,
    pending: &PendingRegistration,
    role: Role,
    username: &str,
) -> anyhow::Result<User> {
    let mut tx = db.begin().await.context("begin promote tx")?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, username, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, email, username, password_hash, is_staff, is_active,
                  otp, otp_created_at, created_at
        "#,
    )
    .bind(&pending.email)
    .bind(username)
    .bind(&pending.password_hash) // already hashed at registration time
    .fetch_one(&mut *tx)
    .await
    .context("insert user")?;

    sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2)")
        .bind(user.id)
        .bind(role.as_str())
        .execute(&mut *tx)
        .await
        .context("insert role")?;

    sqlx::query("INSERT INTO common_profiles (user_id, full_name) VALUES ($1, $2)")
        .bind(user.id)
        .bind(email_local_part(&user.email))
        .execute(&mut *tx)
        .await
        .context("insert profile")?;

    sqlx::query("DELETE FROM pending_registrations WHERE email = $1")
        .bind(&pending.email)
        .execute(&mut *tx)
        .await
        .context("delete pending registration")?;

    tx.commit().await.context("commit promote tx")?;
    Ok(user)
}

/// Return the existing token key for the account, minting one on first login.
pub async fn get_or_create_token(
    db: &PgPool,
    user_id: Uuid,
    candidate_key: &str,
) -> anyhow::Result<String> {
    sqlx::query("INSERT INTO auth_tokens (user_id, key) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING")
        .bind(user_id)
        .bind(candidate_key)
        .execute(db)
        .await
        .context("insert auth token")?;

    let (key,): (String,) = sqlx::query_as("SELECT key FROM auth_tokens WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(db)
        .await
        .context("load auth token")?;
    Ok(key)
}

pub async fn find_role(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT role FROM user_roles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await?;
    Ok(row.map(|(role,)| role))
}

impl CommonProfile {
    /// Fetch the profile, provisioning a default one for accounts created
    /// before the profile table existed.
    pub async fn get_or_create(
        db: &PgPool,
        user_id: Uuid,
        email: &str,
    ) -> anyhow::Result<CommonProfile> {
        sqlx::query(
            "INSERT INTO common_profiles (user_id, full_name) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(email_local_part(email))
        .execute(db)
        .await
        .context("provision profile")?;

        let profile = sqlx::query_as::<_, CommonProfile>(
            r#"
            SELECT user_id, full_name, bio, profile_picture, created_at, updated_at
            FROM common_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(profile)
    }

    pub async fn update_partial(
        db: &PgPool,
        user_id: Uuid,
        full_name: Option<&str>,
        bio: Option<&str>,
        profile_picture: Option<&str>,
    ) -> anyhow::Result<CommonProfile> {
        let profile = sqlx::query_as::<_, CommonProfile>(
            r#"
            UPDATE common_profiles
            SET full_name = COALESCE($2, full_name),
                bio = COALESCE($3, bio),
                profile_picture = COALESCE($4, profile_picture),
                updated_at = now()
            WHERE user_id = $1
            RETURNING user_id, full_name, bio, profile_picture, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(full_name)
        .bind(bio)
        .bind(profile_picture)
        .fetch_one(db)
        .await
        .context("update profile")?;
        Ok(profile)
    }
}
