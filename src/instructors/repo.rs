use anyhow::Context;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Instructor-side profile. Teaching stats and approval flags are
/// admin/pipeline-owned and read-only through the profile endpoint.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InstructorProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub designation: Option<String>,
    pub short_bio: Option<String>,
    pub full_bio: Option<String>,
    pub teaching_languages: serde_json::Value,
    pub organization: String,
    pub years_of_experience: f64,
    pub total_courses: i32,
    pub total_students: i32,
    pub average_rating: f64,
    pub is_approved: bool,
    pub verified_badge: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

pub async fn get_or_create(db: &PgPool, user_id: Uuid) -> anyhow::Result<InstructorProfile> {
    sqlx::query(
        "INSERT INTO instructor_profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING",
    )
    .bind(user_id)
    .execute(db)
    .await
    .context("provision instructor profile")?;

    let profile = sqlx::query_as::<_, InstructorProfile>(
        r#"
        SELECT id, user_id, designation, short_bio, full_bio, teaching_languages,
               organization, years_of_experience, total_courses, total_students,
               average_rating, is_approved, verified_badge, created_at, updated_at
        FROM instructor_profiles
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(db)
    .await?;
    Ok(profile)
}

#[allow(clippy::too_many_arguments)]
pub async fn update_partial(
    db: &PgPool,
    user_id: Uuid,
    designation: Option<&str>,
    short_bio: Option<&str>,
    full_bio: Option<&str>,
    teaching_languages: Option<&serde_json::Value>,
    organization: Option<&str>,
    years_of_experience: Option<f64>,
) -> anyhow::Result<InstructorProfile> {
    let profile = sqlx::query_as::<_, InstructorProfile>(
        r#"
        UPDATE instructor_profiles
        SET designation = COALESCE($2, designation),
            short_bio = COALESCE($3, short_bio),
            full_bio = COALESCE($4, full_bio),
            teaching_languages = COALESCE($5, teaching_languages),
            organization = COALESCE($6, organization),
            years_of_experience = COALESCE($7, years_of_experience),
            updated_at = now()
        WHERE user_id = $1
        RETURNING id, user_id, designation, short_bio, full_bio, teaching_languages,
                  organization, years_of_experience, total_courses, total_students,
                  average_rating, is_approved, verified_badge, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(designation)
    .bind(short_bio)
    .bind(full_bio)
    .bind(teaching_languages)
    .bind(organization)
    .bind(years_of_experience)
    .fetch_one(db)
    .await
    .context("update instructor profile")?;
    Ok(profile)
}
