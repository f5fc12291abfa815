use anyhow::Context;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::content::repo::SubjectTag;

/// Learner-side profile: interests plus gamification counters. All counters
/// are maintained by the course/quiz pipeline and read-only here.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LearnerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_xp: i32,
    pub level: i32,
    pub badges: serde_json::Value,
    pub streak_days: i32,
    pub longest_streak: i32,
    pub last_active: OffsetDateTime,
    pub total_courses_enrolled: i32,
    pub total_courses_completed: i32,
    pub total_quizzes_attempted: i32,
    pub total_quizzes_passed: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

pub async fn get_or_create(db: &PgPool, user_id: Uuid) -> anyhow::Result<LearnerProfile> {
    sqlx::query("INSERT INTO learner_profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
        .bind(user_id)
        .execute(db)
        .await
        .context("provision learner profile")?;

    let profile = sqlx::query_as::<_, LearnerProfile>(
        r#"
        SELECT id, user_id, total_xp, level, badges, streak_days, longest_streak,
               last_active, total_courses_enrolled, total_courses_completed,
               total_quizzes_attempted, total_quizzes_passed, created_at, updated_at
        FROM learner_profiles
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(db)
    .await?;
    Ok(profile)
}

pub async fn list_interests(db: &PgPool, learner_id: Uuid) -> anyhow::Result<Vec<SubjectTag>> {
    let tags = sqlx::query_as::<_, SubjectTag>(
        r#"
        SELECT t.id, t.name, t.slug
        FROM learner_interests li
        JOIN subject_tags t ON t.id = li.tag_id
        WHERE li.learner_id = $1
        ORDER BY t.name
        "#,
    )
    .bind(learner_id)
    .fetch_all(db)
    .await?;
    Ok(tags)
}

/// True when every id refers to an existing subject tag.
pub async fn tags_exist(db: &PgPool, tag_ids: &[Uuid]) -> anyhow::Result<bool> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT count(*) FROM subject_tags WHERE id = ANY($1)")
            .bind(tag_ids)
            .fetch_one(db)
            .await?;
    Ok(count as usize == tag_ids.len())
}

/// Replace the interest set wholesale.
pub async fn set_interests(db: &PgPool, learner_id: Uuid, tag_ids: &[Uuid]) -> anyhow::Result<()> {
    let mut tx = db.begin().await.context("begin interests tx")?;

    sqlx::query("DELETE FROM learner_interests WHERE learner_id = $1")
        .bind(learner_id)
        .execute(&mut *tx)
        .await
        .context("clear interests")?;

    for tag_id in tag_ids {
        sqlx::query("INSERT INTO learner_interests (learner_id, tag_id) VALUES ($1, $2)")
            .bind(learner_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await
            .context("insert interest")?;
    }

    sqlx::query("UPDATE learner_profiles SET updated_at = now() WHERE id = $1")
        .bind(learner_id)
        .execute(&mut *tx)
        .await
        .context("touch learner profile")?;

    tx.commit().await.context("commit interests tx")?;
    Ok(())
}
