use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

/// UI theme preference, one row per account, defaulting to light.
pub async fn get_or_create(db: &PgPool, user_id: Uuid) -> anyhow::Result<String> {
    sqlx::query("INSERT INTO themes (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
        .bind(user_id)
        .execute(db)
        .await
        .context("provision theme")?;

    let (theme,): (String,) = sqlx::query_as("SELECT theme FROM themes WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(db)
        .await?;
    Ok(theme)
}

pub async fn set(db: &PgPool, user_id: Uuid, theme: &str) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO themes (user_id, theme) VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE SET theme = EXCLUDED.theme
        "#,
    )
    .bind(user_id)
    .bind(theme)
    .execute(db)
    .await
    .context("set theme")?;
    Ok(())
}
