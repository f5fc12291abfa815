use anyhow::Context;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Educational subject used to tag courses and learner interests.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SubjectTag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Language {
    pub id: Uuid,
    pub language_name: String,
    pub language_name_in_native: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TimezoneEntry {
    pub id: Uuid,
    pub timezone_name: String,
    pub gmt_offset: String,
}

/// URL-safe identifier derived from a tag name.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

pub async fn list_subject_tags(db: &PgPool) -> anyhow::Result<Vec<SubjectTag>> {
    let tags = sqlx::query_as::<_, SubjectTag>(
        "SELECT id, name, slug FROM subject_tags ORDER BY name",
    )
    .fetch_all(db)
    .await?;
    Ok(tags)
}

pub async fn create_subject_tag(db: &PgPool, name: &str) -> anyhow::Result<SubjectTag> {
    let tag = sqlx::query_as::<_, SubjectTag>(
        "INSERT INTO subject_tags (name, slug) VALUES ($1, $2) RETURNING id, name, slug",
    )
    .bind(name)
    .bind(slugify(name))
    .fetch_one(db)
    .await
    .context("insert subject tag")?;
    Ok(tag)
}

pub async fn list_languages(db: &PgPool) -> anyhow::Result<Vec<Language>> {
    let languages = sqlx::query_as::<_, Language>(
        r#"
        SELECT id, language_name, language_name_in_native
        FROM languages
        ORDER BY language_name
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(languages)
}

pub async fn create_language(
    db: &PgPool,
    language_name: &str,
    language_name_in_native: Option<&str>,
) -> anyhow::Result<Language> {
    let language = sqlx::query_as::<_, Language>(
        r#"
        INSERT INTO languages (language_name, language_name_in_native)
        VALUES ($1, $2)
        RETURNING id, language_name, language_name_in_native
        "#,
    )
    .bind(language_name)
    .bind(language_name_in_native)
    .fetch_one(db)
    .await
    .context("insert language")?;
    Ok(language)
}

pub async fn list_timezones(db: &PgPool) -> anyhow::Result<Vec<TimezoneEntry>> {
    let timezones = sqlx::query_as::<_, TimezoneEntry>(
        "SELECT id, timezone_name, gmt_offset FROM timezones ORDER BY timezone_name",
    )
    .fetch_all(db)
    .await?;
    Ok(timezones)
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slugs_are_lowercase_hyphenated() {
        assert_eq!(slugify("Computer Science"), "computer-science");
        assert_eq!(slugify("Internet of Things (IoT)"), "internet-of-things-iot");
        assert_eq!(slugify("  C++  "), "c");
        assert_eq!(slugify("Human-Computer Interaction"), "human-computer-interaction");
    }
}
