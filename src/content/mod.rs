use crate::state::AppState;
use axum::{routing::get, Router};

mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/content/subject-tags",
            get(handlers::list_subject_tags).post(handlers::create_subject_tag),
        )
        .route(
            "/content/languages",
            get(handlers::list_languages).post(handlers::create_language),
        )
        .route("/content/timezones", get(handlers::list_timezones))
}
