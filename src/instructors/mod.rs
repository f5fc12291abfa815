use crate::state::AppState;
use axum::{routing::get, Router};

mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/instructor/profile",
        get(handlers::get_instructor_profile).patch(handlers::update_instructor_profile),
    )
}
