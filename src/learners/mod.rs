use crate::state::AppState;
use axum::{routing::get, Router};

mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/learner/profile",
        get(handlers::get_learner_profile).patch(handlers::update_learner_profile),
    )
}
