use crate::state::AppState;
use axum::{routing::get, Router};

pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new().route("/theme", get(handlers::get_theme).post(handlers::set_theme))
}
