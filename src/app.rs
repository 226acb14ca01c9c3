use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/state", get(handlers::get_state))
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route("/api/click", post(handlers::click))
        .route("/api/reset", post(handlers::reset))
        .route("/api/theme", post(handlers::toggle_theme))
        .route("/api/users/:name", get(handlers::get_user))
        .with_state(state)
}
