use crate::errors::AppError;
use crate::machine::local_time_string;
use crate::models::{LoginRequest, UserRecord, ViewState};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let view = state.view().await;
    Html(render_index(&view, &local_time_string()))
}

pub async fn get_state(State(state): State<AppState>) -> Json<ViewState> {
    Json(state.view().await)
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ViewState>, AppError> {
    Ok(Json(state.login(&payload.name).await?))
}

pub async fn logout(State(state): State<AppState>) -> Json<ViewState> {
    Json(state.logout().await)
}

pub async fn click(State(state): State<AppState>) -> Result<Json<ViewState>, AppError> {
    Ok(Json(state.click().await?))
}

pub async fn reset(State(state): State<AppState>) -> Result<Json<ViewState>, AppError> {
    Ok(Json(state.reset().await?))
}

pub async fn toggle_theme(State(state): State<AppState>) -> Json<ViewState> {
    Json(state.toggle_theme().await)
}

pub async fn get_user(State(state): State<AppState>, Path(name): Path<String>) -> Json<UserRecord> {
    Json(state.user(&name).await)
}
