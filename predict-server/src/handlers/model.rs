//! Model metadata handler

use axum::{extract::State, Json};

use crate::models::ModelInfo;
use crate::AppState;

pub async fn info(State(state): State<AppState>) -> Json<ModelInfo> {
    Json(state.model_info.as_ref().clone())
}
