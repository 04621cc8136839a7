//! URL classification handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use phishguard_core::Label;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{PredictRequest, PredictResponse};
use crate::AppState;

/// POST /predict
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    request.validate()?;

    tracing::debug!(
        fetch_page = state.config.fetch_page,
        resolve_dns = state.config.resolve_dns,
        "Extracting features for {}",
        request.url
    );
    let features = state.extractor.extract(&request.url).await?;
    let probability = state.model.predict_proba(&features.to_row())?;
    let label = Label::from_probability(probability);

    tracing::info!(
        url = %request.url,
        probability,
        safe = label.is_positive(),
        "URL classified"
    );

    Ok(Json(PredictResponse::new(label.is_positive(), probability)))
}
