use axum::{extract::State, Json};

use domain_routing::EngineStatus;

use crate::{AppState, error::ApiError};

pub async fn engine_status(State(state): State<AppState>) -> Result<Json<EngineStatus>, ApiError> {
    Ok(Json(state.engine.status()?))
}
