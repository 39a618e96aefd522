//! Claim routing handlers

use axum::{extract::State, Json};

use crate::{AppState, error::ApiError};
use crate::dto::claims::*;

/// Routes one claim and returns the augmented signal bundle
pub async fn ingest_claim(
    State(state): State<AppState>,
    Json(request): Json<IngestClaimRequest>,
) -> Result<Json<IngestClaimResponse>, ApiError> {
    let result = state.engine.submit(&request.into_submission())?;
    Ok(Json(IngestClaimResponse { result }))
}

/// Re-evaluates earlier claims against the current rules
pub async fn reroute_claims(
    State(state): State<AppState>,
    Json(request): Json<RerouteRequest>,
) -> Result<Json<RerouteResponse>, ApiError> {
    let claims = state.engine.reroute_claims(request.claims)?;
    Ok(Json(RerouteResponse {
        count: claims.len(),
        claims,
    }))
}
