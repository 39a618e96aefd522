//! Rule ingestion handler

use axum::{extract::State, Json};

use domain_routing::Rule;

use crate::{AppState, error::ApiError};
use crate::dto::rules::IngestRulesResponse;

/// Replaces every routing rule
pub async fn ingest_rules(
    State(state): State<AppState>,
    Json(rules): Json<Vec<Rule>>,
) -> Result<Json<IngestRulesResponse>, ApiError> {
    let rules_version = state.engine.ingest_rules(rules)?;
    Ok(Json(IngestRulesResponse { rules_version }))
}
