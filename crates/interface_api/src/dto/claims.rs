//! Claim routing DTOs

use serde::{Deserialize, Serialize};

use domain_routing::{
    ClaimData, ClaimRoutingResult, ClaimSignals, ClaimSubmission, MlScores, ReroutedClaim,
    RoutingStrategy, TriageInput,
};

/// Body of `POST /pathway/ingest-claim`
///
/// Null or missing `claim_data` and `ml_scores` are treated as empty. When
/// no strategy is named, a request carrying `triage` input is triaged.
#[derive(Debug, Default, Deserialize)]
pub struct IngestClaimRequest {
    #[serde(default)]
    pub claim_data: Option<ClaimData>,
    #[serde(default)]
    pub ml_scores: Option<MlScores>,
    #[serde(default)]
    pub strategy: Option<RoutingStrategy>,
    #[serde(default)]
    pub triage: Option<TriageInput>,
}

impl IngestClaimRequest {
    pub fn into_submission(self) -> ClaimSubmission {
        let strategy = self.strategy.unwrap_or(if self.triage.is_some() {
            RoutingStrategy::Triage
        } else {
            RoutingStrategy::Departmental
        });

        ClaimSubmission {
            claim_data: self.claim_data.unwrap_or_default(),
            ml_scores: self.ml_scores.unwrap_or_default(),
            strategy,
            triage: self.triage,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IngestClaimResponse {
    pub result: ClaimRoutingResult,
}

#[derive(Debug, Deserialize)]
pub struct RerouteRequest {
    pub claims: Vec<ClaimSignals>,
}

#[derive(Debug, Serialize)]
pub struct RerouteResponse {
    pub count: usize,
    pub claims: Vec<ReroutedClaim>,
}
