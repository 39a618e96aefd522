//! Test Data Builders
//!
//! Builders for claim submissions and triage inputs. Tests set only the
//! fields they care about; everything else keeps the engine defaults.

use domain_routing::{
    ClaimSignals, ClaimSubmission, DocumentFields, DocumentSet, MatchFeatures, MlScores,
    RoutingStrategy, TriageInput,
};

/// Builder for claim submissions
#[derive(Debug, Clone, Default)]
pub struct ClaimSubmissionBuilder {
    submission: ClaimSubmission,
}

impl ClaimSubmissionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim_number(mut self, claim_number: impl Into<String>) -> Self {
        self.submission.claim_data.claim_number = Some(claim_number.into());
        self
    }

    pub fn scores(mut self, scores: MlScores) -> Self {
        self.submission.ml_scores = scores;
        self
    }

    pub fn fraud_score(mut self, score: f64) -> Self {
        self.submission.ml_scores.fraud_score = Some(score);
        self
    }

    pub fn complexity_score(mut self, score: f64) -> Self {
        self.submission.ml_scores.complexity_score = Some(score);
        self
    }

    pub fn severity_level(mut self, level: impl Into<String>) -> Self {
        self.submission.ml_scores.severity_level = Some(level.into());
        self
    }

    pub fn claim_category(mut self, category: impl Into<String>) -> Self {
        self.submission.ml_scores.claim_category = Some(category.into());
        self
    }

    /// Switches to the triage strategy with the given input
    pub fn triage(mut self, input: TriageInput) -> Self {
        self.submission.strategy = RoutingStrategy::Triage;
        self.submission.triage = Some(input);
        self
    }

    pub fn build(self) -> ClaimSubmission {
        self.submission
    }
}

/// Builder for triage inputs
#[derive(Debug, Clone, Default)]
pub struct TriageInputBuilder {
    input: TriageInput,
}

impl TriageInputBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(mut self, documents: DocumentSet) -> Self {
        self.input.documents = documents;
        self
    }

    pub fn acord(mut self, fields: DocumentFields) -> Self {
        self.input.documents.acord = fields;
        self
    }

    pub fn police(mut self, fields: DocumentFields) -> Self {
        self.input.documents.police = fields;
        self
    }

    pub fn loss(mut self, fields: DocumentFields) -> Self {
        self.input.documents.loss = fields;
        self
    }

    pub fn features(mut self, features: MatchFeatures) -> Self {
        self.input.features = features;
        self
    }

    pub fn fraud_label(mut self, label: bool) -> Self {
        self.input.fraud_label = Some(label);
        self
    }

    pub fn build(self) -> TriageInput {
        self.input
    }
}

/// Builds reroute input the way a caller echoes back an earlier claim
pub fn claim_signals(claim_number: &str, scores: &MlScores) -> ClaimSignals {
    ClaimSignals {
        claim_id: Some(claim_number.to_string()),
        claim_number: Some(claim_number.to_string()),
        fraud_score: scores.fraud_score,
        complexity_score: scores.complexity_score,
        severity_level: scores.severity_level.clone(),
        claim_category: scores.claim_category.clone(),
        insurance_type: scores.insurance_type.clone(),
        extra: Default::default(),
    }
}
