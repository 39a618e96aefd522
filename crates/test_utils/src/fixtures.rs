//! Pre-built Test Fixtures
//!
//! Ready-to-use claims, model scores, documents and rule sets. Values are
//! fixed so assertions against them stay predictable.

use domain_routing::{
    Bucket, ClaimData, DocumentFields, DocumentSet, EngineConfig, DataflowMode, MatchFeatures,
    MlScores, Rule,
};
use serde_json::{json, Value};

/// Fixture for claim-level data
pub struct ClaimFixtures;

impl ClaimFixtures {
    pub const CLAIM_NUMBER: &'static str = "CLM-2024-0042";

    /// A claim with a number and no analysis payload
    pub fn numbered() -> ClaimData {
        ClaimData::with_claim_number(Self::CLAIM_NUMBER)
    }

    /// A claim whose analysis arrives under the `analyses` key
    pub fn with_analyses() -> ClaimData {
        ClaimData {
            claim_number: Some(Self::CLAIM_NUMBER.to_string()),
            analysis: None,
            analyses: Some(Self::analysis_payload()),
        }
    }

    pub fn analysis_payload() -> Value {
        json!({
            "acord": {"policy_number": "POL-88231", "insured_name": "R. Mehta"},
            "police": {"police_report_no": "FIR-2231"}
        })
    }
}

/// Fixture for model score sets
pub struct ScoreFixtures;

impl ScoreFixtures {
    /// Low fraud, mid complexity, medium severity accident
    pub fn accident_mid() -> MlScores {
        MlScores::default()
            .fraud_score(0.2)
            .complexity_score(2.8)
            .severity_level("Medium")
            .claim_category("accident")
    }

    /// Scores that trip the fraud override
    pub fn suspected_fraud() -> MlScores {
        MlScores::default()
            .fraud_score(0.75)
            .complexity_score(1.2)
            .severity_level("Low")
            .claim_category("accident")
    }

    pub fn medical_high() -> MlScores {
        MlScores::default()
            .fraud_score(0.1)
            .complexity_score(4.1)
            .severity_level("High")
            .claim_category("medical")
    }
}

/// Fixture for extracted document sets
pub struct DocumentFixtures;

impl DocumentFixtures {
    /// Every litigation contribution fires
    pub fn litigation_case() -> DocumentSet {
        DocumentSet {
            acord: DocumentFields::new()
                .with("injuries_reported", true)
                .with("raw_text", "Accident Claim Form. Claimant has retained an attorney."),
            police: DocumentFields::new()
                .with("police_report_no", "FIR-2231")
                .with("raw_text", "Police Report: two vehicles involved"),
            loss: DocumentFields::new().with("raw_text", "Loss/Assessment Report"),
            ..Default::default()
        }
    }

    /// Rear-end collision with a police report
    pub fn rear_end_case() -> DocumentSet {
        DocumentSet {
            police: DocumentFields::new()
                .with("police_report_no", "FIR-9912")
                .with("raw_text", "Insured vehicle struck in a rear-end collision at a signal"),
            ..Default::default()
        }
    }

    pub fn total_loss_case() -> DocumentSet {
        DocumentSet {
            loss: DocumentFields::new()
                .with("total_loss_flag", "1")
                .with("raw_text", "Vehicle declared beyond economical repair"),
            ..Default::default()
        }
    }

    pub fn hospital_case() -> DocumentSet {
        DocumentSet {
            acord: DocumentFields::new().with("raw_text", "Hospital admission following diagnosis"),
            hospital: DocumentFields::new().with("bill_amount", 42000),
            ..Default::default()
        }
    }
}

/// Fixture for cross-document match features
pub struct FeatureFixtures;

impl FeatureFixtures {
    /// Location and vehicle agree across documents
    pub fn aligned() -> MatchFeatures {
        MatchFeatures {
            damage_difference: Some(0.05),
            location_match: Some(0.9),
            vehicle_match: Some(1.0),
        }
    }
}

/// Fixture for rule sets
pub struct RuleFixtures;

impl RuleFixtures {
    /// One rule of every condition type
    pub fn mixed() -> Vec<Rule> {
        vec![
            Rule::new("fraud", "high").routes_to("SIU (Fraud)", "SIU Investigator"),
            Rule::new("severity", "high").routes_to("Complex Claims", "Senior Adjuster"),
            Rule::new("complexity", "mid").routes_to("Accident Dept - Mid", "Standard Adjuster"),
            Rule::new("claim_type", "medical").routes_to("Health Dept - Low", "Junior Adjuster"),
            Rule::fraud_threshold(">", 0.5).routes_to("SIU (Fraud)", "SIU Investigator"),
            Rule::combined(Some(Bucket::Low), Some(Bucket::Mid), None)
                .routes_to("Accident Dept - Mid", "Standard Adjuster"),
        ]
    }

    pub fn rules_json() -> &'static str {
        r#"[
            {"id": "r-1", "condition_type": "fraud", "condition_value": "high",
             "routing_team": "SIU (Fraud)", "adjuster": "SIU Investigator", "priority": 1},
            {"id": "r-2", "condition_type": "fraud_threshold", "operator": ">=", "threshold": "0.8",
             "routing_team": "SIU (Fraud)", "adjuster": "SIU Investigator", "enabled": false}
        ]"#
    }
}

/// Fixture for engine configuration
pub struct ConfigFixtures;

impl ConfigFixtures {
    pub fn streaming() -> EngineConfig {
        EngineConfig::default()
    }

    pub fn fallback() -> EngineConfig {
        EngineConfig {
            dataflow: DataflowMode::Fallback,
            ..Default::default()
        }
    }
}
