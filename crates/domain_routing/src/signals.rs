//! Claim signal inputs
//!
//! `ClaimData` and `MlScores` are what callers submit; `SignalBundle` is the
//! immutable per-decision snapshot built from them. `ClaimSignals` is the
//! looser shape accepted for reroutes, usually an earlier result echoed back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use core_kernel::ClaimId;
use crate::category::CategorizedSignals;
use crate::lenient::{lenient_f64, lenient_text, number_from_value, text_from_value};

pub const DEFAULT_FRAUD_SCORE: f64 = 0.0;
pub const DEFAULT_COMPLEXITY_SCORE: f64 = 1.0;
pub const DEFAULT_SEVERITY_LEVEL: &str = "Low";
pub const DEFAULT_CLAIM_CATEGORY: &str = "accident";
pub const DEFAULT_INSURANCE_TYPE: &str = "vehicle";
pub const UNKNOWN_CLAIM_NUMBER: &str = "unknown";

/// Keys a reroute result writes itself; stale copies in the input are dropped
const RESULT_FIELDS: &[&str] = &[
    "routing_team",
    "adjuster",
    "routing_reason",
    "rule_applied",
    "fraud_category",
    "severity_category",
    "complexity_category",
    "rules_version",
    "rerouted_at",
    "strategy",
    "triage",
];

/// Claim-level data accompanying the model scores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimData {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub claim_number: Option<String>,
    /// Opaque analysis payload from upstream extraction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyses: Option<Value>,
}

impl ClaimData {
    pub fn with_claim_number(claim_number: impl Into<String>) -> Self {
        Self {
            claim_number: Some(claim_number.into()),
            ..Default::default()
        }
    }

    /// The analysis payload, preferring `analysis` over `analyses`
    pub fn analysis_payload(&self) -> Value {
        [&self.analysis, &self.analyses]
            .into_iter()
            .flatten()
            .find(|v| crate::lenient::is_present(v))
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }
}

/// Model outputs for a claim; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MlScores {
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub fraud_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub complexity_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub severity_level: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub claim_category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub insurance_type: Option<String>,
}

impl MlScores {
    pub fn fraud_score(mut self, score: f64) -> Self {
        self.fraud_score = Some(score);
        self
    }

    pub fn complexity_score(mut self, score: f64) -> Self {
        self.complexity_score = Some(score);
        self
    }

    pub fn severity_level(mut self, level: impl Into<String>) -> Self {
        self.severity_level = Some(level.into());
        self
    }

    pub fn claim_category(mut self, category: impl Into<String>) -> Self {
        self.claim_category = Some(category.into());
        self
    }

    pub fn insurance_type(mut self, insurance_type: impl Into<String>) -> Self {
        self.insurance_type = Some(insurance_type.into());
        self
    }
}

fn finite_or(score: Option<f64>, default: f64) -> f64 {
    score.filter(|s| s.is_finite()).unwrap_or(default)
}

/// Immutable snapshot of the signals behind one routing decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalBundle {
    pub claim_id: String,
    pub claim_number: String,
    pub fraud_score: f64,
    pub complexity_score: f64,
    pub severity_level: String,
    pub claim_category: String,
    pub insurance_type: String,
    pub timestamp: DateTime<Utc>,
    pub analysis: Value,
}

impl SignalBundle {
    /// Builds a bundle from a fresh submission, applying field defaults
    ///
    /// A missing claim number yields a generated `CLM-` placeholder id and a
    /// claim number of `"unknown"`.
    pub fn from_submission(claim_data: &ClaimData, ml_scores: &MlScores) -> Self {
        let claim_id = claim_data
            .claim_number
            .clone()
            .unwrap_or_else(|| ClaimId::new_v7().to_string());

        Self {
            claim_id,
            claim_number: claim_data
                .claim_number
                .clone()
                .unwrap_or_else(|| UNKNOWN_CLAIM_NUMBER.to_string()),
            fraud_score: finite_or(ml_scores.fraud_score, DEFAULT_FRAUD_SCORE),
            complexity_score: finite_or(ml_scores.complexity_score, DEFAULT_COMPLEXITY_SCORE),
            severity_level: ml_scores
                .severity_level
                .clone()
                .unwrap_or_else(|| DEFAULT_SEVERITY_LEVEL.to_string()),
            claim_category: ml_scores
                .claim_category
                .clone()
                .unwrap_or_else(|| DEFAULT_CLAIM_CATEGORY.to_string()),
            insurance_type: ml_scores
                .insurance_type
                .clone()
                .unwrap_or_else(|| DEFAULT_INSURANCE_TYPE.to_string()),
            timestamp: Utc::now(),
            analysis: claim_data.analysis_payload(),
        }
    }

    /// Rebuilds a bundle from previously routed claim signals
    pub fn from_signals(signals: &ClaimSignals) -> Self {
        let claim_data = ClaimData {
            claim_number: signals.claim_number.clone(),
            ..Default::default()
        };
        let mut bundle = Self::from_submission(&claim_data, &signals.scores());
        if let Some(claim_id) = &signals.claim_id {
            bundle.claim_id = claim_id.clone();
        }
        bundle
    }

    /// Derives the three buckets; a pure function of the bundle
    pub fn categorize(&self) -> CategorizedSignals {
        CategorizedSignals::categorize(self.fraud_score, &self.severity_level, self.complexity_score)
    }
}

/// A previously processed claim submitted for rerouting
///
/// Unknown keys are carried through untouched so callers get their own
/// record back with fresh routing fields. A known key whose value cannot be
/// decoded is kept as sent, in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct ClaimSignals {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraud_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Removes and decodes one known key; undecodable non-null values go back
fn take_field<T>(fields: &mut Map<String, Value>, key: &str, decode: fn(&Value) -> Option<T>) -> Option<T> {
    let value = fields.remove(key)?;
    let decoded = decode(&value);
    if decoded.is_none() && !value.is_null() {
        fields.insert(key.to_string(), value);
    }
    decoded
}

impl From<Map<String, Value>> for ClaimSignals {
    fn from(mut fields: Map<String, Value>) -> Self {
        let claim_id = take_field(&mut fields, "claim_id", text_from_value);
        let claim_number = take_field(&mut fields, "claim_number", text_from_value);
        let fraud_score = take_field(&mut fields, "fraud_score", number_from_value);
        let complexity_score = take_field(&mut fields, "complexity_score", number_from_value);
        let severity_level = take_field(&mut fields, "severity_level", text_from_value);
        let claim_category = take_field(&mut fields, "claim_category", text_from_value);
        let insurance_type = take_field(&mut fields, "insurance_type", text_from_value);

        Self {
            claim_id,
            claim_number,
            fraud_score,
            complexity_score,
            severity_level,
            claim_category,
            insurance_type,
            extra: fields,
        }
    }
}

impl ClaimSignals {
    /// The model-score view of this claim
    pub fn scores(&self) -> MlScores {
        MlScores {
            fraud_score: self.fraud_score,
            complexity_score: self.complexity_score,
            severity_level: self.severity_level.clone(),
            claim_category: self.claim_category.clone(),
            insurance_type: self.insurance_type.clone(),
        }
    }

    /// Drops routing fields left over from an earlier evaluation
    pub fn without_result_fields(mut self) -> Self {
        self.extra.retain(|key, _| !RESULT_FIELDS.contains(&key.as_str()));
        self
    }
}

impl From<&SignalBundle> for ClaimSignals {
    fn from(bundle: &SignalBundle) -> Self {
        Self {
            claim_id: Some(bundle.claim_id.clone()),
            claim_number: Some(bundle.claim_number.clone()),
            fraud_score: Some(bundle.fraud_score),
            complexity_score: Some(bundle.complexity_score),
            severity_level: Some(bundle.severity_level.clone()),
            claim_category: Some(bundle.claim_category.clone()),
            insurance_type: Some(bundle.insurance_type.clone()),
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_applied() {
        let bundle = SignalBundle::from_submission(&ClaimData::default(), &MlScores::default());

        assert_eq!(bundle.fraud_score, 0.0);
        assert_eq!(bundle.complexity_score, 1.0);
        assert_eq!(bundle.severity_level, "Low");
        assert_eq!(bundle.claim_category, "accident");
        assert_eq!(bundle.insurance_type, "vehicle");
        assert_eq!(bundle.claim_number, "unknown");
        assert!(bundle.claim_id.starts_with("CLM-"));
        assert_eq!(bundle.analysis, json!({}));
    }

    #[test]
    fn test_claim_number_becomes_claim_id() {
        let bundle = SignalBundle::from_submission(
            &ClaimData::with_claim_number("CLM-7781"),
            &MlScores::default(),
        );
        assert_eq!(bundle.claim_id, "CLM-7781");
        assert_eq!(bundle.claim_number, "CLM-7781");
    }

    #[test]
    fn test_scores_decode_leniently() {
        let scores: MlScores = serde_json::from_value(json!({
            "fraud_score": "0.72",
            "complexity_score": null,
            "severity_level": "High",
            "claim_category": 7
        }))
        .unwrap();

        assert_eq!(scores.fraud_score, Some(0.72));
        assert_eq!(scores.complexity_score, None);
        assert_eq!(scores.claim_category.as_deref(), Some("7"));
    }

    #[test]
    fn test_analysis_falls_back_to_analyses() {
        let claim: ClaimData = serde_json::from_value(json!({
            "claim_number": "C-1",
            "analyses": {"acord": {"policy_number": "P-9"}}
        }))
        .unwrap();
        assert_eq!(claim.analysis_payload(), json!({"acord": {"policy_number": "P-9"}}));
    }

    #[test]
    fn test_signals_keep_unknown_keys_and_drop_stale_routing() {
        let signals: ClaimSignals = serde_json::from_value(json!({
            "claim_number": "C-2",
            "fraud_score": 0.1,
            "routing_team": "SIU (Fraud)",
            "policy_holder": "A. Rao"
        }))
        .unwrap();

        let signals = signals.without_result_fields();
        assert!(signals.extra.contains_key("policy_holder"));
        assert!(!signals.extra.contains_key("routing_team"));
    }

    #[test]
    fn test_non_finite_scores_take_defaults() {
        let bundle = SignalBundle::from_submission(
            &ClaimData::default(),
            &MlScores::default().fraud_score(f64::INFINITY).complexity_score(f64::NAN),
        );
        assert_eq!(bundle.fraud_score, DEFAULT_FRAUD_SCORE);
        assert_eq!(bundle.complexity_score, DEFAULT_COMPLEXITY_SCORE);
    }

    #[test]
    fn test_undecodable_fields_are_kept_as_sent() {
        let signals: ClaimSignals = serde_json::from_value(json!({
            "claim_number": 42,
            "fraud_score": "abc",
            "complexity_score": null,
            "severity_level": {"label": "High"}
        }))
        .unwrap();

        assert_eq!(signals.claim_number.as_deref(), Some("42"));
        assert_eq!(signals.fraud_score, None);
        assert_eq!(signals.extra.get("fraud_score"), Some(&json!("abc")));
        assert!(!signals.extra.contains_key("complexity_score"));

        let value = serde_json::to_value(&signals).unwrap();
        assert_eq!(value["fraud_score"], json!("abc"));
        assert_eq!(value["severity_level"], json!({"label": "High"}));
    }

    #[test]
    fn test_strategy_and_triage_are_result_fields() {
        let signals: ClaimSignals = serde_json::from_value(json!({
            "claim_number": "C-3",
            "strategy": "triage",
            "triage": {"routing_team": "Litigation"}
        }))
        .unwrap();

        let signals = signals.without_result_fields();
        assert!(signals.extra.is_empty());
    }
}
