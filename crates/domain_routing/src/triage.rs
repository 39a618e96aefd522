//! Triage scoring
//!
//! Two independent weighted heuristics over document fields and free text:
//! litigation risk and subrogation opportunity. Each yields a score in
//! `[0, 1]`, a flag and the reasons that fired. The triage routing choice
//! then layers fraud, litigation, subrogation, total loss, severity and
//! injuries in fixed precedence.
//!
//! | Heuristic    | Contribution                                    | Weight |
//! |--------------|-------------------------------------------------|--------|
//! | Litigation   | Injuries reported                               | 0.25   |
//! | Litigation   | High severity bucket or complexity >= 3         | 0.25   |
//! | Litigation   | Police report number present                    | 0.15   |
//! | Litigation   | Legal keywords in document text                 | 0.35   |
//! | Subrogation  | Rear-end wording in document text               | 0.35   |
//! | Subrogation  | Police report number present                    | 0.15   |
//! | Subrogation  | Damage difference < 0.15, severity mid or high  | 0.25   |
//! | Subrogation  | Location match >= 0.7 and full vehicle match    | 0.25   |

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::category::{Bucket, CategorizedSignals};
use crate::lenient::{flag_from_value, is_present, lenient_bool, lenient_f64};
use crate::routing::{FRAUD_OVERRIDE_THRESHOLD, SIU_INVESTIGATOR, SIU_TEAM};
use crate::signals::SignalBundle;

/// Score at or above which a risk flag is raised
pub const RISK_FLAG_THRESHOLD: f64 = 0.5;
/// Fraud score above which a missing fraud label is derived as 1
pub const FRAUD_LABEL_THRESHOLD: f64 = 0.5;
/// Complexity score treated as high impact regardless of bucket
pub const HIGH_COMPLEXITY_SCORE: f64 = 3.0;

const LEGAL_KEYWORDS: &[&str] = &["attorney", "legal", "lawsuit", "notice of claim"];
const REAR_END_KEYWORDS: &[&str] = &["rear collision", "rear-end", "rear end"];

/// Fields extracted from one source document
///
/// Null and blank values are dropped on decode, so an absent field and an
/// empty one look the same. A document that is not an object decodes empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DocumentFields(Map<String, Value>);

impl DocumentFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        if !is_blank(&value) {
            self.0.insert(key.into(), value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Reads a yes/no field; anything unreadable is `None`
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(flag_from_value)
    }

    pub fn is_present(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_present)
    }

    /// The document's OCR text, if any
    pub fn raw_text(&self) -> Option<&str> {
        self.get("raw_text").and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

impl<'de> Deserialize<'de> for DocumentFields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = match Value::deserialize(deserializer)? {
            Value::Object(mut map) => {
                map.retain(|_, v| !is_blank(v));
                map
            }
            _ => Map::new(),
        };
        Ok(Self(fields))
    }
}

/// Extracted fields for every supported document type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSet {
    #[serde(default, alias = "accord")]
    pub acord: DocumentFields,
    #[serde(default, alias = "fir")]
    pub police: DocumentFields,
    #[serde(default)]
    pub loss: DocumentFields,
    #[serde(default)]
    pub rc: DocumentFields,
    #[serde(default)]
    pub dl: DocumentFields,
    #[serde(default)]
    pub hospital: DocumentFields,
}

impl DocumentSet {
    fn narrative(&self) -> [&DocumentFields; 3] {
        [&self.acord, &self.police, &self.loss]
    }

    /// Any of the claim form, police report or loss report flags injuries
    pub fn injuries_reported(&self) -> bool {
        self.narrative()
            .iter()
            .any(|doc| doc.flag("injuries_reported") == Some(true))
    }

    pub fn police_report_present(&self) -> bool {
        self.police.is_present("police_report_no")
    }

    pub fn total_loss(&self) -> bool {
        self.loss.flag("total_loss_flag") == Some(true)
    }

    /// Raw texts of the claim form, police report and loss report
    pub fn narrative_texts(&self) -> [Option<&str>; 3] {
        self.narrative().map(DocumentFields::raw_text)
    }

    /// Non-empty narrative texts joined by newlines
    pub fn combined_text(&self) -> String {
        self.narrative_texts()
            .into_iter()
            .flatten()
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Cross-document match ratios produced by the matching stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchFeatures {
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub damage_difference: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub location_match: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub vehicle_match: Option<f64>,
}

/// Everything the triage path needs beyond the model signals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriageInput {
    #[serde(default)]
    pub documents: DocumentSet,
    #[serde(default)]
    pub features: MatchFeatures,
    /// Upstream fraud verdict; derived from the fraud score when absent
    #[serde(default, deserialize_with = "lenient_bool", skip_serializing_if = "Option::is_none")]
    pub fraud_label: Option<bool>,
}

/// Score, flag and contributing reasons of one heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub flag: bool,
    pub reasons: Vec<String>,
}

#[derive(Default)]
struct ScoreCard {
    total: f64,
    reasons: Vec<String>,
}

impl ScoreCard {
    fn add(&mut self, applies: bool, weight: f64, reason: &str) {
        if applies {
            self.total += weight;
            self.reasons.push(reason.to_string());
        }
    }

    fn finish(self) -> RiskAssessment {
        let score = (self.total.min(1.0) * 1000.0).round() / 1000.0;
        RiskAssessment {
            score,
            flag: score >= RISK_FLAG_THRESHOLD,
            reasons: self.reasons,
        }
    }
}

/// Signals and document facts shared by both heuristics and the routing choice
#[derive(Debug, Clone)]
pub struct TriageEvidence<'a> {
    pub input: &'a TriageInput,
    pub fraud_score: f64,
    pub fraud_label: bool,
    pub severity: Bucket,
    pub complexity_score: f64,
    text: String,
}

impl<'a> TriageEvidence<'a> {
    pub fn new(bundle: &SignalBundle, categories: &CategorizedSignals, input: &'a TriageInput) -> Self {
        Self {
            input,
            fraud_score: bundle.fraud_score,
            fraud_label: input
                .fraud_label
                .unwrap_or(bundle.fraud_score > FRAUD_LABEL_THRESHOLD),
            severity: categories.severity_category,
            complexity_score: bundle.complexity_score,
            text: input.documents.combined_text().to_lowercase(),
        }
    }

    fn high_impact(&self) -> bool {
        self.severity == Bucket::High || self.complexity_score >= HIGH_COMPLEXITY_SCORE
    }

    fn mentions(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.text.contains(k))
    }
}

pub fn assess_litigation(evidence: &TriageEvidence<'_>) -> RiskAssessment {
    let documents = &evidence.input.documents;
    let mut card = ScoreCard::default();

    card.add(documents.injuries_reported(), 0.25, "Injuries reported");
    card.add(evidence.high_impact(), 0.25, "High severity/complexity");
    card.add(documents.police_report_present(), 0.15, "Police report present");
    card.add(evidence.mentions(LEGAL_KEYWORDS), 0.35, "Legal keywords present");

    card.finish()
}

pub fn assess_subrogation(evidence: &TriageEvidence<'_>) -> RiskAssessment {
    let documents = &evidence.input.documents;
    let features = &evidence.input.features;
    let mut card = ScoreCard::default();

    card.add(evidence.mentions(REAR_END_KEYWORDS), 0.35, "Rear-end scenario");
    card.add(documents.police_report_present(), 0.15, "Police report present");
    card.add(
        features.damage_difference.unwrap_or(0.0) < 0.15 && evidence.severity >= Bucket::Mid,
        0.25,
        "Significant damage, consistent",
    );
    card.add(
        features.location_match.unwrap_or(0.0) >= 0.7 && features.vehicle_match.unwrap_or(0.0) == 1.0,
        0.25,
        "Good doc alignment",
    );

    card.finish()
}

/// Team, adjuster and reasons chosen by the triage precedence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageRouting {
    pub routing_team: &'static str,
    pub adjuster: &'static str,
    pub reasons: Vec<String>,
}

impl TriageRouting {
    fn to(routing_team: &'static str, adjuster: &'static str, reason: Option<&str>) -> Self {
        Self {
            routing_team,
            adjuster,
            reasons: reason.map(str::to_string).into_iter().collect(),
        }
    }
}

/// First matching branch wins; the fallback is fast track with no reasons.
pub fn choose_routing(
    evidence: &TriageEvidence<'_>,
    litigation: &RiskAssessment,
    subrogation: &RiskAssessment,
) -> TriageRouting {
    let documents = &evidence.input.documents;

    if evidence.fraud_label || evidence.fraud_score >= FRAUD_OVERRIDE_THRESHOLD {
        TriageRouting::to(SIU_TEAM, SIU_INVESTIGATOR, Some("High fraud risk"))
    } else if litigation.flag {
        TriageRouting::to("Litigation", "Senior BI Adjuster", Some("Potential litigation"))
    } else if subrogation.flag {
        TriageRouting::to("Subrogation", "Subrogation Specialist", Some("Potential recovery opportunity"))
    } else if documents.total_loss() {
        TriageRouting::to("Total Loss", "Total Loss Adjuster", Some("Total loss flagged"))
    } else if evidence.high_impact() {
        TriageRouting::to("Complex Claims", "Senior Adjuster", Some("High severity/complexity"))
    } else if documents.injuries_reported() {
        TriageRouting::to("Bodily Injury", "BI Adjuster", Some("Injuries reported"))
    } else {
        TriageRouting::to("Fast Track", "Standard Adjuster", None)
    }
}

/// Full triage outcome for one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageResult {
    pub fraud_score: f64,
    pub fraud_label: u8,
    pub severity_level: String,
    pub complexity_score: f64,
    pub litigation_score: f64,
    pub litigation_flag: bool,
    pub subrogation_score: f64,
    pub subrogation_flag: bool,
    pub routing_team: String,
    pub adjuster: String,
    pub reasons: Vec<String>,
    pub litigation_reasons: Vec<String>,
    pub subrogation_reasons: Vec<String>,
}

/// Runs both heuristics and the triage routing choice
pub fn triage(bundle: &SignalBundle, categories: &CategorizedSignals, input: &TriageInput) -> TriageResult {
    let evidence = TriageEvidence::new(bundle, categories, input);
    let litigation = assess_litigation(&evidence);
    let subrogation = assess_subrogation(&evidence);
    let routing = choose_routing(&evidence, &litigation, &subrogation);

    TriageResult {
        fraud_score: bundle.fraud_score,
        fraud_label: u8::from(evidence.fraud_label),
        severity_level: bundle.severity_level.clone(),
        complexity_score: bundle.complexity_score,
        litigation_score: litigation.score,
        litigation_flag: litigation.flag,
        subrogation_score: subrogation.score,
        subrogation_flag: subrogation.flag,
        routing_team: routing.routing_team.to_string(),
        adjuster: routing.adjuster.to_string(),
        reasons: routing.reasons,
        litigation_reasons: litigation.reasons,
        subrogation_reasons: subrogation.reasons,
    }
}
