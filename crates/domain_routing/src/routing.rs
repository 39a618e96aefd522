//! Departmental routing
//!
//! The two built-in stages, evaluated in order, first match wins:
//!
//! 1. Fraud override: `fraud_score >= 0.6` goes to the SIU.
//! 2. Department and level: health or accident department, level from the
//!    worse of the severity and complexity buckets.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

use crate::category::{Bucket, CategorizedSignals, Department};
use crate::policy_store::PolicySnapshot;
use crate::signals::SignalBundle;

/// Fraud score at or above which a claim bypasses normal routing
pub const FRAUD_OVERRIDE_THRESHOLD: f64 = 0.6;

pub const SIU_TEAM: &str = "SIU (Fraud)";
pub const SIU_INVESTIGATOR: &str = "SIU Investigator";

/// Where a claim goes and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub routing_team: String,
    pub adjuster: String,
    pub routing_reason: String,
    /// Always true for the built-in stages, which count as rules themselves
    pub rule_applied: bool,
}

/// Which decision algorithm handles a claim
///
/// Both algorithms exist side by side; the caller picks. Departmental
/// needs only model signals, triage also needs document fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStrategy {
    #[default]
    Departmental,
    Triage,
}

/// Handling level within a department
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HandlingLevel {
    Low,
    Mid,
    High,
}

impl HandlingLevel {
    /// The worse of the severity and complexity buckets
    pub fn from_buckets(severity: Bucket, complexity: Bucket) -> Self {
        match severity.max(complexity) {
            Bucket::High => HandlingLevel::High,
            Bucket::Mid => HandlingLevel::Mid,
            Bucket::Low => HandlingLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HandlingLevel::Low => "Low",
            HandlingLevel::Mid => "Mid",
            HandlingLevel::High => "High",
        }
    }

    /// Adjuster seniority for the level
    pub fn adjuster(&self) -> &'static str {
        match self {
            HandlingLevel::High => "Senior Adjuster",
            HandlingLevel::Mid => "Standard Adjuster",
            HandlingLevel::Low => "Junior Adjuster",
        }
    }
}

impl fmt::Display for HandlingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routes a claim with the departmental algorithm
///
/// The policy snapshot is recorded for tracing only; stored rules do not
/// change the built-in decision.
pub fn route_departmental(
    bundle: &SignalBundle,
    categories: &CategorizedSignals,
    snapshot: &PolicySnapshot,
) -> RoutingDecision {
    trace!(
        claim_number = %bundle.claim_number,
        rules_version = snapshot.version(),
        "Departmental routing"
    );

    if bundle.fraud_score >= FRAUD_OVERRIDE_THRESHOLD {
        return RoutingDecision {
            routing_team: SIU_TEAM.to_string(),
            adjuster: SIU_INVESTIGATOR.to_string(),
            routing_reason: format!(
                "Fraud score is {:.1}% so routed to this team",
                bundle.fraud_score * 100.0
            ),
            rule_applied: true,
        };
    }

    let department = Department::for_category(&bundle.claim_category);
    let level = HandlingLevel::from_buckets(categories.severity_category, categories.complexity_category);

    RoutingDecision {
        routing_team: format!("{} - {}", department, level),
        adjuster: level.adjuster().to_string(),
        routing_reason: format!(
            "Complexity score is {:.1} and Severity score is {} so routed to this team",
            bundle.complexity_score, bundle.severity_level
        ),
        rule_applied: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::{ClaimData, MlScores};

    fn route(scores: MlScores) -> RoutingDecision {
        let bundle = SignalBundle::from_submission(&ClaimData::default(), &scores);
        let categories = bundle.categorize();
        route_departmental(&bundle, &categories, &PolicySnapshot::default())
    }

    #[test]
    fn test_handling_level_takes_worse_bucket() {
        assert_eq!(HandlingLevel::from_buckets(Bucket::Low, Bucket::High), HandlingLevel::High);
        assert_eq!(HandlingLevel::from_buckets(Bucket::Mid, Bucket::Low), HandlingLevel::Mid);
        assert_eq!(HandlingLevel::from_buckets(Bucket::Low, Bucket::Low), HandlingLevel::Low);
    }

    #[test]
    fn test_fraud_override_reason() {
        let decision = route(MlScores::default().fraud_score(0.72).severity_level("High"));
        assert_eq!(decision.routing_team, SIU_TEAM);
        assert_eq!(decision.adjuster, SIU_INVESTIGATOR);
        assert_eq!(decision.routing_reason, "Fraud score is 72.0% so routed to this team");
    }

    #[test]
    fn test_override_threshold_is_inclusive() {
        assert_eq!(route(MlScores::default().fraud_score(0.6)).routing_team, SIU_TEAM);
        assert_ne!(route(MlScores::default().fraud_score(0.5999)).routing_team, SIU_TEAM);
    }

    #[test]
    fn test_department_level_reason() {
        let decision = route(
            MlScores::default()
                .fraud_score(0.2)
                .complexity_score(2.3)
                .severity_level("Medium"),
        );
        assert_eq!(decision.routing_team, "Accident Dept - Mid");
        assert_eq!(decision.adjuster, "Standard Adjuster");
        assert_eq!(
            decision.routing_reason,
            "Complexity score is 2.3 and Severity score is Medium so routed to this team"
        );
        assert!(decision.rule_applied);
    }

    #[test]
    fn test_health_department_high() {
        let decision = route(MlScores::default().claim_category("medical").complexity_score(4.2));
        assert_eq!(decision.routing_team, "Health Dept - High");
        assert_eq!(decision.adjuster, "Senior Adjuster");
    }
}
