//! Custom Test Assertions
//!
//! Assertion helpers for routing results with messages that show the whole
//! decision on failure.

use domain_routing::{ClaimRoutingResult, Department, ReroutedClaim, RoutingDecision};

/// Asserts the team and adjuster of a decision
pub fn assert_routed_to(decision: &RoutingDecision, routing_team: &str, adjuster: &str) {
    assert_eq!(
        (decision.routing_team.as_str(), decision.adjuster.as_str()),
        (routing_team, adjuster),
        "Unexpected routing: {:?}",
        decision
    );
}

/// Asserts a fraud override decision
pub fn assert_siu(decision: &RoutingDecision) {
    assert_routed_to(decision, "SIU (Fraud)", "SIU Investigator");
}

/// Asserts the team belongs to the given department, any level
pub fn assert_department(decision: &RoutingDecision, department: Department) {
    let prefix = format!("{} - ", department);
    assert!(
        decision.routing_team.starts_with(&prefix),
        "Expected a {} team, got {:?}",
        department,
        decision.routing_team
    );
}

/// Asserts two results made the same decision, ignoring timestamps and ids
pub fn assert_same_decision(a: &ClaimRoutingResult, b: &ClaimRoutingResult) {
    assert_eq!(a.routing, b.routing);
    assert_eq!(a.categories, b.categories);
    assert_eq!(a.rules_version, b.rules_version);
}

/// Asserts two reroute batches match claim for claim, ignoring `rerouted_at`
pub fn assert_same_reroutes(a: &[ReroutedClaim], b: &[ReroutedClaim]) {
    assert_eq!(a.len(), b.len(), "Reroute batches differ in length");
    for (left, right) in a.iter().zip(b) {
        assert_eq!(left.claim, right.claim);
        assert_eq!(left.routing, right.routing);
        assert_eq!(left.categories, right.categories);
        assert_eq!(left.rules_version, right.rules_version);
    }
}

/// Asserts a risk score lies in `[0, 1]` with at most three decimals
pub fn assert_risk_score(score: f64) {
    assert!((0.0..=1.0).contains(&score), "Risk score out of range: {}", score);
    let scaled = score * 1000.0;
    assert!(
        (scaled - scaled.round()).abs() < 1e-6,
        "Risk score has more than three decimals: {}",
        score
    );
}
