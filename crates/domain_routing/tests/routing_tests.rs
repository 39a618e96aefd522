//! Tests for the departmental routing algorithm

use proptest::prelude::*;

use domain_routing::{
    route_departmental, ClaimData, Department, HandlingLevel, MlScores, PolicySnapshot,
    PolicyStore, RoutingDecision, SignalBundle,
};
use test_utils::{
    assert_department, assert_routed_to, assert_siu, claim_category_strategy,
    complexity_score_strategy, ml_scores_strategy, override_fraud_score_strategy,
    severity_label_strategy, RuleFixtures, ScoreFixtures,
};

fn route_with(scores: &MlScores, snapshot: &PolicySnapshot) -> RoutingDecision {
    let bundle = SignalBundle::from_submission(&ClaimData::default(), scores);
    let categories = bundle.categorize();
    route_departmental(&bundle, &categories, snapshot)
}

fn route(scores: &MlScores) -> RoutingDecision {
    route_with(scores, &PolicySnapshot::default())
}

// ============================================================================
// Fraud Override
// ============================================================================

mod fraud_override_tests {
    use super::*;

    #[test]
    fn test_suspected_fraud_goes_to_siu() {
        let decision = route(&ScoreFixtures::suspected_fraud());
        assert_siu(&decision);
        assert!(decision.routing_reason.contains("75.0%"));
        assert!(decision.rule_applied);
    }

    #[test]
    fn test_override_beats_health_high() {
        let decision = route(&ScoreFixtures::medical_high().fraud_score(0.61));
        assert_siu(&decision);
    }

    #[test]
    fn test_override_uses_raw_score_not_bucket() {
        // 0.65 is in the mid bucket but above the override threshold
        assert_siu(&route(&MlScores::default().fraud_score(0.65)));
        assert_department(&route(&MlScores::default().fraud_score(0.59)), Department::Accident);
    }
}

// ============================================================================
// Department and Level
// ============================================================================

mod department_tests {
    use super::*;

    #[test]
    fn test_accident_mid_scenario() {
        let decision = route(&ScoreFixtures::accident_mid());
        assert_routed_to(&decision, "Accident Dept - Mid", "Standard Adjuster");
        assert_eq!(
            decision.routing_reason,
            "Complexity score is 2.8 and Severity score is Medium so routed to this team"
        );
    }

    #[test]
    fn test_health_high() {
        let decision = route(&ScoreFixtures::medical_high());
        assert_routed_to(&decision, "Health Dept - High", "Senior Adjuster");
    }

    #[test]
    fn test_all_defaults_is_accident_low() {
        let decision = route(&MlScores::default());
        assert_routed_to(&decision, "Accident Dept - Low", "Junior Adjuster");
        assert_eq!(
            decision.routing_reason,
            "Complexity score is 1.0 and Severity score is Low so routed to this team"
        );
    }

    #[test]
    fn test_severity_alone_raises_level() {
        let decision = route(&MlScores::default().severity_level("HIGH"));
        assert_routed_to(&decision, "Accident Dept - High", "Senior Adjuster");
    }

    #[test]
    fn test_category_match_is_exact() {
        // Department selection is an exact match on the category text
        let decision = route(&MlScores::default().claim_category("Medical"));
        assert_department(&decision, Department::Accident);
    }

    #[test]
    fn test_handling_level_display() {
        assert_eq!(HandlingLevel::Mid.to_string(), "Mid");
        assert_eq!(HandlingLevel::High.adjuster(), "Senior Adjuster");
    }

    #[test]
    fn test_stored_rules_do_not_change_decision() {
        let store = PolicyStore::new();
        let before = route_with(&ScoreFixtures::accident_mid(), &store.snapshot());
        store.replace(RuleFixtures::mixed());
        let after = route_with(&ScoreFixtures::accident_mid(), &store.snapshot());
        assert_eq!(before, after);
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn override_wins_regardless_of_other_signals(
        fraud in override_fraud_score_strategy(),
        complexity in complexity_score_strategy(),
        severity in severity_label_strategy(),
        category in claim_category_strategy(),
    ) {
        let scores = MlScores::default()
            .fraud_score(fraud)
            .complexity_score(complexity)
            .severity_level(severity)
            .claim_category(category);
        let decision = route(&scores);
        prop_assert_eq!(decision.routing_team.as_str(), "SIU (Fraud)");
        prop_assert_eq!(decision.adjuster.as_str(), "SIU Investigator");
    }

    #[test]
    fn department_follows_category(scores in ml_scores_strategy()) {
        let decision = route(&scores);
        let fraud = scores.fraud_score.unwrap_or_default();
        prop_assume!(fraud < 0.6);

        let category = scores.claim_category.as_deref().unwrap_or("accident");
        let expected = if category == "medical" || category == "health" {
            "Health Dept - "
        } else {
            "Accident Dept - "
        };
        prop_assert!(decision.routing_team.starts_with(expected));
        prop_assert!(decision.rule_applied);
    }

    #[test]
    fn routing_is_deterministic(scores in ml_scores_strategy()) {
        prop_assert_eq!(route(&scores), route(&scores));
    }
}
