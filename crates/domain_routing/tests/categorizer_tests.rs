//! Tests for signal categorization and category detection

use proptest::prelude::*;

use domain_routing::{
    categorize_complexity, categorize_fraud, categorize_severity, detect_category, Bucket,
    CategorizedSignals, ClaimData, Department, MlScores, SignalBundle,
};
use test_utils::{complexity_score_strategy, fraud_score_strategy, severity_label_strategy};

// ============================================================================
// Bucket Boundaries
// ============================================================================

mod boundary_tests {
    use super::*;

    #[test]
    fn test_fraud_bucket_edges() {
        assert_eq!(categorize_fraud(0.33), Bucket::Low);
        assert_eq!(categorize_fraud(0.330001), Bucket::Mid);
        assert_eq!(categorize_fraud(0.67), Bucket::Mid);
        assert_eq!(categorize_fraud(0.670001), Bucket::High);
    }

    #[test]
    fn test_complexity_bucket_edges() {
        assert_eq!(categorize_complexity(2.0), Bucket::Low);
        assert_eq!(categorize_complexity(2.0001), Bucket::Mid);
        assert_eq!(categorize_complexity(3.5), Bucket::Mid);
        assert_eq!(categorize_complexity(3.5001), Bucket::High);
    }

    #[test]
    fn test_out_of_range_scores_still_bucket() {
        assert_eq!(categorize_fraud(-0.5), Bucket::Low);
        assert_eq!(categorize_fraud(7.0), Bucket::High);
        assert_eq!(categorize_complexity(100.0), Bucket::High);
    }

    #[test]
    fn test_severity_labels_are_case_insensitive() {
        assert_eq!(categorize_severity("High"), Bucket::High);
        assert_eq!(categorize_severity("mEdIuM"), Bucket::Mid);
        assert_eq!(categorize_severity("Low"), Bucket::Low);
        assert_eq!(categorize_severity("catastrophic"), Bucket::Low);
        assert_eq!(categorize_severity(""), Bucket::Low);
    }

    #[test]
    fn test_bucket_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Bucket::Mid).unwrap(), "\"mid\"");
    }
}

// ============================================================================
// Signal Bundle Categorization
// ============================================================================

mod bundle_tests {
    use super::*;

    #[test]
    fn test_scenario_buckets() {
        let scores = MlScores::default()
            .fraud_score(0.2)
            .complexity_score(2.8)
            .severity_level("Medium")
            .claim_category("accident");
        let bundle = SignalBundle::from_submission(&ClaimData::default(), &scores);

        assert_eq!(
            bundle.categorize(),
            CategorizedSignals {
                fraud_category: Bucket::Low,
                severity_category: Bucket::Mid,
                complexity_category: Bucket::Mid,
            }
        );
    }

    #[test]
    fn test_defaults_categorize_low() {
        let bundle = SignalBundle::from_submission(&ClaimData::default(), &MlScores::default());
        let categories = bundle.categorize();
        assert_eq!(categories.fraud_category, Bucket::Low);
        assert_eq!(categories.severity_category, Bucket::Low);
        assert_eq!(categories.complexity_category, Bucket::Low);
    }

    #[test]
    fn test_department_selection() {
        assert_eq!(Department::for_category("medical"), Department::Health);
        assert_eq!(Department::for_category("health"), Department::Health);
        assert_eq!(Department::for_category("accident"), Department::Accident);
        assert_eq!(Department::for_category("vehicle"), Department::Accident);
    }
}

// ============================================================================
// Category Detection
// ============================================================================

mod detection_tests {
    use super::*;

    #[test]
    fn test_hospital_text_is_health() {
        let texts = [Some("Hospital admission following diagnosis"), None, None];
        assert_eq!(detect_category(texts), "health");
    }

    #[test]
    fn test_collision_text_is_accident() {
        let texts = [Some("Accident Claim Form"), Some("rear collision near toll plaza"), None];
        assert_eq!(detect_category(texts), "accident");
    }

    #[test]
    fn test_no_text_defaults_to_accident() {
        assert_eq!(detect_category([None, None, None]), "accident");
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn categorization_is_total_and_monotonic(a in fraud_score_strategy(), b in fraud_score_strategy()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(categorize_fraud(lo) <= categorize_fraud(hi));
    }

    #[test]
    fn complexity_bucket_is_monotonic(a in complexity_score_strategy(), b in complexity_score_strategy()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(categorize_complexity(lo) <= categorize_complexity(hi));
    }

    #[test]
    fn severity_ignores_case(label in severity_label_strategy()) {
        prop_assert_eq!(
            categorize_severity(&label.to_uppercase()),
            categorize_severity(&label.to_lowercase())
        );
    }
}
