//! Property-Based Test Generators
//!
//! Proptest strategies for model scores, document sets and rules. Scores
//! cover the full numeric range including out-of-range and boundary values,
//! since categorization must accept anything.

use domain_routing::{Bucket, DocumentFields, DocumentSet, MatchFeatures, MlScores, Rule, TriageInput};
use proptest::prelude::*;

/// Fraud probabilities, weighted towards the bucket boundaries
pub fn fraud_score_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => 0.0f64..=1.0,
        1 => prop::sample::select(vec![0.0, 0.33, 0.330001, 0.6, 0.67, 0.670001, 1.0]),
        1 => -1.0f64..2.0,
    ]
}

/// Fraud scores that trip the override
pub fn override_fraud_score_strategy() -> impl Strategy<Value = f64> {
    0.6f64..=1.0
}

pub fn complexity_score_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => 0.0f64..6.0,
        1 => prop::sample::select(vec![2.0, 2.0001, 3.0, 3.5, 3.5001]),
    ]
}

/// Known labels in assorted casing plus arbitrary text
pub fn severity_label_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec!["Low", "Medium", "High", "low", "MEDIUM", "high", ""])
            .prop_map(str::to_string),
        "[a-zA-Z]{0,8}",
    ]
}

pub fn claim_category_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec!["accident", "medical", "health", "vehicle", "Medical"])
            .prop_map(str::to_string),
        "[a-z]{1,10}",
    ]
}

pub fn bucket_strategy() -> impl Strategy<Value = Bucket> {
    prop_oneof![Just(Bucket::Low), Just(Bucket::Mid), Just(Bucket::High)]
}

/// Complete score sets
pub fn ml_scores_strategy() -> impl Strategy<Value = MlScores> {
    (
        fraud_score_strategy(),
        complexity_score_strategy(),
        severity_label_strategy(),
        claim_category_strategy(),
    )
        .prop_map(|(fraud, complexity, severity, category)| {
            MlScores::default()
                .fraud_score(fraud)
                .complexity_score(complexity)
                .severity_level(severity)
                .claim_category(category)
        })
}

/// Score sets with keys randomly missing
pub fn sparse_ml_scores_strategy() -> impl Strategy<Value = MlScores> {
    (
        proptest::option::of(fraud_score_strategy()),
        proptest::option::of(complexity_score_strategy()),
        proptest::option::of(severity_label_strategy()),
        proptest::option::of(claim_category_strategy()),
    )
        .prop_map(|(fraud_score, complexity_score, severity_level, claim_category)| MlScores {
            fraud_score,
            complexity_score,
            severity_level,
            claim_category,
            insurance_type: None,
        })
}

fn narrative_text_strategy() -> impl Strategy<Value = String> {
    prop::sample::subsequence(
        vec![
            "Accident Claim Form",
            "rear-end collision",
            "notice of claim served",
            "attorney letter attached",
            "bumper replaced at garage",
            "hospital admission",
            "no remarks",
        ],
        0..4,
    )
    .prop_map(|parts| parts.join(". "))
}

fn document_strategy() -> impl Strategy<Value = DocumentFields> {
    (
        proptest::option::of(any::<bool>()),
        proptest::option::of("FIR-[0-9]{4}"),
        proptest::option::of(any::<bool>()),
        narrative_text_strategy(),
    )
        .prop_map(|(injuries, report_no, total_loss, text)| {
            let mut fields = DocumentFields::new().with("raw_text", text);
            if let Some(injuries) = injuries {
                fields = fields.with("injuries_reported", injuries);
            }
            if let Some(report_no) = report_no {
                fields = fields.with("police_report_no", report_no);
            }
            if let Some(total_loss) = total_loss {
                fields = fields.with("total_loss_flag", total_loss);
            }
            fields
        })
}

pub fn document_set_strategy() -> impl Strategy<Value = DocumentSet> {
    (document_strategy(), document_strategy(), document_strategy()).prop_map(|(acord, police, loss)| {
        DocumentSet {
            acord,
            police,
            loss,
            ..Default::default()
        }
    })
}

pub fn match_features_strategy() -> impl Strategy<Value = MatchFeatures> {
    (
        proptest::option::of(0.0f64..1.0),
        proptest::option::of(0.0f64..=1.0),
        proptest::option::of(prop::sample::select(vec![0.0, 0.5, 1.0])),
    )
        .prop_map(|(damage_difference, location_match, vehicle_match)| MatchFeatures {
            damage_difference,
            location_match,
            vehicle_match,
        })
}

pub fn triage_input_strategy() -> impl Strategy<Value = TriageInput> {
    (
        document_set_strategy(),
        match_features_strategy(),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(|(documents, features, fraud_label)| TriageInput {
            documents,
            features,
            fraud_label,
        })
}

/// Rules of every condition type, including ones the evaluator ignores
pub fn rule_strategy() -> impl Strategy<Value = Rule> {
    let bucket_name = bucket_strategy().prop_map(|b| b.as_str().to_string());
    prop_oneof![
        (prop::sample::select(vec!["fraud", "severity", "complexity"]), bucket_name)
            .prop_map(|(kind, value)| Rule::new(kind, value)),
        claim_category_strategy().prop_map(|c| Rule::new("claim_type", c)),
        (prop::sample::select(vec![">=", ">", "<=", "<", "=="]), 0.0f64..=1.0)
            .prop_map(|(op, threshold)| Rule::fraud_threshold(op, threshold)),
        (
            proptest::option::of(bucket_strategy()),
            proptest::option::of(bucket_strategy()),
            proptest::option::of(bucket_strategy()),
        )
            .prop_map(|(f, s, c)| Rule::combined(f, s, c)),
        "[a-z_]{1,12}".prop_map(|kind| Rule::new(kind, "high")),
    ]
}

pub fn rule_set_strategy() -> impl Strategy<Value = Vec<Rule>> {
    proptest::collection::vec(rule_strategy(), 0..8)
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn override_scores_stay_in_override_range(score in override_fraud_score_strategy()) {
            prop_assert!(score >= 0.6);
            prop_assert!(score <= 1.0);
        }

        #[test]
        fn police_report_numbers_are_well_formed(documents in document_set_strategy()) {
            for doc in [&documents.acord, &documents.police, &documents.loss] {
                if let Some(no) = doc.get("police_report_no") {
                    prop_assert!(no.as_str().is_some_and(|s| s.starts_with("FIR-")));
                }
            }
        }

        #[test]
        fn rule_sets_are_bounded(rules in rule_set_strategy()) {
            prop_assert!(rules.len() < 8);
        }
    }
}
