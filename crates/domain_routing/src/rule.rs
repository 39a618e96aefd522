//! Routing rules and the single-rule predicate evaluator
//!
//! Rules are declarative condition-to-outcome records supplied by callers
//! as JSON. They are stored whole and unvalidated; the evaluator decides at
//! match time what a rule's condition means, and a rule it does not
//! understand simply never matches.
//!
//! # Condition types
//!
//! | `condition_type`  | Matches when                                              |
//! |-------------------|-----------------------------------------------------------|
//! | `fraud`           | fraud bucket equals `condition_value`                     |
//! | `severity`        | severity bucket equals `condition_value`                  |
//! | `complexity`      | complexity bucket equals `condition_value`                |
//! | `claim_type`      | claim category equals `condition_value`                   |
//! | `fraud_threshold` | `fraud_score <operator> threshold` (default `>=` 0.0)     |
//! | `combined`        | every given `*_category` equals its bucket (AND)          |
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_routing::rule::{parse_rules, rule_matches, RuleContext};
//!
//! let rules = parse_rules(r#"[{"condition_type": "fraud", "condition_value": "high"}]"#)?;
//! assert!(rule_matches(&rules[0], &ctx));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use std::str::FromStr;

use core_kernel::CoreError;
use crate::category::{Bucket, CategorizedSignals};
use crate::error::RoutingError;
use crate::lenient::{lenient_bool, lenient_f64, lenient_i64, lenient_text, lenient_u64};
use crate::signals::SignalBundle;

/// A routing rule as supplied by a caller
///
/// `version` is stamped by the policy store when the rule set is replaced;
/// any caller-supplied value is overwritten.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool", skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient_i64", skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub condition_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub condition_value: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub claim_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub routing_team: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub adjuster: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub fraud_category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub severity_category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub complexity_category: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64", skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    /// Attributes this engine does not interpret, kept for round-tripping
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Rule {
    /// Creates a rule with the given condition type and value
    pub fn new(condition_type: impl Into<String>, condition_value: impl Into<String>) -> Self {
        Self {
            condition_type: Some(condition_type.into()),
            condition_value: Some(condition_value.into()),
            ..Default::default()
        }
    }

    /// Creates a numeric fraud threshold rule
    pub fn fraud_threshold(operator: impl Into<String>, threshold: f64) -> Self {
        Self {
            condition_type: Some("fraud_threshold".to_string()),
            operator: Some(operator.into()),
            threshold: Some(threshold),
            ..Default::default()
        }
    }

    /// Creates a combined rule; `None` means "don't care"
    pub fn combined(fraud: Option<Bucket>, severity: Option<Bucket>, complexity: Option<Bucket>) -> Self {
        Self {
            condition_type: Some("combined".to_string()),
            fraud_category: fraud.map(|b| b.as_str().to_string()),
            severity_category: severity.map(|b| b.as_str().to_string()),
            complexity_category: complexity.map(|b| b.as_str().to_string()),
            ..Default::default()
        }
    }

    /// Sets the routing outcome
    pub fn routes_to(mut self, routing_team: impl Into<String>, adjuster: impl Into<String>) -> Self {
        self.routing_team = Some(routing_team.into());
        self.adjuster = Some(adjuster.into());
        self
    }

    /// Rules are enabled unless explicitly disabled
    pub fn is_enabled(&self) -> bool {
        self.enabled != Some(false)
    }

    /// Interprets the rule's condition fields
    pub fn condition(&self) -> RuleCondition<'_> {
        let value = self.condition_value.as_deref();
        match self.condition_type.as_deref() {
            Some("fraud") => RuleCondition::Fraud(value),
            Some("severity") => RuleCondition::Severity(value),
            Some("complexity") => RuleCondition::Complexity(value),
            Some("claim_type") => RuleCondition::ClaimType(value),
            Some("fraud_threshold") => RuleCondition::FraudThreshold {
                operator: self
                    .operator
                    .as_deref()
                    .map_or(Some(ThresholdOperator::GreaterOrEqual), |op| op.parse().ok()),
                threshold: self.threshold.unwrap_or(0.0),
            },
            Some("combined") => RuleCondition::Combined {
                fraud: non_empty(&self.fraud_category),
                severity: non_empty(&self.severity_category),
                complexity: non_empty(&self.complexity_category),
            },
            _ => RuleCondition::Unrecognized,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Comparison operator for threshold rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdOperator {
    GreaterOrEqual,
    Greater,
    LessOrEqual,
    Less,
}

impl ThresholdOperator {
    pub fn compare(&self, value: f64, threshold: f64) -> bool {
        match self {
            ThresholdOperator::GreaterOrEqual => value >= threshold,
            ThresholdOperator::Greater => value > threshold,
            ThresholdOperator::LessOrEqual => value <= threshold,
            ThresholdOperator::Less => value < threshold,
        }
    }
}

impl FromStr for ThresholdOperator {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">=" => Ok(ThresholdOperator::GreaterOrEqual),
            ">" => Ok(ThresholdOperator::Greater),
            "<=" => Ok(ThresholdOperator::LessOrEqual),
            "<" => Ok(ThresholdOperator::Less),
            other => Err(CoreError::validation(format!("Unknown comparison operator: {}", other))),
        }
    }
}

/// A rule's condition, interpreted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleCondition<'a> {
    Fraud(Option<&'a str>),
    Severity(Option<&'a str>),
    Complexity(Option<&'a str>),
    ClaimType(Option<&'a str>),
    /// `operator` is `None` when the rule names an operator we do not know
    FraudThreshold {
        operator: Option<ThresholdOperator>,
        threshold: f64,
    },
    /// Logical AND; `None` sub-conditions are ignored
    Combined {
        fraud: Option<&'a str>,
        severity: Option<&'a str>,
        complexity: Option<&'a str>,
    },
    Unrecognized,
}

/// What a rule is evaluated against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleContext<'a> {
    pub fraud: Bucket,
    pub severity: Bucket,
    pub complexity: Bucket,
    pub claim_type: &'a str,
    pub fraud_score: f64,
}

impl<'a> RuleContext<'a> {
    pub fn new(bundle: &'a SignalBundle, categories: &CategorizedSignals) -> Self {
        Self {
            fraud: categories.fraud_category,
            severity: categories.severity_category,
            complexity: categories.complexity_category,
            claim_type: &bundle.claim_category,
            fraud_score: bundle.fraud_score,
        }
    }
}

/// Extension point for custom rule semantics
///
/// Implementations decide whether one rule's condition holds. Custom
/// policies can wrap [`ConditionEvaluator`] to add condition types without
/// touching the built-in routing stages.
pub trait RulePredicate {
    fn matches(&self, rule: &Rule, ctx: &RuleContext<'_>) -> bool;
}

/// The built-in condition semantics
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionEvaluator;

impl RulePredicate for ConditionEvaluator {
    fn matches(&self, rule: &Rule, ctx: &RuleContext<'_>) -> bool {
        let bucket_is = |expected: Option<&str>, actual: Bucket| expected == Some(actual.as_str());

        match rule.condition() {
            RuleCondition::Fraud(value) => bucket_is(value, ctx.fraud),
            RuleCondition::Severity(value) => bucket_is(value, ctx.severity),
            RuleCondition::Complexity(value) => bucket_is(value, ctx.complexity),
            RuleCondition::ClaimType(value) => value == Some(ctx.claim_type),
            RuleCondition::FraudThreshold { operator, threshold } => operator
                .map(|op| op.compare(ctx.fraud_score, threshold))
                .unwrap_or(false),
            RuleCondition::Combined { fraud, severity, complexity } => {
                fraud.map_or(true, |f| f == ctx.fraud.as_str())
                    && severity.map_or(true, |s| s == ctx.severity.as_str())
                    && complexity.map_or(true, |c| c == ctx.complexity.as_str())
            }
            RuleCondition::Unrecognized => false,
        }
    }
}

/// Evaluates one rule with the built-in semantics
pub fn rule_matches(rule: &Rule, ctx: &RuleContext<'_>) -> bool {
    ConditionEvaluator.matches(rule, ctx)
}

/// Parses a JSON array of rules
pub fn parse_rules(json_str: &str) -> Result<Vec<Rule>, RoutingError> {
    serde_json::from_str(json_str).map_err(|e| RoutingError::RulesParse(e.to_string()))
}

/// Loads a JSON array of rules from a file
pub fn load_rules_file(path: &Path) -> Result<Vec<Rule>, RoutingError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| RoutingError::RulesFile {
            path: path.display().to_string(),
            source,
        })?;

    parse_rules(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(fraud_score: f64) -> RuleContext<'static> {
        RuleContext {
            fraud: crate::category::categorize_fraud(fraud_score),
            severity: Bucket::Mid,
            complexity: Bucket::Low,
            claim_type: "accident",
            fraud_score,
        }
    }

    #[test]
    fn test_bucket_conditions() {
        assert!(rule_matches(&Rule::new("fraud", "high"), &ctx(0.9)));
        assert!(!rule_matches(&Rule::new("fraud", "high"), &ctx(0.5)));
        assert!(rule_matches(&Rule::new("severity", "mid"), &ctx(0.1)));
        assert!(!rule_matches(&Rule::new("severity", "medium"), &ctx(0.1)));
        assert!(rule_matches(&Rule::new("complexity", "low"), &ctx(0.1)));
        assert!(rule_matches(&Rule::new("claim_type", "accident"), &ctx(0.1)));
    }

    #[test]
    fn test_threshold_operators() {
        assert!(rule_matches(&Rule::fraud_threshold(">=", 0.5), &ctx(0.5)));
        assert!(!rule_matches(&Rule::fraud_threshold(">", 0.5), &ctx(0.5)));
        assert!(rule_matches(&Rule::fraud_threshold("<=", 0.5), &ctx(0.5)));
        assert!(!rule_matches(&Rule::fraud_threshold("<", 0.5), &ctx(0.5)));
        assert!(!rule_matches(&Rule::fraud_threshold("==", 0.5), &ctx(0.5)));
    }

    #[test]
    fn test_threshold_defaults() {
        let rule = Rule {
            condition_type: Some("fraud_threshold".to_string()),
            ..Default::default()
        };
        // >= 0.0 holds for any non-negative score
        assert!(rule_matches(&rule, &ctx(0.0)));
    }

    #[test]
    fn test_combined_dont_care() {
        assert!(rule_matches(&Rule::combined(None, None, None), &ctx(0.1)));
        assert!(rule_matches(&Rule::combined(Some(Bucket::Low), Some(Bucket::Mid), None), &ctx(0.1)));
        assert!(!rule_matches(&Rule::combined(Some(Bucket::Low), Some(Bucket::High), None), &ctx(0.1)));
    }

    #[test]
    fn test_unknown_condition_never_matches() {
        assert!(!rule_matches(&Rule::new("weather", "rain"), &ctx(0.1)));
        assert!(!rule_matches(&Rule::default(), &ctx(0.1)));
    }

    #[test]
    fn test_operator_parse_error() {
        let err = "=>".parse::<ThresholdOperator>().unwrap_err();
        assert!(err.to_string().contains("=>"));
    }

    #[test]
    fn test_rules_file_errors_keep_io_cause() {
        match load_rules_file(Path::new("/nonexistent/routing-rules.json")) {
            Err(RoutingError::RulesFile { path, source }) => {
                assert_eq!(path, "/nonexistent/routing-rules.json");
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("Unexpected result: {:?}", other),
        }

        let dir = std::env::temp_dir();
        match load_rules_file(&dir) {
            Err(err @ RoutingError::RulesFile { .. }) => {
                let source = std::error::Error::source(&err).map(|e| e.to_string());
                assert!(source.is_some());
                assert!(err.to_string().contains(&dir.display().to_string()));
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }
}
