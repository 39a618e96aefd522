//! Signal categorization
//!
//! Maps raw model signals onto three ordinal buckets. Every input maps to
//! exactly one bucket; nothing is rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound (inclusive) of the low fraud bucket
pub const FRAUD_LOW_MAX: f64 = 0.33;
/// Upper bound (inclusive) of the mid fraud bucket
pub const FRAUD_MID_MAX: f64 = 0.67;
/// Upper bound (inclusive) of the low complexity bucket
pub const COMPLEXITY_LOW_MAX: f64 = 2.0;
/// Upper bound (inclusive) of the mid complexity bucket
pub const COMPLEXITY_MID_MAX: f64 = 3.5;

/// Coarse ordinal category of a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Low,
    Mid,
    High,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Low => "low",
            Bucket::Mid => "mid",
            Bucket::High => "high",
        }
    }

    fn from_bounds(value: f64, low_max: f64, mid_max: f64) -> Self {
        if value.is_nan() || value <= low_max {
            Bucket::Low
        } else if value <= mid_max {
            Bucket::Mid
        } else {
            Bucket::High
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buckets a fraud probability. NaN is treated as no signal.
pub fn categorize_fraud(score: f64) -> Bucket {
    Bucket::from_bounds(score, FRAUD_LOW_MAX, FRAUD_MID_MAX)
}

/// Buckets a severity label, case-insensitively. Unknown or empty labels are low.
pub fn categorize_severity(label: &str) -> Bucket {
    match label.to_lowercase().as_str() {
        "high" => Bucket::High,
        "medium" => Bucket::Mid,
        _ => Bucket::Low,
    }
}

/// Buckets a complexity score. NaN is treated as no signal.
pub fn categorize_complexity(score: f64) -> Bucket {
    Bucket::from_bounds(score, COMPLEXITY_LOW_MAX, COMPLEXITY_MID_MAX)
}

/// The three buckets derived from one signal bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedSignals {
    pub fraud_category: Bucket,
    pub severity_category: Bucket,
    pub complexity_category: Bucket,
}

impl CategorizedSignals {
    /// Categorizes raw signals
    pub fn categorize(fraud_score: f64, severity_level: &str, complexity_score: f64) -> Self {
        Self {
            fraud_category: categorize_fraud(fraud_score),
            severity_category: categorize_severity(severity_level),
            complexity_category: categorize_complexity(complexity_score),
        }
    }
}

/// Handling department derived from the claim category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Department {
    Health,
    Accident,
}

impl Department {
    /// `medical` and `health` go to the health department; everything else is accident
    pub fn for_category(claim_category: &str) -> Self {
        match claim_category {
            "medical" | "health" => Department::Health,
            _ => Department::Accident,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Department::Health => "Health Dept",
            Department::Accident => "Accident Dept",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const ACCIDENT_PRIMARY: &[&str] = &[
    "accident claim form",
    "police report",
    "loss/assessment report",
    "registration",
    "rear collision",
    "vehicle",
];
const ACCIDENT_SECONDARY: &[&str] = &["registration: ", "rear", "bumper", "garage", "repair"];
const HEALTH_PRIMARY: &[&str] = &["hospital", "diagnosis", "medical", "treatment", "admission"];
const HEALTH_SECONDARY: &[&str] = &["hospitalization", "surgery", "outpatient", "medical", "diagnosis"];

/// Guesses the claim category from document text
///
/// Keyword scoring over the combined texts. Returns `"accident"` or
/// `"health"`; ties and texts with no signal resolve to `"accident"`.
pub fn detect_category<'a, I>(texts: I) -> &'static str
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let combined = texts
        .into_iter()
        .map(|t| t.unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| combined.contains(w));

    let mut accident = 0.0;
    let mut health = 0.0;

    if has(ACCIDENT_PRIMARY) {
        accident += 2.0;
    }
    if has(ACCIDENT_SECONDARY) {
        accident += 1.0;
    }
    if has(HEALTH_PRIMARY) {
        health += 2.0;
    }
    if has(HEALTH_SECONDARY) {
        health += 1.5;
    }
    if has(&["rear collision"]) {
        accident += 1.5;
    }

    if health > accident {
        "health"
    } else {
        "accident"
    }
}
