//! Claim Routing & Triage Domain
//!
//! This crate decides where an insurance claim goes once upstream extraction
//! and model scoring are done. It owns the only versioned state in the
//! triage system: the routing policy.
//!
//! # Decision Flow
//!
//! ```text
//! ClaimData + MlScores -> SignalBundle -> CategorizedSignals
//!                                            |
//!                  +-------------------------+-------------------------+
//!                  v                                                   v
//!        Departmental routing                      Triage (litigation, subrogation,
//!   (fraud override -> dept/level)                  fraud/total-loss precedence)
//!                  |                                                   |
//!                  +-------------> ClaimRoutingResult <----------------+
//! ```
//!
//! Policy updates replace the whole rule set and bump `rules_version`;
//! `reroute_claims` re-evaluates earlier claims against the current snapshot.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_routing::{ClaimRoutingEngine, EngineConfig, ClaimData, MlScores};
//!
//! let engine = ClaimRoutingEngine::new(&EngineConfig::default())?;
//! let result = engine.ingest_claim(&ClaimData::default(), &MlScores::default());
//! assert_eq!(result.routing.routing_team, "Accident Dept - Low");
//! ```

pub mod lenient;
pub mod signals;
pub mod category;
pub mod rule;
pub mod policy_store;
pub mod routing;
pub mod triage;
pub mod events;
pub mod dataflow;
pub mod config;
pub mod engine;
pub mod handle;
pub mod error;

pub use signals::{ClaimData, ClaimSignals, MlScores, SignalBundle};
pub use category::{Bucket, CategorizedSignals, Department, categorize_fraud, categorize_severity, categorize_complexity, detect_category};
pub use rule::{Rule, RuleCondition, RuleContext, RulePredicate, ConditionEvaluator, ThresholdOperator, rule_matches, parse_rules, load_rules_file};
pub use policy_store::{PolicyStore, PolicySnapshot, PolicyStatus};
pub use routing::{RoutingDecision, RoutingStrategy, HandlingLevel, route_departmental};
pub use triage::{DocumentFields, DocumentSet, MatchFeatures, TriageInput, TriageResult, TriageEvidence, TriageRouting, RiskAssessment, triage, assess_litigation, assess_subrogation, choose_routing};
pub use events::RoutingEvent;
pub use dataflow::{RoutingDataflow, StreamingDataflow, NullDataflow};
pub use config::{EngineConfig, DataflowMode};
pub use engine::{ClaimRoutingEngine, ClaimRoutingResult, ClaimSubmission, ReroutedClaim, EngineStatus, IngestRecord, ResultRecord};
pub use handle::EngineHandle;
pub use error::RoutingError;
