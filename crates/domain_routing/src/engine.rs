//! Claim routing engine
//!
//! The orchestrator: builds the signal bundle, categorizes it, takes one
//! policy snapshot, runs the selected strategy and composes the result.
//! Shared mutable state is limited to the policy store and the bounded
//! recent-activity buffers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::{debug, info};

use core_kernel::{BatchId, CoreError};

use crate::category::{detect_category, CategorizedSignals};
use crate::config::EngineConfig;
use crate::dataflow::RoutingDataflow;
use crate::events::RoutingEvent;
use crate::policy_store::{PolicySnapshot, PolicyStore};
use crate::routing::{route_departmental, RoutingDecision, RoutingStrategy};
use crate::rule::Rule;
use crate::signals::{ClaimData, ClaimSignals, MlScores, SignalBundle};
use crate::triage::{triage, TriageInput, TriageResult};

/// Reason recorded when triage finds nothing to escalate
const FAST_TRACK_REASON: &str = "No risk indicators found";

/// One claim as submitted for routing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimSubmission {
    #[serde(default)]
    pub claim_data: ClaimData,
    #[serde(default)]
    pub ml_scores: MlScores,
    #[serde(default)]
    pub strategy: RoutingStrategy,
    /// Document context for the triage strategy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triage: Option<TriageInput>,
}

/// Signal bundle augmented with its routing decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRoutingResult {
    #[serde(flatten)]
    pub signals: SignalBundle,
    #[serde(flatten)]
    pub routing: RoutingDecision,
    #[serde(flatten)]
    pub categories: CategorizedSignals,
    pub rules_version: u64,
    pub strategy: RoutingStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triage: Option<TriageResult>,
}

/// A rerouted claim: the caller's record with fresh routing fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReroutedClaim {
    #[serde(flatten)]
    pub claim: ClaimSignals,
    #[serde(flatten)]
    pub routing: RoutingDecision,
    #[serde(flatten)]
    pub categories: CategorizedSignals,
    /// Always departmental; earlier triage output is dropped
    pub strategy: RoutingStrategy,
    pub rules_version: u64,
    pub rerouted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestRecord {
    pub claim_number: String,
    pub ingested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub claim_number: String,
    pub routing_team: String,
    pub adjuster: String,
    pub processed_at: DateTime<Utc>,
}

/// Engine summary for monitoring; the recent lists are oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub rules_version: u64,
    pub rules_count: usize,
    pub dataflow: String,
    pub recent_ingested: Vec<IngestRecord>,
    pub recent_results: Vec<ResultRecord>,
}

#[derive(Debug)]
struct RecentActivity {
    capacity: usize,
    ingested: VecDeque<IngestRecord>,
    results: VecDeque<ResultRecord>,
}

impl RecentActivity {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ingested: VecDeque::with_capacity(capacity),
            results: VecDeque::with_capacity(capacity),
        }
    }

    fn push_bounded<T>(buffer: &mut VecDeque<T>, capacity: usize, item: T) {
        if buffer.len() == capacity {
            buffer.pop_front();
        }
        buffer.push_back(item);
    }

    fn record_ingest(&mut self, record: IngestRecord) {
        Self::push_bounded(&mut self.ingested, self.capacity, record);
    }

    fn record_result(&mut self, record: ResultRecord) {
        Self::push_bounded(&mut self.results, self.capacity, record);
    }
}

/// The claim routing and triage engine
///
/// Constructed explicitly and shared behind an `Arc`; every operation takes
/// `&self` and is safe to call from many threads at once.
pub struct ClaimRoutingEngine {
    policies: PolicyStore,
    dataflow: Arc<dyn RoutingDataflow>,
    activity: Mutex<RecentActivity>,
}

impl std::fmt::Debug for ClaimRoutingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimRoutingEngine")
            .field("policies", &self.policies)
            .field("dataflow", &self.dataflow.name())
            .finish_non_exhaustive()
    }
}

impl ClaimRoutingEngine {
    /// Creates an engine with the dataflow selected in `config`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid
    pub fn new(config: &EngineConfig) -> Result<Self, CoreError> {
        Self::with_dataflow(config, config.build_dataflow())
    }

    pub fn with_dataflow(config: &EngineConfig, dataflow: Arc<dyn RoutingDataflow>) -> Result<Self, CoreError> {
        config.validate()?;
        info!(
            dataflow = dataflow.name(),
            recent_capacity = config.recent_capacity,
            "Initialized claim routing engine"
        );

        Ok(Self {
            policies: PolicyStore::new(),
            dataflow,
            activity: Mutex::new(RecentActivity::new(config.recent_capacity)),
        })
    }

    /// Routes a claim with the departmental strategy
    pub fn ingest_claim(&self, claim_data: &ClaimData, ml_scores: &MlScores) -> ClaimRoutingResult {
        self.record_ingest(claim_data);
        let snapshot = self.policies.snapshot();
        let signals = SignalBundle::from_submission(claim_data, ml_scores);
        let categories = signals.categorize();
        let routing = route_departmental(&signals, &categories, &snapshot);

        self.complete(ClaimRoutingResult {
            signals,
            routing,
            categories,
            rules_version: snapshot.version(),
            strategy: RoutingStrategy::Departmental,
            triage: None,
        })
    }

    /// Routes a claim with the triage strategy
    ///
    /// A missing claim category is detected from the narrative document
    /// texts.
    pub fn triage_claim(&self, claim_data: &ClaimData, ml_scores: &MlScores, input: &TriageInput) -> ClaimRoutingResult {
        self.record_ingest(claim_data);
        let snapshot = self.policies.snapshot();

        let mut scores = ml_scores.clone();
        if scores.claim_category.is_none() {
            let detected = detect_category(input.documents.narrative_texts());
            scores.claim_category = Some(detected.to_string());
        }

        let signals = SignalBundle::from_submission(claim_data, &scores);
        let categories = signals.categorize();
        let outcome = triage(&signals, &categories, input);
        let routing_reason = if outcome.reasons.is_empty() {
            FAST_TRACK_REASON.to_string()
        } else {
            outcome.reasons.join("; ")
        };
        let routing = RoutingDecision {
            routing_team: outcome.routing_team.clone(),
            adjuster: outcome.adjuster.clone(),
            routing_reason,
            rule_applied: true,
        };

        self.complete(ClaimRoutingResult {
            signals,
            routing,
            categories,
            rules_version: snapshot.version(),
            strategy: RoutingStrategy::Triage,
            triage: Some(outcome),
        })
    }

    /// Routes a submission with the strategy it names
    pub fn submit(&self, submission: &ClaimSubmission) -> ClaimRoutingResult {
        match submission.strategy {
            RoutingStrategy::Departmental => self.ingest_claim(&submission.claim_data, &submission.ml_scores),
            RoutingStrategy::Triage => {
                let default_input = TriageInput::default();
                let input = submission.triage.as_ref().unwrap_or(&default_input);
                self.triage_claim(&submission.claim_data, &submission.ml_scores, input)
            }
        }
    }

    /// Replaces the whole rule set; returns the new version
    pub fn ingest_rules(&self, rules: Vec<Rule>) -> u64 {
        let rules_count = rules.len();
        let rules_version = self.policies.replace(rules);

        self.dataflow.publish(RoutingEvent::RulesReplaced {
            rules_version,
            rules_count,
            timestamp: Utc::now(),
        });
        rules_version
    }

    /// Re-evaluates earlier claims against the current policy
    ///
    /// The whole batch sees one snapshot. Each claim is routed
    /// departmentally and stamped with its recompute time.
    pub fn reroute_claims(&self, claims: Vec<ClaimSignals>) -> Vec<ReroutedClaim> {
        let snapshot = self.policies.snapshot();
        let batch_id = BatchId::new_v7();

        let rerouted: Vec<ReroutedClaim> = claims
            .into_iter()
            .map(|claim| self.reroute_one(claim.without_result_fields(), &snapshot))
            .collect();

        info!(
            %batch_id,
            claims = rerouted.len(),
            rules_version = snapshot.version(),
            "Rerouted claims"
        );
        self.dataflow.publish(RoutingEvent::ClaimsRerouted {
            batch_id,
            claims: rerouted.len(),
            rules_version: snapshot.version(),
            timestamp: Utc::now(),
        });
        rerouted
    }

    fn reroute_one(&self, claim: ClaimSignals, snapshot: &PolicySnapshot) -> ReroutedClaim {
        let signals = SignalBundle::from_signals(&claim);
        let categories = signals.categorize();
        let routing = route_departmental(&signals, &categories, snapshot);
        let rerouted_at = Utc::now();

        self.activity().record_result(ResultRecord {
            claim_number: signals.claim_number.clone(),
            routing_team: routing.routing_team.clone(),
            adjuster: routing.adjuster.clone(),
            processed_at: rerouted_at,
        });

        ReroutedClaim {
            claim,
            routing,
            categories,
            strategy: RoutingStrategy::Departmental,
            rules_version: snapshot.version(),
            rerouted_at,
        }
    }

    pub fn status(&self) -> EngineStatus {
        let policy = self.policies.status();
        let activity = self.activity();

        EngineStatus {
            rules_version: policy.rules_version,
            rules_count: policy.rules_count,
            dataflow: self.dataflow.name().to_string(),
            recent_ingested: activity.ingested.iter().cloned().collect(),
            recent_results: activity.results.iter().cloned().collect(),
        }
    }

    pub fn policy_snapshot(&self) -> PolicySnapshot {
        self.policies.snapshot()
    }

    /// Live routing events, when the dataflow streams
    pub fn subscribe(&self) -> Option<broadcast::Receiver<RoutingEvent>> {
        self.dataflow.subscribe()
    }

    pub fn dataflow_name(&self) -> &'static str {
        self.dataflow.name()
    }

    fn record_ingest(&self, claim_data: &ClaimData) {
        self.activity().record_ingest(IngestRecord {
            claim_number: claim_data
                .claim_number
                .clone()
                .unwrap_or_else(|| crate::signals::UNKNOWN_CLAIM_NUMBER.to_string()),
            ingested_at: Utc::now(),
        });
    }

    fn complete(&self, result: ClaimRoutingResult) -> ClaimRoutingResult {
        debug!(
            claim_number = %result.signals.claim_number,
            routing_team = %result.routing.routing_team,
            strategy = ?result.strategy,
            "Claim routed"
        );

        self.activity().record_result(ResultRecord {
            claim_number: result.signals.claim_number.clone(),
            routing_team: result.routing.routing_team.clone(),
            adjuster: result.routing.adjuster.clone(),
            processed_at: Utc::now(),
        });
        self.dataflow.publish(RoutingEvent::ClaimRouted {
            claim_id: result.signals.claim_id.clone(),
            claim_number: result.signals.claim_number.clone(),
            routing_team: result.routing.routing_team.clone(),
            adjuster: result.routing.adjuster.clone(),
            strategy: result.strategy,
            rules_version: result.rules_version,
            timestamp: result.signals.timestamp,
        });
        result
    }

    // The buffers are observability only; a poisoned lock keeps serving them.
    fn activity(&self) -> MutexGuard<'_, RecentActivity> {
        self.activity.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
