//! Routing events
//!
//! Emitted by the engine after each state change or decision and handed to
//! the configured dataflow. Events are notifications only; nothing in the
//! engine reads them back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::BatchId;

use crate::routing::RoutingStrategy;

/// Events published by the routing engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoutingEvent {
    /// A claim received a routing decision
    ClaimRouted {
        claim_id: String,
        claim_number: String,
        routing_team: String,
        adjuster: String,
        strategy: RoutingStrategy,
        rules_version: u64,
        timestamp: DateTime<Utc>,
    },

    /// The rule set was replaced
    RulesReplaced {
        rules_version: u64,
        rules_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A batch of claims was re-evaluated
    ClaimsRerouted {
        batch_id: BatchId,
        claims: usize,
        rules_version: u64,
        timestamp: DateTime<Utc>,
    },
}

impl RoutingEvent {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            RoutingEvent::ClaimRouted { timestamp, .. } => *timestamp,
            RoutingEvent::RulesReplaced { timestamp, .. } => *timestamp,
            RoutingEvent::ClaimsRerouted { timestamp, .. } => *timestamp,
        }
    }

    /// Rules version in force when the event was raised
    pub fn rules_version(&self) -> u64 {
        match self {
            RoutingEvent::ClaimRouted { rules_version, .. } => *rules_version,
            RoutingEvent::RulesReplaced { rules_version, .. } => *rules_version,
            RoutingEvent::ClaimsRerouted { rules_version, .. } => *rules_version,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            RoutingEvent::ClaimRouted { .. } => "ClaimRouted",
            RoutingEvent::RulesReplaced { .. } => "RulesReplaced",
            RoutingEvent::ClaimsRerouted { .. } => "ClaimsRerouted",
        }
    }
}
