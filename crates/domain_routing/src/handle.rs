//! Engine handle
//!
//! Callers hold an `EngineHandle` rather than the engine itself. A handle
//! whose engine failed to initialize answers every operation with
//! `RoutingError::Unavailable`, so "engine down" is never confused with a
//! default routing.

use std::sync::Arc;
use tracing::{error, info};

use crate::config::EngineConfig;
use crate::engine::{ClaimRoutingEngine, ClaimRoutingResult, ClaimSubmission, EngineStatus, ReroutedClaim};
use crate::error::RoutingError;
use crate::rule::{load_rules_file, Rule};
use crate::signals::{ClaimData, ClaimSignals, MlScores};

#[derive(Debug, Clone, Default)]
pub struct EngineHandle {
    engine: Option<Arc<ClaimRoutingEngine>>,
}

impl EngineHandle {
    pub fn ready(engine: Arc<ClaimRoutingEngine>) -> Self {
        Self { engine: Some(engine) }
    }

    pub fn unavailable() -> Self {
        Self { engine: None }
    }

    /// Builds the engine and loads the configured initial rules
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration or an unreadable rules file; the
    /// caller decides whether to serve with an unavailable handle instead.
    pub fn try_initialize(config: &EngineConfig) -> Result<Self, RoutingError> {
        let engine = ClaimRoutingEngine::new(config)?;

        if let Some(path) = &config.rules_path {
            let rules = match load_rules_file(path) {
                Ok(rules) => rules,
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Failed to load initial rules");
                    return Err(e);
                }
            };
            let rules_version = engine.ingest_rules(rules);
            info!(path = %path.display(), rules_version, "Loaded initial rules");
        }

        Ok(Self::ready(Arc::new(engine)))
    }

    /// The engine, or `Unavailable`
    pub fn engine(&self) -> Result<&ClaimRoutingEngine, RoutingError> {
        self.engine.as_deref().ok_or(RoutingError::Unavailable)
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_some()
    }

    pub fn ingest_claim(&self, claim_data: &ClaimData, ml_scores: &MlScores) -> Result<ClaimRoutingResult, RoutingError> {
        Ok(self.engine()?.ingest_claim(claim_data, ml_scores))
    }

    pub fn submit(&self, submission: &ClaimSubmission) -> Result<ClaimRoutingResult, RoutingError> {
        Ok(self.engine()?.submit(submission))
    }

    pub fn ingest_rules(&self, rules: Vec<Rule>) -> Result<u64, RoutingError> {
        Ok(self.engine()?.ingest_rules(rules))
    }

    pub fn reroute_claims(&self, claims: Vec<ClaimSignals>) -> Result<Vec<ReroutedClaim>, RoutingError> {
        Ok(self.engine()?.reroute_claims(claims))
    }

    pub fn status(&self) -> Result<EngineStatus, RoutingError> {
        Ok(self.engine()?.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_unavailable_handle_fails_fast() {
        let handle = EngineHandle::unavailable();
        assert!(!handle.is_available());
        assert!(matches!(handle.ingest_rules(vec![]), Err(RoutingError::Unavailable)));
        assert!(matches!(handle.status(), Err(RoutingError::Unavailable)));
    }

    #[test]
    fn test_missing_rules_file_fails_initialization() {
        let config = EngineConfig {
            rules_path: Some(PathBuf::from("/nonexistent/routing-rules.json")),
            ..Default::default()
        };
        assert!(matches!(
            EngineHandle::try_initialize(&config),
            Err(RoutingError::RulesFile { .. })
        ));
    }

    #[test]
    fn test_initialized_handle_routes() {
        let handle = EngineHandle::try_initialize(&EngineConfig::default()).unwrap();
        let result = handle.ingest_claim(&ClaimData::default(), &MlScores::default()).unwrap();
        assert_eq!(result.routing.routing_team, "Accident Dept - Low");
    }
}
