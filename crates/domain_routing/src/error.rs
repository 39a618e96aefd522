//! Routing domain errors

use thiserror::Error;

use core_kernel::CoreError;

/// Errors that can occur in the routing domain
///
/// Claim evaluation itself never fails; these cover engine lifecycle and
/// rule loading.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// The engine was never initialized, or initialization failed
    #[error("Routing engine unavailable")]
    Unavailable,

    #[error("Failed to read rules file {path}: {source}")]
    RulesFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse rules: {0}")]
    RulesParse(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
