//! Engine configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use core_kernel::CoreError;

use crate::dataflow::{NullDataflow, RoutingDataflow, StreamingDataflow};

/// Entries kept in each recent-activity ring buffer
pub const DEFAULT_RECENT_CAPACITY: usize = 200;
/// Buffered events per streaming subscriber
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// How routing events leave the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataflowMode {
    #[default]
    Streaming,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub recent_capacity: usize,
    pub dataflow: DataflowMode,
    pub event_capacity: usize,
    /// JSON file of rules loaded at startup
    pub rules_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recent_capacity: DEFAULT_RECENT_CAPACITY,
            dataflow: DataflowMode::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
            rules_path: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.recent_capacity == 0 {
            return Err(CoreError::configuration("recent_capacity must be greater than zero"));
        }
        if self.dataflow == DataflowMode::Streaming && self.event_capacity == 0 {
            return Err(CoreError::configuration("event_capacity must be greater than zero"));
        }
        Ok(())
    }

    /// Builds the dataflow selected by `dataflow`
    pub fn build_dataflow(&self) -> Arc<dyn RoutingDataflow> {
        match self.dataflow {
            DataflowMode::Streaming => Arc::new(StreamingDataflow::new(self.event_capacity)),
            DataflowMode::Fallback => Arc::new(NullDataflow),
        }
    }
}
