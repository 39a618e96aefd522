//! Rule ingestion DTOs

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct IngestRulesResponse {
    pub rules_version: u64,
}
