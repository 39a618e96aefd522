//! Core Kernel - Foundational types for the claims triage system
//!
//! This crate provides the building blocks shared by the routing domain and
//! the HTTP layer:
//! - Strongly-typed identifiers
//! - The common error type

pub mod identifiers;
pub mod error;

pub use identifiers::{ClaimId, BatchId};
pub use error::CoreError;
