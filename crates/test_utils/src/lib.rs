//! Test Utilities Crate
//!
//! Shared test infrastructure for the claim routing test suites.
//!
//! # Modules
//!
//! - `fixtures`: Ready-made claims, scores, documents and rule sets
//! - `builders`: Builders for submissions and triage inputs
//! - `assertions`: Assertion helpers for routing results
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
