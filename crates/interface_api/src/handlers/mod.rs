//! Request handlers

pub mod health;
pub mod claims;
pub mod rules;
pub mod status;
