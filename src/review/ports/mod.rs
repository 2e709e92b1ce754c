//! Port contracts for reviewer assignment.
//!
//! Ports define infrastructure-agnostic interfaces used by review services.

pub mod repository;

pub use repository::{ReviewRepository, ReviewRepositoryError, ReviewRepositoryResult};
