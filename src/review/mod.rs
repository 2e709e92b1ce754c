//! Reviewer assignment for pull requests.
//!
//! Teams register their members; opening a pull request assigns up to two
//! active teammates of the author at random, and reviewers can later be
//! swapped for another eligible teammate until the pull request is merged.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
