//! Rota: reviewer assignment for pull requests.
//!
//! Teams register their members, pull requests get up to two active
//! teammates of the author as reviewers, and reviewers can be swapped for
//! another eligible teammate until the pull request is merged.
//!
//! The [`review`] module holds the domain, ports, adapters and services;
//! [`http`] exposes them as a JSON API; [`config`] and [`bootstrap`] prepare
//! the `rota_server` binary.

pub mod bootstrap;
pub mod config;
pub mod http;
pub mod review;
