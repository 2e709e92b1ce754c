//! `PostgreSQL` adapters for reviewer assignment persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresReviewRepository, ReviewPgPool};
