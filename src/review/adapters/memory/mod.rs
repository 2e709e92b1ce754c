//! In-memory adapters for reviewer assignment.

mod repository;

pub use repository::InMemoryReviewRepository;
