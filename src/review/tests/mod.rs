//! Unit tests for the review domain, reviewer selection and services.
