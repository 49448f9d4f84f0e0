//! Message validation and persistence.

pub mod repository;
pub mod store;
