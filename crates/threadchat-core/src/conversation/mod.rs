//! Conversation lookup, creation and message listing.

pub mod repository;
pub mod store;
