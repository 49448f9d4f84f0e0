//! Business logic and repository trait definitions for threadchat.
//!
//! This crate defines the "ports" (repository and backend traits) that the
//! infrastructure layer implements, plus the exchange flow built on them.
//! It depends only on `threadchat-types` -- never on `threadchat-infra` or
//! any database/HTTP crate.

pub mod backend;
pub mod conversation;
pub mod exchange;
pub mod identity;
pub mod message;

#[cfg(test)]
pub(crate) mod testing;
