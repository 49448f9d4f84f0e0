//! Infrastructure layer for threadchat.
//!
//! Contains implementations of the ports defined in `threadchat-core`:
//! SQLite storage for conversations and messages, the HTTP client for the
//! remote chat backend, and the configuration loader.

pub mod backend;
pub mod config;
pub mod sqlite;
