//! Shared domain types for threadchat.
//!
//! This crate contains the core domain types used across the workspace:
//! Conversation, Message, their error types, and configuration.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod conversation;
pub mod error;
pub mod message;
