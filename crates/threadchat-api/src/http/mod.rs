//! HTTP layer for threadchat.
//!
//! Axum server rendering the conversation page with minijinja, a JSON
//! mirror at `/api/v1/` using the envelope response format, and CORS.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod render;
pub mod response;
pub mod router;
