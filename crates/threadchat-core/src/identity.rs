//! Thread token generation.
//!
//! The thread token is the correlation key the remote chat backend uses to
//! keep its own per-conversation context.

use uuid::Uuid;

/// Generate a fresh thread token.
///
/// A random (v4) UUID rendered as hyphenated text. Carries no timestamp.
pub fn generate_thread_id() -> String {
    Uuid::new_v4().to_string()
}
