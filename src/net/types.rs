//! Wire DTOs for the backend's auth and session-history payloads.
//!
//! DESIGN
//! ======
//! These types mirror the backend's JSON shapes with `#[serde(default)]` on
//! every optional column so schema drift degrades to absent fields instead
//! of failed deserialization.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Identity projected from the remote auth service.
///
/// Replaced wholesale on every auth event; never mutated in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque backend user id (UUID string).
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Display name from the provider's profile metadata, if any.
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl User {
    /// Display-name fallback chain: full name, then email, then `"User"`.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("User")
    }
}

/// An authenticated backend session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Expiry as seconds since the Unix epoch, used to schedule refresh.
    #[serde(default)]
    pub expires_at: Option<f64>,
    pub user: User,
}

/// One persisted session-history row, mirrored locally read-only.
///
/// `session_end` absent means the session is still open.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub user_id: String,
    /// ISO-8601 timestamp set at creation.
    pub session_start: String,
    #[serde(default)]
    pub session_end: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}
