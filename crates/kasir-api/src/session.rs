//! # Session
//!
//! The authenticated operator session, passed explicitly to the client.
//!
//! ## Why Not Ambient State?
//! The original web frontend kept the auth token in browser-global storage
//! and read it ad hoc before every request. Here the session is an explicit
//! value injected at construction: there is exactly one place a token can
//! come from, and dropping the client ends its use.

use std::fmt;

// =============================================================================
// Session
// =============================================================================

/// Bearer-token session for the remote POS API.
///
/// Lifecycle is tied to login/logout in the surrounding application; this
/// crate only consumes it.
#[derive(Clone)]
pub struct Session {
    token: String,
}

impl Session {
    /// Creates a session from a raw bearer token.
    pub fn new(token: impl Into<String>) -> Self {
        Session {
            token: token.into(),
        }
    }

    /// The raw token, for the `Authorization: Bearer` header.
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Debug redacts the token so it never lands in logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("token", &"***").finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
