//! Session models.

use serde::{Deserialize, Serialize};
use strum::Display;

use super::credential::Credential;

/// Profile of the signed-in user as returned by `/me/`.
///
/// Replaced wholesale on every fetch or update, never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Not every backend echoes the id back.
    #[serde(default)]
    pub id: Option<u64>,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Authentication lifecycle.
///
/// ```text
/// Anonymous ──login/register──▶ Authenticating ──ok──▶ Authenticated
///     ▲                              │                      │
///     └──────────── failure ─────────┘◀──────── logout ─────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated,
}

/// Explicit session context handed to the coordinator and gateway instead
/// of any ambient global.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub state: SessionState,
    pub credential: Option<Credential>,
    pub profile: Option<UserProfile>,
}

impl SessionContext {
    /// Context for a freshly restored or obtained credential.
    pub fn authenticated(credential: Credential) -> Self {
        Self {
            state: SessionState::Authenticated,
            credential: Some(credential),
            profile: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated && self.credential.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_without_id() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"username":"ana","email":"ana@example.com"}"#).unwrap();
        assert_eq!(profile.id, None);
        assert_eq!(profile.username, "ana");
    }

    #[test]
    fn test_default_context_is_anonymous() {
        let ctx = SessionContext::default();
        assert_eq!(ctx.state, SessionState::Anonymous);
        assert!(!ctx.is_authenticated());

        let ctx = SessionContext::authenticated(Credential::new("t"));
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.state.to_string(), "Authenticated");
    }
}
