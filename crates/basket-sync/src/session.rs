//! # Session State Machine
//!
//! The façade-level session: `Guest ⇄ Authenticating ⇄ Authenticated`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session Transitions                                │
//! │                                                                         │
//! │              login()                 remote fetch + merge OK            │
//! │   ┌────────┐ ──────► ┌──────────────┐ ──────► ┌───────────────┐        │
//! │   │ Guest  │         │Authenticating│         │ Authenticated │        │
//! │   └────────┘ ◄────── └──────────────┘ ◄────── └───────────────┘        │
//! │        ▲      fetch/merge failed          logout()                     │
//! │        │                                      │                        │
//! │        └──────────────────────────────────────┘                        │
//! │                                                                         │
//! │  Guest → Authenticated triggers EXACTLY ONE merge operation.           │
//! │  Authenticated → Guest clears the remote binding but preserves the     │
//! │  last-synced snapshot locally.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

/// The façade's session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Session {
    /// No account; operations act on the local store only.
    Guest,

    /// A login is in flight: the remote cart is being fetched and merged.
    /// Local mutations are still accepted and applied locally.
    Authenticating,

    /// Bound to an account; mutations are mirrored to the remote cart.
    Authenticated {
        /// Opaque account identifier the remote cart is bound to.
        account_id: String,
    },
}

impl Session {
    /// Whether mutations should be mirrored to the remote cart.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    /// Whether a login is currently in flight.
    pub fn is_authenticating(&self) -> bool {
        matches!(self, Session::Authenticating)
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::Guest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_predicates() {
        assert!(!Session::Guest.is_authenticated());
        assert!(!Session::Authenticating.is_authenticated());
        assert!(Session::Authenticating.is_authenticating());
        assert!(Session::Authenticated {
            account_id: "acct-1".into()
        }
        .is_authenticated());
    }

    #[test]
    fn test_default_is_guest() {
        assert_eq!(Session::default(), Session::Guest);
    }
}
