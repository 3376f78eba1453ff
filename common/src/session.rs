use serde::{Deserialize, Serialize};

/// Path of the login entry point.
pub const LOGIN_ROUTE: &str = "/login";

/// Marker for an authenticated user. Issued and revoked by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
}

/// Source of truth for whether someone is signed in.
pub trait IdentityProvider {
    fn current_session(&self) -> Option<Session>;

    fn sign_in(&mut self, email: &str) -> Option<Session>;

    fn sign_out(&mut self);
}

/// What the gate does for the current visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Render(Session),
    Redirect(&'static str),
}

/// Render protected content only when a session is present.
pub fn gate(session: Option<Session>) -> GateDecision {
    match session {
        Some(session) => GateDecision::Render(session),
        None => GateDecision::Redirect(LOGIN_ROUTE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_session_redirects_to_login() {
        assert_eq!(gate(None), GateDecision::Redirect("/login"));
    }

    #[test]
    fn session_renders() {
        let session = Session {
            user_id: "u1".into(),
            email: "kitchen@example.com".into(),
        };
        assert_eq!(gate(Some(session.clone())), GateDecision::Render(session));
    }
}
