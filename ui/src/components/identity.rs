use dioxus::prelude::*;

use orderdesk_common::session::{IdentityProvider, Session};

/// localStorage key holding the signed-in session.
const SESSION_KEY: &str = "orderdesk_session";

/// Identity provider backed by browser storage.
///
/// Holds only the session marker; credentials are never seen by the app.
#[derive(Clone, Debug, Default)]
pub struct LocalIdentity {
    session: Option<Session>,
}

impl LocalIdentity {
    /// Restore a session saved by an earlier visit.
    pub fn load() -> Self {
        let session = storage::read(SESSION_KEY).and_then(|json| {
            serde_json::from_str(&json)
                .map_err(|e| tracing::warn!("Discarding unreadable session: {e}"))
                .ok()
        });
        Self { session }
    }
}

impl IdentityProvider for LocalIdentity {
    fn current_session(&self) -> Option<Session> {
        self.session.clone()
    }

    fn sign_in(&mut self, email: &str) -> Option<Session> {
        let email = email.trim();
        if !is_plausible_email(email) {
            return None;
        }
        let session = Session {
            user_id: email.to_lowercase(),
            email: email.to_string(),
        };
        match serde_json::to_string(&session) {
            Ok(json) => storage::write(SESSION_KEY, &json),
            Err(e) => tracing::warn!("Session not saved: {e}"),
        }
        tracing::info!("Signed in as {}", session.email);
        self.session = Some(session.clone());
        Some(session)
    }

    fn sign_out(&mut self) {
        storage::remove(SESSION_KEY);
        if let Some(session) = self.session.take() {
            tracing::info!("Signed out {}", session.email);
        }
    }
}

pub fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((user, domain)) => !user.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    }
}

pub fn use_identity() -> Signal<LocalIdentity> {
    use_context::<Signal<LocalIdentity>>()
}

#[cfg(target_family = "wasm")]
mod storage {
    fn local_storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    pub fn read(key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok()?
    }

    pub fn write(key: &str, value: &str) {
        if let Some(storage) = local_storage() {
            if storage.set_item(key, value).is_err() {
                tracing::warn!("Failed to write {key} to localStorage");
            }
        }
    }

    pub fn remove(key: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}

#[cfg(not(target_family = "wasm"))]
mod storage {
    pub fn read(_key: &str) -> Option<String> {
        None
    }

    pub fn write(_key: &str, _value: &str) {}

    pub fn remove(_key: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_check() {
        assert!(is_plausible_email("kitchen@example.com"));
        assert!(!is_plausible_email("kitchen"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("kitchen@localhost"));
        assert!(!is_plausible_email("kitchen@example."));
    }

    #[test]
    fn sign_in_then_out() {
        let mut identity = LocalIdentity::default();
        assert!(identity.sign_in("not-an-email").is_none());
        assert!(identity.current_session().is_none());

        let session = identity.sign_in("  Kitchen@Example.com ").unwrap();
        assert_eq!(session.user_id, "kitchen@example.com");
        assert_eq!(session.email, "Kitchen@Example.com");
        assert_eq!(identity.current_session(), Some(session));

        identity.sign_out();
        assert!(identity.current_session().is_none());
    }
}
