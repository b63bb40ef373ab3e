//! Bearer-credential access for the remote note client.
//!
//! Credential issuance and storage belong to the embedding application. The
//! core only needs to read the current token and to ask the application to
//! log the user out when the remote store rejects it.

use std::sync::{Arc, RwLock};

/// The embedding application's view of the signed-in session.
pub trait SessionProvider: Send + Sync {
    /// Returns the current bearer token, or `None` when signed out.
    fn bearer_token(&self) -> Option<String>;

    /// Invalidates the session. Called once for every request the remote
    /// store answers with 401.
    fn force_logout(&self);
}

type LogoutHook = Box<dyn Fn() + Send + Sync>;

/// A process-local session holding the token in memory.
///
/// `force_logout` drops the token and then runs the optional logout hook,
/// which is where an application wires its own sign-out handling.
#[derive(Default)]
pub struct InMemorySession {
    token: RwLock<Option<String>>,
    on_logout: Option<LogoutHook>,
}

impl InMemorySession {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token),
            on_logout: None,
        }
    }

    /// Registers a callback invoked after the token has been cleared by a forced logout.
    #[must_use]
    pub fn with_logout_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_logout = Some(Box::new(hook));
        self
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.into());
    }

    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn is_signed_in(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    pub fn into_shared(self) -> Arc<dyn SessionProvider> {
        Arc::new(self)
    }
}

impl SessionProvider for InMemorySession {
    fn bearer_token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn force_logout(&self) {
        log::warn!("Session rejected by the note store; signing out");
        self.clear();
        if let Some(hook) = &self.on_logout {
            hook();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_force_logout_clears_token_and_runs_hook() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let session = InMemorySession::new(Some("abc".into()))
            .with_logout_hook(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        assert_eq!(session.bearer_token().as_deref(), Some("abc"));
        session.force_logout();
        assert!(!session.is_signed_in());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_set_token_signs_in() {
        let session = InMemorySession::default();
        assert!(session.bearer_token().is_none());
        session.set_token("fresh");
        assert_eq!(session.bearer_token().as_deref(), Some("fresh"));
    }
}
