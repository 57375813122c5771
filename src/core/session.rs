use crate::domain::ports::AuthService;
use crate::domain::session::{AuthUser, SessionState};
use crate::utils::error::{AdminError, Result};
use std::sync::Arc;
use tokio::sync::watch;

/// Shared, observable "who is signed in" cell.
///
/// Clones share the same cell. Views hold a clone and either read the current
/// state or [`subscribe`](SessionHandle::subscribe) to changes; only the
/// [`SessionManager`] writes to it.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: Arc<watch::Sender<SessionState>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.tx.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().user.is_some()
    }

    pub fn require_user(&self) -> Result<AuthUser> {
        self.current_user().ok_or(AdminError::NotAuthenticated)
    }

    fn publish(&self, user: Option<AuthUser>) {
        self.tx.send_replace(SessionState {
            user,
            loading: false,
        });
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SessionManager<A: AuthService> {
    auth: A,
    session: SessionHandle,
}

impl<A: AuthService> SessionManager<A> {
    pub fn new(auth: A, session: SessionHandle) -> Self {
        Self { auth, session }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Signs in and publishes the user. Any failure is reported as the generic
    /// [`AdminError::Auth`]; the provider detail only goes to the log.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        match self.auth.sign_in(email, password).await {
            Ok(user) => {
                tracing::info!(email = %user.email, "Signed in");
                self.session.publish(Some(user.clone()));
                Ok(user)
            }
            Err(e) => {
                tracing::error!(error = %e, "Sign-in failed");
                self.session.publish(None);
                Err(AdminError::Auth)
            }
        }
    }

    pub fn sign_out(&self) {
        if let Some(user) = self.session.current_user() {
            tracing::info!(email = %user.email, "Signed out");
        }
        self.session.publish(None);
    }

    /// Marks the session as resolved with nobody signed in.
    pub fn resolve_signed_out(&self) {
        self.session.publish(None);
    }
}
