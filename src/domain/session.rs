use std::fmt;

/// A signed-in admin as reported by the auth service.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    /// Bearer credential for document-store requests.
    pub id_token: String,
}

impl fmt::Debug for AuthUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthUser")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("id_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<AuthUser>,
    /// True until the auth service has reported for the first time.
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}
