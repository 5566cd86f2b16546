use campusdesk_core::users::CurrentUser;

/// An authenticated back-office session.
///
/// The token is sent as a bearer header on every request; the user decides
/// which payment classifications the services allow.
#[derive(Clone)]
pub struct Session {
    pub access_token: String,
    pub user: CurrentUser,
}

impl Session {
    pub fn new(access_token: impl Into<String>, user: CurrentUser) -> Self {
        Self {
            access_token: access_token.into(),
            user,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}
