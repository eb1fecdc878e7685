/// Opaque authenticated identity. The rest of the app only ever checks that
/// one is present and reads the user id out of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
}

/// Seam over the identity provider. The hosted service hands out sessions on
/// its own schedule; here the consumer only needs "who, if anyone, is signed
/// in right now".
pub trait SessionProvider {
    fn current(&self) -> Option<Session>;
}

/// Identity fixed at startup (from config or `--user`), or none at all.
#[derive(Clone, Debug, Default)]
pub struct FixedSessionProvider {
    session: Option<Session>,
}

impl FixedSessionProvider {
    pub fn new(user_id: Option<String>) -> Self {
        Self {
            session: user_id.map(|user_id| Session { user_id }),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }
}

impl SessionProvider for FixedSessionProvider {
    fn current(&self) -> Option<Session> {
        self.session.clone()
    }
}
