//! Current-actor context.
//!
//! A session is an explicit value handed to every guarded call, so separate
//! sessions (or tests) never share an actor slot.

use crate::domain::User;

/// Who is acting, if anyone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    actor: Option<User>,
}

impl Session {
    /// A session with no actor
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session acting as `user`. No credential check is made here; use
    /// [`Library::login`](super::Library::login) to authenticate first.
    pub fn as_user(user: User) -> Self {
        Self { actor: Some(user) }
    }

    /// The current actor
    pub fn actor(&self) -> Option<&User> {
        self.actor.as_ref()
    }

    /// Replace the current actor
    pub fn login(&mut self, user: User) {
        self.actor = Some(user);
    }

    /// Clear the current actor
    pub fn logout(&mut self) {
        self.actor = None;
    }
}
