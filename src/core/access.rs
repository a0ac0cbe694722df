//! Role check for catalog-mutating operations.
//!
//! The guard trusts the actor it is given; authentication happens once at
//! login (see [`Directory::authenticate`](super::Directory::authenticate)).

use super::error::{LibraryError, Result};
use crate::domain::{Role, User};

/// Fail unless `actor` is present and holds exactly `required`
pub fn require(actor: Option<&User>, required: Role) -> Result<()> {
    match actor {
        Some(user) if user.role == required => Ok(()),
        _ => Err(LibraryError::PermissionDenied {
            required,
            actor: actor.map(|u| u.user_id.clone()),
        }),
    }
}
