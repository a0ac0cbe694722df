//! Error type shared by every core operation.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::Role;

/// Which keyed collection an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Book,
    User,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Book => write!(f, "Book"),
            Entity::User => write!(f, "User"),
        }
    }
}

/// Library operation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LibraryError {
    #[error("{entity} already exists: {id}")]
    DuplicateKey { entity: Entity, id: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: String },

    #[error("Book is already borrowed: {isbn}")]
    AlreadyBorrowed { isbn: String },

    #[error("Access denied: only {required} can perform this action (actor: {})", .actor.as_deref().unwrap_or("none"))]
    PermissionDenied {
        required: Role,
        actor: Option<String>,
    },

    #[error("Authentication failed for user: {user_id}")]
    AuthenticationFailed { user_id: String },

    #[error("Invalid record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("Cannot read library data from {}: {reason}", .path.display())]
    NotReadable { path: PathBuf, reason: String },

    #[error("Cannot write library data to {}: {reason}", .path.display())]
    NotWritable { path: PathBuf, reason: String },
}

impl LibraryError {
    pub(crate) fn book_not_found(isbn: &str) -> Self {
        Self::NotFound {
            entity: Entity::Book,
            id: isbn.to_string(),
        }
    }

    pub(crate) fn user_not_found(user_id: &str) -> Self {
        Self::NotFound {
            entity: Entity::User,
            id: user_id.to_string(),
        }
    }
}

pub type Result<T, E = LibraryError> = std::result::Result<T, E>;
