//! Domain types for the library.
//!
//! This module contains the core data structures:
//! - Book: Catalog record with its variant (base, printed, digital)
//! - User: Directory record with role and optional credential

pub mod book;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookKind, LoanState};
pub use user::{Role, User};
