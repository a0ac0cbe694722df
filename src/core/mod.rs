//! Core library logic.
//!
//! This module contains:
//! - Catalog: Books keyed by ISBN
//! - Directory: Users keyed by id
//! - Lending: Borrow/return transitions on the catalog
//! - Access: Role guard for catalog mutation
//! - Snapshot: JSON persistence
//! - Library: Facade tying the above together

pub mod access;
pub mod catalog;
pub mod directory;
pub mod error;
pub mod lending;
pub mod library;
pub mod session;
pub mod snapshot;

// Re-export commonly used types
pub use catalog::Catalog;
pub use directory::Directory;
pub use error::{Entity, LibraryError};
pub use lending::{LoanReceipt, ReturnOutcome};
pub use library::Library;
pub use session::Session;
pub use snapshot::{LoadMode, Snapshot, DEFAULT_DATA_FILE};
