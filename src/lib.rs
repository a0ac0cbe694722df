//! shelfkeeper - Catalog and lending manager for a small library
//!
//! Keeps a catalog of books and a directory of users in memory, lends
//! books out and takes them back, and persists everything to a single JSON
//! file.
//!
//! # Architecture
//!
//! - Books and users live in insertion-ordered stores keyed by ISBN / user id
//! - Borrow/return is a two-state machine on each book's `borrowed` flag
//! - Adding and removing books requires an `Admin` actor, passed explicitly
//!   as a [`Session`]
//! - Every operation is synchronous and either fully succeeds or changes
//!   nothing
//!
//! # Modules
//!
//! - `domain`: Data structures (Book, User)
//! - `core`: Stores, lending, access guard, persistence, facade
//! - `config`: Data file and bootstrap user resolution
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Seed a data file with the default users
//! shelfkeeper init
//!
//! # Add a book as an admin
//! shelfkeeper --user U1 --password admin123 add printed 111 "Dune" "Frank Herbert" 412
//!
//! # Borrow it as a member
//! shelfkeeper --user U2 borrow 111
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use crate::core::{
    Catalog, Directory, Entity, Library, LibraryError, LoadMode, LoanReceipt, ReturnOutcome,
    Session, Snapshot,
};
pub use crate::domain::{Book, BookKind, LoanState, Role, User};
