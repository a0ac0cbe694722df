//! Library facade.
//!
//! Owns one catalog and one directory and exposes the operations callers
//! (the CLI, or any embedding UI) work with. Catalog mutation goes through
//! the role guard; lending does not.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::access;
use super::catalog::Catalog;
use super::directory::Directory;
use super::error::{LibraryError, Result};
use super::lending::{LoanReceipt, ReturnOutcome};
use super::session::Session;
use super::snapshot::{LoadMode, Snapshot, DEFAULT_DATA_FILE};
use crate::domain::{Book, Role, User};

/// Catalog, directory and the data file they persist to
#[derive(Debug, Clone)]
pub struct Library {
    catalog: Catalog,
    directory: Directory,
    data_path: PathBuf,
}

impl Default for Library {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_FILE)
    }
}

impl Library {
    /// Create an empty library persisting to `data_path` by default
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog: Catalog::new(),
            directory: Directory::new(),
            data_path: data_path.into(),
        }
    }

    /// Open the library stored at `data_path`, or start empty if the file
    /// does not exist yet
    pub fn open(data_path: impl Into<PathBuf>) -> Result<Self> {
        let mut library = Self::new(data_path);
        if library.data_path.exists() {
            library.load_data(None, LoadMode::Replace)?;
        } else {
            debug!(path = %library.data_path.display(), "No data file yet, starting empty");
        }
        Ok(library)
    }

    /// Default accounts for a fresh library
    pub fn default_users() -> Vec<User> {
        vec![
            User::admin("U1", "Ravindra", "admin123"),
            User::member("U2", "Vinod"),
        ]
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Path used when `save_data`/`load_data` get no explicit path
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Authenticate against the directory and open a session for the user
    pub fn login(&self, user_id: &str, password: Option<&str>) -> Result<Session> {
        match self.directory.authenticate(user_id, password) {
            Ok(user) => {
                info!(user_id, role = %user.role, "Logged in");
                Ok(Session::as_user(user.clone()))
            }
            Err(e) => {
                warn!(user_id, error = %e, "Login refused");
                Err(e)
            }
        }
    }

    /// Add a book (admin only)
    pub fn add_book(&mut self, session: &Session, book: Book) -> Result<()> {
        self.guard(session, "add_book")?;
        let isbn = book.isbn.clone();
        self.catalog.add(book)?;
        info!(isbn = %isbn, "Book added");
        Ok(())
    }

    /// Remove a book (admin only), even if it is on loan
    pub fn remove_book(&mut self, session: &Session, isbn: &str) -> Result<Book> {
        self.guard(session, "remove_book")?;
        let book = self.catalog.remove(isbn)?;
        if book.borrowed {
            warn!(isbn, "Removed a book that was on loan");
        }
        info!(isbn, "Book removed");
        Ok(book)
    }

    /// Lend a book to a registered user
    pub fn borrow_book(&mut self, isbn: &str, user_id: &str) -> Result<LoanReceipt> {
        let borrower = self
            .directory
            .get(user_id)
            .map(|u| u.name.clone())
            .ok_or_else(|| LibraryError::user_not_found(user_id))?;

        let mut receipt = self.catalog.borrow(isbn, user_id)?;
        receipt.borrower = Some(borrower);
        info!(isbn, user_id, "Book borrowed");
        Ok(receipt)
    }

    /// Take a book back
    pub fn return_book(&mut self, isbn: &str) -> Result<ReturnOutcome> {
        let outcome = self.catalog.return_(isbn)?;
        match outcome {
            ReturnOutcome::Returned => info!(isbn, "Book returned"),
            ReturnOutcome::WasAvailable => debug!(isbn, "Return of a book that was not on loan"),
        }
        Ok(outcome)
    }

    pub fn get_book(&self, isbn: &str) -> Option<&Book> {
        self.catalog.get(isbn)
    }

    /// Books whose title or author contains `keyword`, ignoring case
    pub fn search_books(&self, keyword: &str) -> Vec<&Book> {
        let results = self.catalog.search(keyword);
        debug!(keyword, matches = results.len(), "Search");
        results
    }

    /// All books in insertion order
    pub fn fetch_all_books(&self) -> Vec<&Book> {
        self.catalog.list_all().collect()
    }

    /// Register a user
    pub fn add_user(&mut self, user: User) -> Result<()> {
        let user_id = user.user_id.clone();
        self.directory.add(user)?;
        info!(user_id = %user_id, "User added");
        Ok(())
    }

    /// Register each user whose id is not taken yet. Returns how many were
    /// added; invalid records are skipped with a warning.
    pub fn bootstrap_users(&mut self, users: impl IntoIterator<Item = User>) -> usize {
        let mut added = 0;
        for user in users {
            let user_id = user.user_id.clone();
            match self.directory.add(user) {
                Ok(()) => added += 1,
                Err(LibraryError::DuplicateKey { .. }) => {}
                Err(e) => warn!(user_id = %user_id, error = %e, "Skipped bootstrap user"),
            }
        }
        debug!(added, "Bootstrapped users");
        added
    }

    /// Write the whole library to `path` (or the default data path)
    pub fn save_data(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = path.unwrap_or(self.data_path.as_path());
        Snapshot::capture(&self.catalog, &self.directory).write(path)?;
        info!(
            path = %path.display(),
            books = self.catalog.len(),
            users = self.directory.len(),
            "Library saved"
        );
        Ok(path.to_path_buf())
    }

    /// Read the library from `path` (or the default data path).
    ///
    /// The file is fully decoded before anything changes, so a failed load
    /// leaves the current state intact.
    pub fn load_data(&mut self, path: Option<&Path>, mode: LoadMode) -> Result<PathBuf> {
        let path = path.unwrap_or(self.data_path.as_path()).to_path_buf();
        let snapshot = Snapshot::read(&path)?;
        snapshot.apply(&mut self.catalog, &mut self.directory, mode);
        info!(
            path = %path.display(),
            ?mode,
            books = self.catalog.len(),
            users = self.directory.len(),
            "Library loaded"
        );
        Ok(path)
    }

    fn guard(&self, session: &Session, operation: &str) -> Result<()> {
        access::require(session.actor(), Role::Admin).map_err(|e| {
            warn!(operation, error = %e, "Operation refused");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LoanState;

    fn library() -> (Library, Session) {
        let mut library = Library::new("unused.json");
        library.bootstrap_users(Library::default_users());
        let admin = library.login("U1", Some("admin123")).unwrap();
        (library, admin)
    }

    #[test]
    fn test_member_cannot_add_or_remove() {
        let (mut library, admin) = library();
        let member = library.login("U2", None).unwrap();

        let result = library.add_book(&member, Book::new("1", "T", "A"));
        assert!(matches!(result, Err(LibraryError::PermissionDenied { .. })));
        assert!(library.get_book("1").is_none());

        library.add_book(&admin, Book::new("1", "T", "A")).unwrap();
        let result = library.remove_book(&member, "1");
        assert!(matches!(result, Err(LibraryError::PermissionDenied { .. })));
        assert!(library.get_book("1").is_some());

        let result = library.remove_book(&Session::anonymous(), "1");
        assert!(matches!(result, Err(LibraryError::PermissionDenied { .. })));
    }

    #[test]
    fn test_guard_runs_before_existence_checks() {
        let (mut library, _) = library();
        let member = library.login("U2", None).unwrap();

        let result = library.remove_book(&member, "missing");
        assert!(matches!(result, Err(LibraryError::PermissionDenied { .. })));
    }

    #[test]
    fn test_borrow_requires_known_user() {
        let (mut library, admin) = library();
        library.add_book(&admin, Book::new("1", "T", "A")).unwrap();

        let result = library.borrow_book("1", "ghost");
        assert!(matches!(result, Err(LibraryError::NotFound { .. })));
        assert_eq!(library.catalog().state("1"), Some(LoanState::Available));

        let receipt = library.borrow_book("1", "U2").unwrap();
        assert_eq!(receipt.borrower.as_deref(), Some("Vinod"));
        assert_eq!(receipt.to_string(), "Book T borrowed by Vinod");
    }

    #[test]
    fn test_bootstrap_skips_existing_ids() {
        let (mut library, _) = library();
        let added = library.bootstrap_users(vec![
            User::member("U1", "Impostor"),
            User::member("U3", "Asha"),
        ]);
        assert_eq!(added, 1);
        assert_eq!(library.directory().get("U1").unwrap().name, "Ravindra");
        assert_eq!(library.directory().len(), 3);
    }

    #[test]
    fn test_member_with_password_rejected() {
        let (mut library, _) = library();
        let mut user = User::member("U3", "Asha");
        user.password = Some("pw".to_string());

        assert!(matches!(
            library.add_user(user.clone()),
            Err(LibraryError::InvalidRecord { .. })
        ));
        assert_eq!(library.bootstrap_users(vec![user]), 0);
        assert!(library.directory().get("U3").is_none());
    }

    #[test]
    fn test_login_failures() {
        let (library, _) = library();
        assert!(matches!(
            library.login("U1", Some("nope")),
            Err(LibraryError::AuthenticationFailed { .. })
        ));
        assert!(matches!(
            library.login("U7", None),
            Err(LibraryError::NotFound { .. })
        ));
    }
}
