//! Catalog of all books, keyed by ISBN.
//!
//! Records are kept in insertion order, which is also the order used by
//! listings, searches and the persisted document.

use indexmap::IndexMap;

use super::error::{Entity, LibraryError, Result};
use crate::domain::Book;

/// In-memory catalog store
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: IndexMap<String, Book>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a book. Fails if the ISBN is already cataloged.
    pub fn add(&mut self, book: Book) -> Result<()> {
        book.check().map_err(|reason| LibraryError::InvalidRecord {
            id: book.isbn.clone(),
            reason,
        })?;

        if self.books.contains_key(&book.isbn) {
            return Err(LibraryError::DuplicateKey {
                entity: Entity::Book,
                id: book.isbn,
            });
        }

        self.books.insert(book.isbn.clone(), book);
        Ok(())
    }

    /// Remove a book by ISBN, whether or not it is on loan
    pub fn remove(&mut self, isbn: &str) -> Result<Book> {
        self.books
            .shift_remove(isbn)
            .ok_or_else(|| LibraryError::book_not_found(isbn))
    }

    /// Get a book by ISBN
    pub fn get(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    pub(crate) fn get_mut(&mut self, isbn: &str) -> Option<&mut Book> {
        self.books.get_mut(isbn)
    }

    /// Search by title or author (case-insensitive substring match)
    pub fn search(&self, keyword: &str) -> Vec<&Book> {
        let needle = keyword.to_lowercase();
        self.books
            .values()
            .filter(|book| book.matches_lowercase(&needle))
            .collect()
    }

    /// Iterate over all books in insertion order
    pub fn list_all(&self) -> impl Iterator<Item = &Book> + '_ {
        self.books.values()
    }

    /// Insert or replace by ISBN, keeping the original position on replace
    pub(crate) fn upsert(&mut self, book: Book) {
        self.books.insert(book.isbn.clone(), book);
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.books.clear();
    }

    /// Get the number of books
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
