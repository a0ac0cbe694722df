//! JSON snapshot of the catalog and directory.
//!
//! # Document layout
//!
//! ```text
//! {
//!   "books": { "<isbn>": { "isbn", "title", "author", "borrowed", "kind", ["pages" | "file_size"] } },
//!   "users": { "<user_id>": { "user_id", "name", "role", "password" } }
//! }
//! ```
//!
//! `kind` is written on every save. Documents without it select the variant
//! by field presence: `pages` means printed, `file_size` means digital,
//! neither means base.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::catalog::Catalog;
use super::directory::Directory;
use super::error::{LibraryError, Result};
use crate::domain::{Book, BookKind, User};

/// Default data file name
pub const DEFAULT_DATA_FILE: &str = "library_data.json";

/// How a loaded snapshot is applied to existing state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Clear catalog and directory, then insert the loaded records
    #[default]
    Replace,

    /// Overwrite per key, keeping records the snapshot does not mention
    Merge,
}

/// Persisted variant discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum KindTag {
    Base,
    Printed,
    Digital,
}

/// Flat on-disk book record
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BookRecord {
    isbn: String,
    title: String,
    author: String,
    #[serde(default)]
    borrowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<KindTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_size: Option<f64>,
}

impl From<&Book> for BookRecord {
    fn from(book: &Book) -> Self {
        let (kind, pages, file_size) = match book.kind {
            BookKind::Base => (KindTag::Base, None, None),
            BookKind::Printed { pages } => (KindTag::Printed, Some(pages), None),
            BookKind::Digital { file_size } => (KindTag::Digital, None, Some(file_size)),
        };

        Self {
            isbn: book.isbn.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            borrowed: book.borrowed,
            kind: Some(kind),
            pages,
            file_size,
        }
    }
}

impl BookRecord {
    fn into_book(self) -> std::result::Result<Book, String> {
        let tag = match self.kind {
            Some(tag) => tag,
            None if self.pages.is_some() => KindTag::Printed,
            None if self.file_size.is_some() => KindTag::Digital,
            None => KindTag::Base,
        };

        let kind = match tag {
            KindTag::Base => BookKind::Base,
            KindTag::Printed => BookKind::Printed {
                pages: self.pages.ok_or("printed book without pages")?,
            },
            KindTag::Digital => BookKind::Digital {
                file_size: self.file_size.ok_or("digital book without file_size")?,
            },
        };

        let mut book = Book::with_kind(self.isbn, self.title, self.author, kind);
        book.borrowed = self.borrowed;
        book.check()?;
        Ok(book)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    books: Map<String, Value>,
    users: Map<String, Value>,
}

/// A decoded copy of the whole library state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub books: Vec<Book>,
    pub users: Vec<User>,
}

impl Snapshot {
    /// Copy the current state of a catalog and directory
    pub fn capture(catalog: &Catalog, directory: &Directory) -> Self {
        Self {
            books: catalog.list_all().cloned().collect(),
            users: directory.list_all().cloned().collect(),
        }
    }

    /// Encode as a pretty-printed JSON document
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut books = Map::new();
        for book in &self.books {
            books.insert(book.isbn.clone(), serde_json::to_value(BookRecord::from(book))?);
        }

        let mut users = Map::new();
        for user in &self.users {
            users.insert(user.user_id.clone(), serde_json::to_value(user)?);
        }

        serde_json::to_string_pretty(&Document { books, users })
    }

    /// Decode a JSON document, validating every record
    pub fn from_json(content: &str) -> std::result::Result<Self, String> {
        let document: Document =
            serde_json::from_str(content).map_err(|e| format!("malformed document: {}", e))?;

        let mut books = Vec::with_capacity(document.books.len());
        for (key, value) in document.books {
            let record: BookRecord = serde_json::from_value(value)
                .map_err(|e| format!("book {}: {}", key, e))?;
            if record.isbn != key {
                return Err(format!("book {}: record isbn is {}", key, record.isbn));
            }
            books.push(record.into_book().map_err(|e| format!("book {}: {}", key, e))?);
        }

        let mut users = Vec::with_capacity(document.users.len());
        for (key, value) in document.users {
            let user: User = serde_json::from_value(value)
                .map_err(|e| format!("user {}: {}", key, e))?;
            if user.user_id != key {
                return Err(format!("user {}: record user_id is {}", key, user.user_id));
            }
            user.check().map_err(|e| format!("user {}: {}", key, e))?;
            users.push(user);
        }

        Ok(Self { books, users })
    }

    /// Overwrite `path` with this snapshot
    pub fn write(&self, path: &Path) -> Result<()> {
        let not_writable = |reason: String| LibraryError::NotWritable {
            path: path.to_path_buf(),
            reason,
        };

        let content = self.to_json().map_err(|e| not_writable(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| not_writable(e.to_string()))?;
        }

        std::fs::write(path, content).map_err(|e| not_writable(e.to_string()))
    }

    /// Read and decode the snapshot stored at `path`
    pub fn read(path: &Path) -> Result<Self> {
        let not_readable = |reason: String| LibraryError::NotReadable {
            path: path.to_path_buf(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| not_readable(e.to_string()))?;
        Self::from_json(&content).map_err(not_readable)
    }

    /// Install the snapshot's records into a catalog and directory
    pub fn apply(self, catalog: &mut Catalog, directory: &mut Directory, mode: LoadMode) {
        if mode == LoadMode::Replace {
            catalog.clear();
            directory.clear();
        }

        for book in self.books {
            catalog.upsert(book);
        }
        for user in self.users {
            directory.upsert(user);
        }
    }
}
