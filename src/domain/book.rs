//! Book records and their variants.
//!
//! A book is identified by its ISBN. The variant is chosen at creation and
//! never changes; only the `borrowed` flag is mutated afterwards.

use std::fmt;

/// A single catalog record
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    /// Unique catalog identifier
    pub isbn: String,

    /// Display title
    pub title: String,

    /// Display author
    pub author: String,

    /// Whether the book is currently on loan
    pub borrowed: bool,

    /// Variant-specific data
    pub kind: BookKind,
}

impl Book {
    /// Create a base book with no variant fields
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self::with_kind(isbn, title, author, BookKind::Base)
    }

    /// Create a printed book
    pub fn printed(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        pages: u32,
    ) -> Self {
        Self::with_kind(isbn, title, author, BookKind::Printed { pages })
    }

    /// Create a digital book (file size in megabytes)
    pub fn digital(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        file_size: f64,
    ) -> Self {
        Self::with_kind(isbn, title, author, BookKind::Digital { file_size })
    }

    /// Create a book of the given variant, initially available
    pub fn with_kind(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        kind: BookKind,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            borrowed: false,
            kind,
        }
    }

    /// Current lending state derived from the `borrowed` flag
    pub fn loan_state(&self) -> LoanState {
        if self.borrowed {
            LoanState::OnLoan
        } else {
            LoanState::Available
        }
    }

    /// Case-insensitive substring match against title or author.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.author.to_lowercase().contains(needle)
    }

    /// Check the record's own constraints
    pub fn check(&self) -> Result<(), String> {
        if self.isbn.trim().is_empty() {
            return Err("isbn must not be empty".to_string());
        }
        self.kind.check()
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {} (ISBN : {})", self.title, self.author, self.isbn)
    }
}

/// Book variant with its extra fields
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BookKind {
    /// Plain catalog entry
    Base,

    /// Physical copy with a page count
    Printed { pages: u32 },

    /// Electronic copy with a file size in megabytes
    Digital { file_size: f64 },
}

impl BookKind {
    /// Short label used in listings and as the persisted discriminant
    pub fn label(&self) -> &'static str {
        match self {
            BookKind::Base => "base",
            BookKind::Printed { .. } => "printed",
            BookKind::Digital { .. } => "digital",
        }
    }

    /// Variant detail for listings ("-" for base books)
    pub fn detail(&self) -> String {
        match self {
            BookKind::Base => "-".to_string(),
            BookKind::Printed { pages } => pages.to_string(),
            BookKind::Digital { file_size } => format!("{} MB", file_size),
        }
    }

    fn check(&self) -> Result<(), String> {
        match *self {
            BookKind::Base => Ok(()),
            BookKind::Printed { pages } if pages == 0 => {
                Err("pages must be a positive integer".to_string())
            }
            BookKind::Printed { .. } => Ok(()),
            BookKind::Digital { file_size } if !(file_size.is_finite() && file_size > 0.0) => {
                Err(format!("file_size must be a positive number, got {}", file_size))
            }
            BookKind::Digital { .. } => Ok(()),
        }
    }
}

/// Lending state of a single book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanState {
    /// On the shelf
    Available,

    /// Borrowed and not yet returned
    OnLoan,
}

impl fmt::Display for LoanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanState::Available => write!(f, "available"),
            LoanState::OnLoan => write!(f, "on loan"),
        }
    }
}
