//! Borrow/return state machine.
//!
//! Each ISBN is a single unit with two states:
//!
//! ```text
//! Available --borrow--> OnLoan --return--> Available
//! ```
//!
//! Returning an available book is accepted and reported as
//! [`ReturnOutcome::WasAvailable`]. The transitions here do not consult the
//! user directory; the [`Library`](super::Library) facade does that.

use chrono::{DateTime, Utc};

use super::catalog::Catalog;
use super::error::{LibraryError, Result};
use crate::domain::LoanState;

/// Result of a successful borrow. Display-only, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanReceipt {
    pub isbn: String,
    pub title: String,

    /// Id the borrow was performed for
    pub user_id: String,

    /// Borrower's display name, when the directory knows it
    pub borrower: Option<String>,

    pub borrowed_at: DateTime<Utc>,
}

impl std::fmt::Display for LoanReceipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let who = self.borrower.as_deref().unwrap_or(&self.user_id);
        write!(f, "Book {} borrowed by {}", self.title, who)
    }
}

/// What a return actually changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnOutcome {
    /// The book was on loan and is now available
    Returned,

    /// The book was already available; nothing changed
    WasAvailable,
}

impl Catalog {
    /// Move a book from `Available` to `OnLoan`
    pub fn borrow(&mut self, isbn: &str, user_id: &str) -> Result<LoanReceipt> {
        let book = self
            .get_mut(isbn)
            .ok_or_else(|| LibraryError::book_not_found(isbn))?;

        if book.borrowed {
            return Err(LibraryError::AlreadyBorrowed {
                isbn: isbn.to_string(),
            });
        }
        book.borrowed = true;

        Ok(LoanReceipt {
            isbn: book.isbn.clone(),
            title: book.title.clone(),
            user_id: user_id.to_string(),
            borrower: None,
            borrowed_at: Utc::now(),
        })
    }

    /// Move a book back to `Available`
    pub fn return_(&mut self, isbn: &str) -> Result<ReturnOutcome> {
        let book = self
            .get_mut(isbn)
            .ok_or_else(|| LibraryError::book_not_found(isbn))?;

        let outcome = if book.borrowed {
            ReturnOutcome::Returned
        } else {
            ReturnOutcome::WasAvailable
        };
        book.borrowed = false;
        Ok(outcome)
    }

    /// Lending state of a book, if cataloged
    pub fn state(&self, isbn: &str) -> Option<LoanState> {
        self.get(isbn).map(|b| b.loan_state())
    }
}
