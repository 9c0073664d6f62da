//! Shared domain models.

use std::fmt;

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Catalog number. Not guaranteed unique.
    pub id: i64,
    /// Book title, matched exactly by title lookups.
    pub title: String,
    /// Author credit.
    pub author: String,
    /// Whether the book is currently lent out.
    pub is_issued: bool,
    /// Borrower name; empty while the book is available.
    pub issued_to: String,
}

impl Book {
    /// Create an available book.
    pub fn new(id: i64, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            is_issued: false,
            issued_to: String::new(),
        }
    }

    /// Label shown in the `Status:` column.
    pub fn status_label(&self) -> &'static str {
        if self.is_issued {
            "Issued"
        } else {
            "Available"
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Title: {}, Author: {}, Status: {}",
            self.id,
            self.title,
            self.author,
            self.status_label()
        )?;
        if self.is_issued {
            write!(f, "\nIssued to: {}", self.issued_to)?;
        }
        Ok(())
    }
}
