#![allow(missing_docs)]

//! In-memory book catalog.
//!
//! The catalog is an insertion-ordered list with linear lookups. Operations
//! never fail: wrong-state requests and lookup misses come back as outcome
//! values whose `Display` is the message shown to the user.

use std::fmt;

use tracing::debug;

use crate::models::Book;

const NOT_FOUND: &str = "Book not found.";

/// Ordered collection of books owned for the lifetime of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    books: Vec<Book>,
}

/// Result of a single-book lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Found(&'a Book),
    NotFound,
}

/// Result of adding a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome;

/// Result of an issue request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueOutcome {
    /// The book was available and is now lent to `student`.
    Issued { student: String },
    /// The book is already lent; `holder` is unchanged.
    AlreadyIssued { holder: String },
    NotFound,
}

/// Result of a return request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnOutcome {
    Returned,
    NotIssued,
    NotFound,
}

/// Result of a removal request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(Book),
    NotFound,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from books in their stored order.
    pub fn from_books(books: Vec<Book>) -> Self {
        Self { books }
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Iterate books in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    /// Append an available book. Duplicate ids are accepted.
    pub fn add_book(
        &mut self,
        id: i64,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> AddOutcome {
        let book = Book::new(id, title, author);
        debug!(id, title = %book.title, "adding book");
        self.books.push(book);
        AddOutcome
    }

    /// First book with the given id.
    pub fn find_by_id(&self, id: i64) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    /// First book whose title equals `title` exactly.
    pub fn find_by_title(&self, title: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.title == title)
    }

    fn find_by_id_mut(&mut self, id: i64) -> Option<&mut Book> {
        self.books.iter_mut().find(|book| book.id == id)
    }

    pub fn search_by_id(&self, id: i64) -> Lookup<'_> {
        self.find_by_id(id).into()
    }

    pub fn search_by_title(&self, title: &str) -> Lookup<'_> {
        self.find_by_title(title).into()
    }

    /// Lend the first book with `id` to `student` if it is available.
    pub fn issue_book(&mut self, id: i64, student: &str) -> IssueOutcome {
        let Some(book) = self.find_by_id_mut(id) else {
            return IssueOutcome::NotFound;
        };
        if book.is_issued {
            return IssueOutcome::AlreadyIssued {
                holder: book.issued_to.clone(),
            };
        }
        book.is_issued = true;
        book.issued_to = student.to_string();
        debug!(id, student, "issued book");
        IssueOutcome::Issued {
            student: student.to_string(),
        }
    }

    /// Mark the first book with `id` as available again.
    pub fn return_book(&mut self, id: i64) -> ReturnOutcome {
        let Some(book) = self.find_by_id_mut(id) else {
            return ReturnOutcome::NotFound;
        };
        if !book.is_issued {
            return ReturnOutcome::NotIssued;
        }
        book.is_issued = false;
        book.issued_to.clear();
        debug!(id, "returned book");
        ReturnOutcome::Returned
    }

    /// All books sorted by ascending id; equal ids keep insertion order.
    pub fn list_all(&self) -> Vec<&Book> {
        let mut listing: Vec<&Book> = self.books.iter().collect();
        listing.sort_by_key(|book| book.id);
        listing
    }

    /// Books currently lent out, in insertion order.
    pub fn issued(&self) -> impl Iterator<Item = &Book> {
        self.books.iter().filter(|book| book.is_issued)
    }

    /// Delete the first book with `id`.
    pub fn remove_book(&mut self, id: i64) -> RemoveOutcome {
        match self.books.iter().position(|book| book.id == id) {
            Some(index) => {
                let removed = self.books.remove(index);
                debug!(id, title = %removed.title, "removed book");
                RemoveOutcome::Removed(removed)
            }
            None => RemoveOutcome::NotFound,
        }
    }
}

impl<'a> From<Option<&'a Book>> for Lookup<'a> {
    fn from(value: Option<&'a Book>) -> Self {
        match value {
            Some(book) => Lookup::Found(book),
            None => Lookup::NotFound,
        }
    }
}

impl fmt::Display for Lookup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Found(book) => fmt::Display::fmt(book, f),
            Lookup::NotFound => f.write_str(NOT_FOUND),
        }
    }
}

impl fmt::Display for AddOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Book added successfully.")
    }
}

impl fmt::Display for IssueOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueOutcome::Issued { student } => {
                write!(f, "Book issued successfully to {student}.")
            }
            IssueOutcome::AlreadyIssued { holder } => {
                write!(f, "Book is already issued to {holder}.")
            }
            IssueOutcome::NotFound => f.write_str(NOT_FOUND),
        }
    }
}

impl fmt::Display for ReturnOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReturnOutcome::Returned => "Book returned successfully.",
            ReturnOutcome::NotIssued => "Book is not issued.",
            ReturnOutcome::NotFound => NOT_FOUND,
        })
    }
}

impl fmt::Display for RemoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RemoveOutcome::Removed(_) => "Book removed successfully.",
            RemoveOutcome::NotFound => NOT_FOUND,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(books: &[&Book]) -> Vec<i64> {
        books.iter().map(|book| book.id).collect()
    }

    #[test]
    fn added_book_is_available() {
        let mut catalog = Catalog::new();
        let outcome = catalog.add_book(1, "Dune", "Herbert");
        assert_eq!(outcome.to_string(), "Book added successfully.");

        let book = catalog.find_by_id(1).expect("book should exist");
        assert_eq!(book, &Book::new(1, "Dune", "Herbert"));
        assert!(!book.is_issued);
        assert!(book.issued_to.is_empty());
    }

    #[test]
    fn issuing_twice_keeps_first_holder() {
        let mut catalog = Catalog::new();
        catalog.add_book(4, "Emma", "Austen");

        let first = catalog.issue_book(4, "Alice");
        assert_eq!(first.to_string(), "Book issued successfully to Alice.");

        let second = catalog.issue_book(4, "Bob");
        assert_eq!(
            second,
            IssueOutcome::AlreadyIssued {
                holder: "Alice".to_string()
            }
        );
        assert_eq!(second.to_string(), "Book is already issued to Alice.");
        assert_eq!(catalog.find_by_id(4).map(|b| b.issued_to.as_str()), Some("Alice"));
    }

    #[test]
    fn returning_available_book_changes_nothing() {
        let mut catalog = Catalog::new();
        catalog.add_book(2, "Ulysses", "Joyce");
        let before = catalog.clone();

        let outcome = catalog.return_book(2);
        assert_eq!(outcome, ReturnOutcome::NotIssued);
        assert_eq!(outcome.to_string(), "Book is not issued.");
        assert_eq!(catalog, before);
    }

    #[test]
    fn missing_ids_report_not_found() {
        let mut catalog = Catalog::new();
        assert_eq!(catalog.search_by_id(9).to_string(), "Book not found.");
        assert_eq!(catalog.search_by_title("Nope").to_string(), "Book not found.");
        assert_eq!(catalog.issue_book(9, "Alice"), IssueOutcome::NotFound);
        assert_eq!(catalog.return_book(9), ReturnOutcome::NotFound);
        assert_eq!(catalog.remove_book(9), RemoveOutcome::NotFound);
    }

    #[test]
    fn listing_sorts_by_id_and_keeps_ties_stable() {
        let mut catalog = Catalog::new();
        catalog.add_book(3, "C", "x");
        catalog.add_book(1, "A", "x");
        catalog.add_book(2, "B-first", "x");
        catalog.add_book(2, "B-second", "x");

        let listing = catalog.list_all();
        assert_eq!(ids(&listing), vec![1, 2, 2, 3]);
        assert_eq!(listing[1].title, "B-first");
        assert_eq!(listing[2].title, "B-second");

        // Listing does not reorder the underlying catalog.
        let stored: Vec<i64> = catalog.iter().map(|book| book.id).collect();
        assert_eq!(stored, vec![3, 1, 2, 2]);
    }

    #[test]
    fn remove_deletes_only_first_duplicate() {
        let mut catalog = Catalog::new();
        catalog.add_book(5, "Old", "x");
        catalog.add_book(5, "New", "y");

        let outcome = catalog.remove_book(5);
        assert_eq!(outcome.to_string(), "Book removed successfully.");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find_by_id(5).map(|b| b.title.as_str()), Some("New"));

        catalog.remove_book(5);
        assert!(catalog.is_empty());
        assert_eq!(catalog.search_by_id(5), Lookup::NotFound);
    }

    #[test]
    fn title_lookup_is_exact_and_first_match() {
        let mut catalog = Catalog::new();
        catalog.add_book(1, "Dune", "Herbert");
        catalog.add_book(2, "Dune", "Someone Else");

        assert_eq!(catalog.find_by_title("Dune").map(|b| b.id), Some(1));
        assert!(catalog.find_by_title("dune").is_none());
    }

    #[test]
    fn issued_filters_lent_books() {
        let mut catalog = Catalog::new();
        catalog.add_book(1, "A", "x");
        catalog.add_book(2, "B", "x");
        catalog.add_book(3, "C", "x");
        catalog.issue_book(3, "Carol");
        catalog.issue_book(1, "Alice");

        let lent: Vec<i64> = catalog.issued().map(|book| book.id).collect();
        assert_eq!(lent, vec![1, 3]);
    }

    #[test]
    fn issue_return_scenario() {
        let mut catalog = Catalog::new();
        catalog.add_book(1, "Dune", "Herbert");
        catalog.issue_book(1, "Alice");

        let shown = catalog.search_by_id(1).to_string();
        assert!(shown.contains("Status: Issued"));
        assert!(shown.ends_with("Issued to: Alice"));

        assert_eq!(catalog.return_book(1), ReturnOutcome::Returned);
        let shown = catalog.search_by_id(1).to_string();
        assert!(shown.contains("Status: Available"));
        assert!(!shown.contains("Issued to"));
    }
}
