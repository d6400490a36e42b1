use std::fmt;

use serde::{Deserialize, Serialize};

/// Catalog identifier of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub u32);

/// Identifier of a library user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lending state of a single-copy book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookStatus {
    #[serde(rename = "Available")]
    Available,
    #[serde(rename = "Checked Out")]
    CheckedOut,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::CheckedOut => "Checked Out",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical book record owned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub status: BookStatus,
}

impl Book {
    pub fn new(
        id: u32,
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            id: BookId(id),
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            status: BookStatus::Available,
        }
    }

    pub fn with_status(mut self, status: BookStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }

    /// Case-insensitive substring match on title or author.
    /// `needle` must already be lowercased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.author.to_lowercase().contains(needle)
    }

    pub fn listing(&self) -> BookListing {
        BookListing {
            id: self.id,
            title: self.title.clone(),
            status: self.status,
        }
    }
}

/// Library user. Borrowed books are held as ids into the catalog, in borrow order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub borrowed: Vec<BookId>,
}

impl User {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: UserId(id),
            name: name.into(),
            borrowed: Vec::new(),
        }
    }

    pub fn holds(&self, book_id: BookId) -> bool {
        self.borrowed.contains(&book_id)
    }
}

/// One line of the catalog listing: `"{id}. {title} ({status})"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookListing {
    pub id: BookId,
    pub title: String,
    pub status: BookStatus,
}

impl fmt::Display for BookListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} ({})", self.id, self.title, self.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanAction {
    Borrowed,
    Returned,
}

impl LoanAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanAction::Borrowed => "borrowed",
            LoanAction::Returned => "returned",
        }
    }
}

/// Confirmation of a successful borrow or return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanReceipt {
    pub action: LoanAction,
    pub user_id: UserId,
    pub book_id: BookId,
    pub title: String,
}

impl LoanReceipt {
    pub fn message(&self) -> String {
        format!(
            "Book '{}' {} successfully!",
            self.title,
            self.action.as_str()
        )
    }
}

/// Outcome of a keyword search. An empty match set is reported as `NoResults`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Matches(Vec<BookListing>),
    NoResults,
}

impl SearchOutcome {
    pub const NO_RESULTS_MESSAGE: &'static str = "No books found.";

    pub fn matches(&self) -> &[BookListing] {
        match self {
            SearchOutcome::Matches(listings) => listings,
            SearchOutcome::NoResults => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SearchOutcome::NoResults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_renders_id_title_and_status() {
        let book = Book::new(2, "1984", "George Orwell", "Dystopian")
            .with_status(BookStatus::CheckedOut);
        assert_eq!(book.listing().to_string(), "2. 1984 (Checked Out)");
    }

    #[test]
    fn status_serializes_with_display_text() {
        let json = serde_json::to_value(BookStatus::CheckedOut).unwrap();
        assert_eq!(json, serde_json::json!("Checked Out"));
    }

    #[test]
    fn receipt_message_names_title_and_action() {
        let receipt = LoanReceipt {
            action: LoanAction::Returned,
            user_id: UserId(1),
            book_id: BookId(3),
            title: "The Great Gatsby".to_string(),
        };
        assert_eq!(
            receipt.message(),
            "Book 'The Great Gatsby' returned successfully!"
        );
    }

    #[test]
    fn matches_title_or_author() {
        let book = Book::new(1, "To Kill a Mockingbird", "Harper Lee", "Fiction");
        assert!(book.matches("mocking"));
        assert!(book.matches("harper"));
        assert!(book.matches(""));
        assert!(!book.matches("fiction"));
    }
}
