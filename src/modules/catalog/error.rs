use thiserror::Error;

use super::models::{BookId, UserId};

/// Failures of catalog operations. `Display` is the text shown to the patron.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// An id field was not a non-negative integer. Raised by the desk, never by the catalog.
    #[error("Please enter valid User ID and Book ID.")]
    InvalidInput,

    /// Either id is unknown. The message does not say which one.
    #[error("Invalid User ID or Book ID.")]
    NotFound { user_id: UserId, book_id: BookId },

    #[error("Book '{title}' is already checked out.")]
    AlreadyCheckedOut { book_id: BookId, title: String },

    #[error("User {user_name} hasn't borrowed '{title}'.")]
    NotBorrowedByUser {
        user_id: UserId,
        user_name: String,
        book_id: BookId,
        title: String,
    },

    #[error("inconsistent catalog records: {0}")]
    InvalidCatalog(String),
}

impl CatalogError {
    /// Stable machine-readable code for API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::InvalidInput => "invalid_input",
            CatalogError::NotFound { .. } => "not_found",
            CatalogError::AlreadyCheckedOut { .. } => "already_checked_out",
            CatalogError::NotBorrowedByUser { .. } => "not_borrowed_by_user",
            CatalogError::InvalidCatalog(_) => "invalid_catalog",
        }
    }
}
