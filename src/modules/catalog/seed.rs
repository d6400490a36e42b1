//! Sample records loaded at startup.
//!
//! "1984" starts out checked out without a holder, so no user can return it.

use super::models::{Book, BookStatus, User};

pub fn books() -> Vec<Book> {
    vec![
        Book::new(1, "To Kill a Mockingbird", "Harper Lee", "Fiction"),
        Book::new(2, "1984", "George Orwell", "Dystopian").with_status(BookStatus::CheckedOut),
        Book::new(3, "The Great Gatsby", "F. Scott Fitzgerald", "Fiction"),
    ]
}

pub fn users() -> Vec<User> {
    vec![User::new(1, "loki"), User::new(2, "Bob")]
}
