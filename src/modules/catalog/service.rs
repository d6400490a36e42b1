//! The catalog: canonical book and user records plus the lending operations.

use std::collections::HashSet;

use super::error::CatalogError;
use super::models::{
    Book, BookId, BookListing, BookStatus, LoanAction, LoanReceipt, SearchOutcome, User, UserId,
};
use super::seed;

/// Owns every book and user record. Users refer to books by id only, so the
/// book's status lives in exactly one place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    books: Vec<Book>,
    users: Vec<User>,
}

impl Catalog {
    /// A catalog with no books and no users.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The sample collection every process starts with.
    pub fn seeded() -> Self {
        Self {
            books: seed::books(),
            users: seed::users(),
        }
    }

    /// Build a catalog from explicit records, checking id uniqueness and loan references.
    ///
    /// A book held by a user must be `CheckedOut`, and no book may be held twice.
    /// A `CheckedOut` book with no holder is accepted.
    pub fn from_records(books: Vec<Book>, users: Vec<User>) -> Result<Self, CatalogError> {
        let mut book_ids = HashSet::new();
        for book in &books {
            if !book_ids.insert(book.id) {
                return Err(CatalogError::InvalidCatalog(format!(
                    "duplicate book id {}",
                    book.id
                )));
            }
        }

        let mut user_ids = HashSet::new();
        let mut held = HashSet::new();
        for user in &users {
            if !user_ids.insert(user.id) {
                return Err(CatalogError::InvalidCatalog(format!(
                    "duplicate user id {}",
                    user.id
                )));
            }

            for book_id in &user.borrowed {
                let book = books.iter().find(|b| b.id == *book_id).ok_or_else(|| {
                    CatalogError::InvalidCatalog(format!(
                        "user {} holds unknown book {}",
                        user.id, book_id
                    ))
                })?;

                if book.status != BookStatus::CheckedOut {
                    return Err(CatalogError::InvalidCatalog(format!(
                        "book {} is held by user {} but marked {}",
                        book_id, user.id, book.status
                    )));
                }

                if !held.insert(*book_id) {
                    return Err(CatalogError::InvalidCatalog(format!(
                        "book {} is held more than once",
                        book_id
                    )));
                }
            }
        }

        Ok(Self { books, users })
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// The user currently holding `book_id`, if any.
    pub fn holder_of(&self, book_id: BookId) -> Option<&User> {
        self.users.iter().find(|user| user.holds(book_id))
    }

    /// Resolve both ids to record positions, failing with one generic error if either is unknown.
    fn resolve(&self, user_id: UserId, book_id: BookId) -> Result<(usize, usize), CatalogError> {
        let user = self.users.iter().position(|user| user.id == user_id);
        let book = self.books.iter().position(|book| book.id == book_id);

        match (user, book) {
            (Some(user), Some(book)) => Ok((user, book)),
            _ => Err(CatalogError::NotFound { user_id, book_id }),
        }
    }

    /// Check a book out to a user.
    pub fn borrow(&mut self, user_id: UserId, book_id: BookId) -> Result<LoanReceipt, CatalogError> {
        let (user_idx, book_idx) = self.resolve(user_id, book_id).inspect_err(|_| {
            tracing::warn!(%user_id, %book_id, "borrow refused: unknown id");
        })?;

        let book = &mut self.books[book_idx];
        if !book.is_available() {
            tracing::warn!(%user_id, %book_id, "borrow refused: already checked out");
            return Err(CatalogError::AlreadyCheckedOut {
                book_id,
                title: book.title.clone(),
            });
        }

        book.status = BookStatus::CheckedOut;
        self.users[user_idx].borrowed.push(book_id);

        tracing::info!(%user_id, %book_id, title = %book.title, "book borrowed");

        Ok(LoanReceipt {
            action: LoanAction::Borrowed,
            user_id,
            book_id,
            title: book.title.clone(),
        })
    }

    /// Take a book back from the user holding it.
    pub fn return_book(
        &mut self,
        user_id: UserId,
        book_id: BookId,
    ) -> Result<LoanReceipt, CatalogError> {
        let (user_idx, book_idx) = self.resolve(user_id, book_id).inspect_err(|_| {
            tracing::warn!(%user_id, %book_id, "return refused: unknown id");
        })?;

        let user = &mut self.users[user_idx];
        let book = &mut self.books[book_idx];

        let Some(slot) = user.borrowed.iter().position(|held| *held == book_id) else {
            tracing::warn!(%user_id, %book_id, "return refused: not borrowed by user");
            return Err(CatalogError::NotBorrowedByUser {
                user_id,
                user_name: user.name.clone(),
                book_id,
                title: book.title.clone(),
            });
        };

        user.borrowed.remove(slot);
        book.status = BookStatus::Available;

        tracing::info!(%user_id, %book_id, title = %book.title, "book returned");

        Ok(LoanReceipt {
            action: LoanAction::Returned,
            user_id,
            book_id,
            title: book.title.clone(),
        })
    }

    /// Every book in insertion order.
    pub fn list_all(&self) -> Vec<BookListing> {
        self.books.iter().map(Book::listing).collect()
    }

    /// Case-insensitive substring search over title and author.
    pub fn search(&self, keyword: &str) -> SearchOutcome {
        let needle = keyword.to_lowercase();
        let matches: Vec<BookListing> = self
            .books
            .iter()
            .filter(|book| book.matches(&needle))
            .map(Book::listing)
            .collect();

        tracing::debug!(keyword, hits = matches.len(), "catalog searched");

        if matches.is_empty() {
            SearchOutcome::NoResults
        } else {
            SearchOutcome::Matches(matches)
        }
    }

    /// Books held by a user in borrow order, or `None` for an unknown user.
    pub fn loans_of(&self, user_id: UserId) -> Option<Vec<BookListing>> {
        let user = self.user(user_id)?;
        Some(
            user.borrowed
                .iter()
                .filter_map(|book_id| self.book(*book_id))
                .map(Book::listing)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consistent_catalog() -> Catalog {
        Catalog::from_records(
            vec![
                Book::new(1, "Dune", "Frank Herbert", "Science Fiction"),
                Book::new(2, "Emma", "Jane Austen", "Romance"),
                Book::new(3, "Beloved", "Toni Morrison", "Fiction"),
            ],
            vec![User::new(1, "ada"), User::new(2, "grace")],
        )
        .unwrap()
    }

    /// A book is checked out exactly when one user holds it.
    fn assert_status_matches_holders(catalog: &Catalog) {
        for book in catalog.books() {
            let holders = catalog
                .users()
                .iter()
                .filter(|user| user.holds(book.id))
                .count();
            match book.status {
                BookStatus::CheckedOut => assert_eq!(holders, 1, "book {}", book.id),
                BookStatus::Available => assert_eq!(holders, 0, "book {}", book.id),
            }
        }
    }

    #[test]
    fn scenario_borrow_available_book() {
        let mut catalog = Catalog::seeded();

        let receipt = catalog.borrow(UserId(1), BookId(1)).unwrap();

        assert_eq!(
            receipt.message(),
            "Book 'To Kill a Mockingbird' borrowed successfully!"
        );
        assert_eq!(
            catalog.book(BookId(1)).unwrap().status,
            BookStatus::CheckedOut
        );
        assert_eq!(catalog.user(UserId(1)).unwrap().borrowed, vec![BookId(1)]);
        assert_eq!(catalog.holder_of(BookId(1)).unwrap().name, "loki");
    }

    #[test]
    fn scenario_borrow_checked_out_book_is_refused() {
        let mut catalog = Catalog::seeded();
        let before = catalog.clone();

        let err = catalog.borrow(UserId(1), BookId(2)).unwrap_err();

        assert!(matches!(
            err,
            CatalogError::AlreadyCheckedOut { book_id: BookId(2), .. }
        ));
        assert_eq!(err.to_string(), "Book '1984' is already checked out.");
        assert_eq!(catalog, before);
    }

    #[test]
    fn scenario_return_after_borrow() {
        let mut catalog = Catalog::seeded();
        catalog.borrow(UserId(1), BookId(1)).unwrap();

        let receipt = catalog.return_book(UserId(1), BookId(1)).unwrap();

        assert_eq!(
            receipt.message(),
            "Book 'To Kill a Mockingbird' returned successfully!"
        );
        assert_eq!(
            catalog.book(BookId(1)).unwrap().status,
            BookStatus::Available
        );
        assert!(catalog.user(UserId(1)).unwrap().borrowed.is_empty());
    }

    #[test]
    fn scenario_return_without_borrow_is_refused() {
        let mut catalog = Catalog::seeded();
        let before = catalog.clone();

        let err = catalog.return_book(UserId(2), BookId(1)).unwrap_err();

        assert!(matches!(err, CatalogError::NotBorrowedByUser { .. }));
        assert_eq!(
            err.to_string(),
            "User Bob hasn't borrowed 'To Kill a Mockingbird'."
        );
        assert_eq!(catalog, before);
    }

    #[test]
    fn scenario_unknown_user_is_not_found() {
        let mut catalog = Catalog::seeded();

        let err = catalog.borrow(UserId(99), BookId(1)).unwrap_err();

        assert_eq!(
            err,
            CatalogError::NotFound {
                user_id: UserId(99),
                book_id: BookId(1)
            }
        );
        assert_eq!(err.to_string(), "Invalid User ID or Book ID.");
    }

    #[test]
    fn unknown_book_gives_the_same_message() {
        let mut catalog = Catalog::seeded();

        let borrow = catalog.borrow(UserId(1), BookId(42)).unwrap_err();
        let ret = catalog.return_book(UserId(1), BookId(42)).unwrap_err();

        assert_eq!(borrow.to_string(), "Invalid User ID or Book ID.");
        assert_eq!(ret.to_string(), "Invalid User ID or Book ID.");
    }

    #[test]
    fn scenario_search_matches_author_case_insensitively() {
        let catalog = Catalog::seeded();

        let outcome = catalog.search("orwell");

        let lines: Vec<String> = outcome.matches().iter().map(|l| l.to_string()).collect();
        assert_eq!(lines, vec!["2. 1984 (Checked Out)"]);
    }

    #[test]
    fn search_empty_keyword_returns_everything() {
        let catalog = Catalog::seeded();
        assert_eq!(catalog.search("").matches(), catalog.list_all().as_slice());
    }

    #[test]
    fn search_matches_title_in_any_case() {
        let catalog = Catalog::seeded();
        let ids: Vec<BookId> = catalog
            .search("THE GREAT")
            .matches()
            .iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec![BookId(3)]);
    }

    #[test]
    fn search_without_hits_reports_no_results() {
        let catalog = Catalog::seeded();
        let outcome = catalog.search("tolkien");
        assert_eq!(outcome, SearchOutcome::NoResults);
        assert!(outcome.matches().is_empty());
    }

    #[test]
    fn list_all_keeps_insertion_order_across_history() {
        let mut catalog = Catalog::seeded();
        catalog.borrow(UserId(2), BookId(3)).unwrap();
        catalog.borrow(UserId(1), BookId(1)).unwrap();
        catalog.return_book(UserId(2), BookId(3)).unwrap();

        let lines: Vec<String> = catalog.list_all().iter().map(|l| l.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "1. To Kill a Mockingbird (Checked Out)",
                "2. 1984 (Checked Out)",
                "3. The Great Gatsby (Available)",
            ]
        );
    }

    #[test]
    fn empty_catalog_lists_nothing() {
        let catalog = Catalog::empty();
        assert!(catalog.list_all().is_empty());
        assert_eq!(catalog.search(""), SearchOutcome::NoResults);
    }

    #[test]
    fn borrow_then_return_restores_state() {
        let mut catalog = consistent_catalog();
        catalog.borrow(UserId(2), BookId(2)).unwrap();
        let before = catalog.clone();

        catalog.borrow(UserId(1), BookId(3)).unwrap();
        catalog.return_book(UserId(1), BookId(3)).unwrap();

        assert_eq!(catalog, before);
    }

    #[test]
    fn returning_someone_elses_book_is_refused() {
        let mut catalog = consistent_catalog();
        catalog.borrow(UserId(1), BookId(2)).unwrap();
        let before = catalog.clone();

        let err = catalog.return_book(UserId(2), BookId(2)).unwrap_err();

        assert!(matches!(
            err,
            CatalogError::NotBorrowedByUser {
                user_id: UserId(2),
                book_id: BookId(2),
                ..
            }
        ));
        assert_eq!(catalog, before);
    }

    #[test]
    fn loans_are_kept_in_borrow_order() {
        let mut catalog = consistent_catalog();
        catalog.borrow(UserId(1), BookId(3)).unwrap();
        catalog.borrow(UserId(1), BookId(1)).unwrap();
        catalog.borrow(UserId(1), BookId(2)).unwrap();
        catalog.return_book(UserId(1), BookId(1)).unwrap();

        let ids: Vec<BookId> = catalog
            .loans_of(UserId(1))
            .unwrap()
            .iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec![BookId(3), BookId(2)]);
        assert!(catalog.loans_of(UserId(7)).is_none());
    }

    #[test]
    fn status_tracks_holders_through_mixed_history() {
        let mut catalog = consistent_catalog();
        let steps: [(bool, u32, u32); 8] = [
            (true, 1, 1),
            (true, 2, 1),
            (true, 2, 2),
            (false, 1, 2),
            (false, 2, 2),
            (true, 1, 2),
            (true, 1, 3),
            (false, 1, 1),
        ];

        for (borrow, user, book) in steps {
            let _ = if borrow {
                catalog.borrow(UserId(user), BookId(book))
            } else {
                catalog.return_book(UserId(user), BookId(book))
            };
            assert_status_matches_holders(&catalog);
        }

        assert_eq!(
            catalog.user(UserId(1)).unwrap().borrowed,
            vec![BookId(2), BookId(3)]
        );
    }

    #[test]
    fn seed_data_passes_validation() {
        let seeded = Catalog::seeded();
        let rebuilt =
            Catalog::from_records(seeded.books().to_vec(), seeded.users().to_vec()).unwrap();
        assert_eq!(rebuilt, seeded);
        assert_eq!(seeded.books().len(), 3);
        assert_eq!(seeded.users().len(), 2);
    }

    #[test]
    fn from_records_rejects_duplicates_and_dangling_loans() {
        let dup_books = Catalog::from_records(
            vec![Book::new(1, "A", "x", "g"), Book::new(1, "B", "y", "g")],
            vec![],
        );
        assert!(matches!(dup_books, Err(CatalogError::InvalidCatalog(_))));

        let dup_users = Catalog::from_records(vec![], vec![User::new(5, "a"), User::new(5, "b")]);
        assert!(matches!(dup_users, Err(CatalogError::InvalidCatalog(_))));

        let mut holder = User::new(1, "a");
        holder.borrowed.push(BookId(9));
        let dangling = Catalog::from_records(vec![Book::new(1, "A", "x", "g")], vec![holder]);
        assert!(matches!(dangling, Err(CatalogError::InvalidCatalog(_))));

        let mut holder = User::new(1, "a");
        holder.borrowed.push(BookId(1));
        let available_but_held =
            Catalog::from_records(vec![Book::new(1, "A", "x", "g")], vec![holder]);
        assert!(matches!(
            available_but_held,
            Err(CatalogError::InvalidCatalog(_))
        ));
    }
}
