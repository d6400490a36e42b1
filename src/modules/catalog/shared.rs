use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::error::CatalogError;
use super::models::{BookId, BookListing, LoanReceipt, SearchOutcome, UserId};
use super::service::Catalog;

/// Cloneable handle to one catalog. Every call holds the lock for the whole
/// lookup-check-mutate sequence, so concurrent borrows of a book cannot both win.
#[derive(Clone, Default)]
pub struct SharedCatalog {
    inner: Arc<Mutex<Catalog>>,
}

impl SharedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(Mutex::new(catalog)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Catalog> {
        // Operations never panic between their check and their mutation,
        // so a poisoned guard still holds consistent data.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn borrow(&self, user_id: UserId, book_id: BookId) -> Result<LoanReceipt, CatalogError> {
        self.lock().borrow(user_id, book_id)
    }

    pub fn return_book(
        &self,
        user_id: UserId,
        book_id: BookId,
    ) -> Result<LoanReceipt, CatalogError> {
        self.lock().return_book(user_id, book_id)
    }

    pub fn list_all(&self) -> Vec<BookListing> {
        self.lock().list_all()
    }

    pub fn search(&self, keyword: &str) -> SearchOutcome {
        self.lock().search(keyword)
    }

    pub fn loans_of(&self, user_id: UserId) -> Option<Vec<BookListing>> {
        self.lock().loans_of(user_id)
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> Catalog {
        self.lock().clone()
    }
}
