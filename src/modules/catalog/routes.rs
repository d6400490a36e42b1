use axum::{
    extract::{FromRequest, Path, Query, Request, State},
    routing::{get, post},
    Json, Router,
};
use libris_http::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::CatalogError;
use super::models::{BookId, BookListing, LoanReceipt, SearchOutcome, UserId};
use super::shared::SharedCatalog;
use crate::utils::parse_id;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        let code = err.code();
        match err {
            CatalogError::InvalidInput => AppError::validation(Vec::new(), message),
            CatalogError::NotFound { .. } => AppError::not_found(message),
            CatalogError::AlreadyCheckedOut { book_id, .. } => AppError::conflict(
                code,
                vec![json!({ "book_id": book_id })],
                message,
            ),
            CatalogError::NotBorrowedByUser {
                user_id, book_id, ..
            } => AppError::conflict(
                code,
                vec![json!({ "user_id": user_id, "book_id": book_id })],
                message,
            ),
            CatalogError::InvalidCatalog(reason) => AppError::Internal(anyhow::anyhow!(reason)),
        }
    }
}

/// A form field as typed: JSON strings and numbers are both accepted and checked as text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Text(String),
    Number(serde_json::Number),
}

impl RawField {
    fn as_text(&self) -> String {
        match self {
            RawField::Text(text) => text.clone(),
            RawField::Number(number) => number.to_string(),
        }
    }
}

/// Body of the borrow and return endpoints. A missing or `null` field counts as left blank.
#[derive(Debug, Clone, Deserialize)]
pub struct LoanForm {
    #[serde(default)]
    pub user_id: Option<RawField>,
    #[serde(default)]
    pub book_id: Option<RawField>,
}

fn field_text(field: &Option<RawField>) -> String {
    field.as_ref().map(RawField::as_text).unwrap_or_default()
}

impl LoanForm {
    fn ids(&self) -> Result<(UserId, BookId), AppError> {
        let user = parse_id(&field_text(&self.user_id));
        let book = parse_id(&field_text(&self.book_id));

        match (user, book) {
            (Ok(user), Ok(book)) => Ok((UserId(user), BookId(book))),
            (user, book) => {
                let details = [("user_id", user.is_err()), ("book_id", book.is_err())]
                    .into_iter()
                    .filter(|(_, failed)| *failed)
                    .map(|(field, _)| json!({ "field": field, "error": "not_a_non_negative_integer" }))
                    .collect();
                Err(AppError::validation(
                    details,
                    CatalogError::InvalidInput.to_string(),
                ))
            }
        }
    }
}

/// JSON loan form whose rejections answer with the uniform error body.
pub struct LoanBody(pub LoanForm);

impl<S> FromRequest<S> for LoanBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(form) = Json::<LoanForm>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection.body_text(), "loan form rejected");
                AppError::validation(
                    vec![json!({ "field": "body", "error": "malformed_loan_form" })],
                    CatalogError::InvalidInput.to_string(),
                )
            })?;
        Ok(Self(form))
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// A listing plus its rendered line.
#[derive(Debug, Serialize)]
pub struct ListingView {
    #[serde(flatten)]
    pub listing: BookListing,
    pub line: String,
}

impl From<BookListing> for ListingView {
    fn from(listing: BookListing) -> Self {
        let line = listing.to_string();
        Self { listing, line }
    }
}

#[derive(Debug, Serialize)]
pub struct ReceiptView {
    #[serde(flatten)]
    pub receipt: LoanReceipt,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SearchView {
    pub results: Vec<ListingView>,
    pub message: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct LoansView {
    pub user_id: UserId,
    pub loans: Vec<ListingView>,
}

pub fn router(catalog: SharedCatalog) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/books", get(list_books))
        .route("/books/search", get(search_books))
        .route("/loans/borrow", post(borrow_book))
        .route("/loans/return", post(return_book))
        .route("/users/{id}/loans", get(user_loans))
        .with_state(catalog)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "catalog module is healthy"
}

async fn list_books(State(catalog): State<SharedCatalog>) -> Json<Vec<ListingView>> {
    Json(catalog.list_all().into_iter().map(ListingView::from).collect())
}

async fn search_books(
    State(catalog): State<SharedCatalog>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchView> {
    let view = match catalog.search(&query.q) {
        SearchOutcome::Matches(listings) => SearchView {
            results: listings.into_iter().map(ListingView::from).collect(),
            message: None,
        },
        SearchOutcome::NoResults => SearchView {
            results: Vec::new(),
            message: Some(SearchOutcome::NO_RESULTS_MESSAGE),
        },
    };
    Json(view)
}

async fn borrow_book(
    State(catalog): State<SharedCatalog>,
    LoanBody(form): LoanBody,
) -> Result<Json<ReceiptView>, AppError> {
    let (user_id, book_id) = form.ids()?;
    let receipt = catalog.borrow(user_id, book_id)?;
    let message = receipt.message();
    Ok(Json(ReceiptView { receipt, message }))
}

async fn return_book(
    State(catalog): State<SharedCatalog>,
    LoanBody(form): LoanBody,
) -> Result<Json<ReceiptView>, AppError> {
    let (user_id, book_id) = form.ids()?;
    let receipt = catalog.return_book(user_id, book_id)?;
    let message = receipt.message();
    Ok(Json(ReceiptView { receipt, message }))
}

async fn user_loans(
    State(catalog): State<SharedCatalog>,
    Path(raw_id): Path<String>,
) -> Result<Json<LoansView>, AppError> {
    let user_id = parse_id(&raw_id).map(UserId).map_err(|_| {
        AppError::validation(
            vec![json!({ "field": "id", "error": "not_a_non_negative_integer" })],
            "Please enter a valid User ID.",
        )
    })?;

    let loans = catalog
        .loans_of(user_id)
        .ok_or_else(|| AppError::not_found("Invalid User ID."))?;

    Ok(Json(LoansView {
        user_id,
        loans: loans.into_iter().map(ListingView::from).collect(),
    }))
}
