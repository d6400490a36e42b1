pub mod desk;
pub mod error;
pub mod models;
pub mod routes;
pub mod seed;
pub mod service;
pub mod shared;

pub use desk::{Desk, DeskReply, Notice};
pub use error::CatalogError;
pub use models::{Book, BookId, BookListing, BookStatus, LoanReceipt, SearchOutcome, User, UserId};
pub use service::Catalog;
pub use shared::SharedCatalog;

use async_trait::async_trait;
use axum::Router;
use libris_kernel::{settings::CatalogSettings, InitCtx, Module};
use serde_json::json;

/// Catalog module: serves the lending operations over one shared catalog
pub struct CatalogModule {
    catalog: SharedCatalog,
}

impl CatalogModule {
    pub fn new(catalog: SharedCatalog) -> Self {
        Self { catalog }
    }

    pub fn from_settings(settings: &CatalogSettings) -> Self {
        let catalog = if settings.seed_data {
            Catalog::seeded()
        } else {
            Catalog::empty()
        };
        Self::new(SharedCatalog::new(catalog))
    }

    pub fn catalog(&self) -> &SharedCatalog {
        &self.catalog
    }
}

#[async_trait]
impl Module for CatalogModule {
    fn name(&self) -> &'static str {
        "catalog"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let snapshot = self.catalog.snapshot();
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books = snapshot.books().len(),
            users = snapshot.users().len(),
            "catalog module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.catalog.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "catalog module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let snapshot = self.catalog.snapshot();
        let on_loan: usize = snapshot.users().iter().map(|u| u.borrowed.len()).sum();
        tracing::info!(
            module = self.name(),
            on_loan,
            "catalog module stopped, loan state discarded"
        );
        Ok(())
    }
}

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn loan_operation(summary: &str, conflict: &str) -> serde_json::Value {
    json!({
        "post": {
            "summary": summary,
            "tags": ["Catalog"],
            "requestBody": {
                "required": true,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/LoanForm" }
                    }
                }
            },
            "responses": {
                "200": {
                    "description": "Loan receipt",
                    "content": {
                        "application/json": {
                            "schema": { "$ref": "#/components/schemas/LoanReceipt" }
                        }
                    }
                },
                "404": error_response("Invalid User ID or Book ID"),
                "409": error_response(conflict),
                "422": error_response("User ID or Book ID is not a non-negative integer")
            }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let listing_array = json!({
        "type": "array",
        "items": { "$ref": "#/components/schemas/BookListing" }
    });

    json!({
        "paths": {
            "/health": {
                "get": {
                    "summary": "Catalog health check",
                    "tags": ["Catalog"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            },
            "/books": {
                "get": {
                    "summary": "List every book in catalog order",
                    "tags": ["Catalog"],
                    "responses": {
                        "200": {
                            "description": "All books",
                            "content": { "application/json": { "schema": listing_array } }
                        }
                    }
                }
            },
            "/books/search": {
                "get": {
                    "summary": "Search books by title or author",
                    "tags": ["Catalog"],
                    "parameters": [{
                        "name": "q",
                        "in": "query",
                        "required": false,
                        "schema": { "type": "string" },
                        "description": "Case-insensitive keyword; empty matches everything"
                    }],
                    "responses": {
                        "200": {
                            "description": "Matching books, or a no-results message",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/SearchResults" }
                                }
                            }
                        }
                    }
                }
            },
            "/loans/borrow": loan_operation("Borrow a book", "Book is already checked out"),
            "/loans/return": loan_operation("Return a book", "User hasn't borrowed the book"),
            "/users/{id}/loans": {
                "get": {
                    "summary": "Books currently held by a user",
                    "tags": ["Catalog"],
                    "parameters": [{
                        "name": "id",
                        "in": "path",
                        "required": true,
                        "schema": { "type": "string" }
                    }],
                    "responses": {
                        "200": {
                            "description": "Borrowed books in borrow order",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "user_id": { "type": "integer" },
                                            "loans": listing_array
                                        },
                                        "required": ["user_id", "loans"]
                                    }
                                }
                            }
                        },
                        "404": error_response("Invalid User ID"),
                        "422": error_response("User ID is not a non-negative integer")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "BookListing": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer" },
                        "title": { "type": "string" },
                        "status": { "type": "string", "enum": ["Available", "Checked Out"] },
                        "line": { "type": "string", "description": "Rendered as `id. title (status)`" }
                    },
                    "required": ["id", "title", "status", "line"]
                },
                "SearchResults": {
                    "type": "object",
                    "properties": {
                        "results": {
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/BookListing" }
                        },
                        "message": { "type": "string" }
                    },
                    "required": ["results"]
                },
                "LoanForm": {
                    "type": "object",
                    "properties": {
                        "user_id": { "type": "string", "description": "Digits only" },
                        "book_id": { "type": "string", "description": "Digits only" }
                    },
                    "required": ["user_id", "book_id"]
                },
                "LoanReceipt": {
                    "type": "object",
                    "properties": {
                        "action": { "type": "string", "enum": ["borrowed", "returned"] },
                        "user_id": { "type": "integer" },
                        "book_id": { "type": "integer" },
                        "title": { "type": "string" },
                        "message": { "type": "string" }
                    },
                    "required": ["action", "user_id", "book_id", "title", "message"]
                }
            }
        }
    })
}

/// Create a catalog module from settings
pub fn create_module(settings: &CatalogSettings) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(CatalogModule::from_settings(settings))
}
