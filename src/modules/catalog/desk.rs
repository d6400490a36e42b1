//! The lending desk: two text fields, a handful of buttons, and a notice for every press.

use std::fmt;

use super::error::CatalogError;
use super::models::{BookId, SearchOutcome, UserId};
use super::service::Catalog;
use crate::utils::{parse_id, parse_id_pair};

const HELP: &str = "\
borrow <user id> <book id>   check a book out
return <user id> <book id>   bring a book back
list                         show every book
search [keyword]             find books by title or author
loans <user id>              show a user's borrowed books
help                         show this list
quit                         leave the desk";

/// Titled message answering one desk action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub message: String,
}

impl Notice {
    pub const SUCCESS: &'static str = "Success";
    pub const ERROR: &'static str = "Error";
    pub const ALL_BOOKS: &'static str = "All Books";
    pub const SEARCH_RESULTS: &'static str = "Search Results";
    pub const LOANS: &'static str = "Borrowed Books";
    pub const HELP: &'static str = "Help";

    fn new(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            title,
            message: message.into(),
        }
    }

    fn error(err: &CatalogError) -> Self {
        Self::new(Self::ERROR, err.to_string())
    }

    pub fn is_error(&self) -> bool {
        self.title == Self::ERROR
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.contains('\n') || self.message.is_empty() {
            write!(f, "{}:\n{}", self.title, self.message)
        } else {
            write!(f, "{}: {}", self.title, self.message)
        }
    }
}

/// What the desk did with a typed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeskReply {
    Notice(Notice),
    Quit,
    Idle,
}

/// Owns a catalog and the raw contents of the user id and book id fields.
pub struct Desk {
    catalog: Catalog,
    pub user_id: String,
    pub book_id: String,
}

impl Desk {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            user_id: String::new(),
            book_id: String::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn fill(&mut self, user_id: impl Into<String>, book_id: impl Into<String>) {
        self.user_id = user_id.into();
        self.book_id = book_id.into();
    }

    fn ids(&self) -> Result<(UserId, BookId), CatalogError> {
        let (user, book) = parse_id_pair(&self.user_id, &self.book_id)?;
        Ok((UserId(user), BookId(book)))
    }

    pub fn borrow_book(&mut self) -> Notice {
        let result = self
            .ids()
            .and_then(|(user, book)| self.catalog.borrow(user, book));
        match result {
            Ok(receipt) => Notice::new(Notice::SUCCESS, receipt.message()),
            Err(err) => Notice::error(&err),
        }
    }

    pub fn return_book(&mut self) -> Notice {
        let result = self
            .ids()
            .and_then(|(user, book)| self.catalog.return_book(user, book));
        match result {
            Ok(receipt) => Notice::new(Notice::SUCCESS, receipt.message()),
            Err(err) => Notice::error(&err),
        }
    }

    pub fn view_books(&self) -> Notice {
        let lines: Vec<String> = self
            .catalog
            .list_all()
            .iter()
            .map(ToString::to_string)
            .collect();
        Notice::new(Notice::ALL_BOOKS, lines.join("\n"))
    }

    /// Searches with whatever is in the book id field.
    pub fn search_books(&self) -> Notice {
        let message = match self.catalog.search(&self.book_id) {
            SearchOutcome::Matches(listings) => listings
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
            SearchOutcome::NoResults => SearchOutcome::NO_RESULTS_MESSAGE.to_string(),
        };
        Notice::new(Notice::SEARCH_RESULTS, message)
    }

    pub fn view_loans(&self) -> Notice {
        let Ok(user_id) = parse_id(&self.user_id) else {
            return Notice::new(Notice::ERROR, "Please enter a valid User ID.");
        };
        match self.catalog.loans_of(UserId(user_id)) {
            Some(loans) if loans.is_empty() => Notice::new(Notice::LOANS, "No books borrowed."),
            Some(loans) => Notice::new(
                Notice::LOANS,
                loans
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            None => Notice::new(Notice::ERROR, "Invalid User ID."),
        }
    }

    /// Interpret one typed command.
    pub fn run_line(&mut self, line: &str) -> DeskReply {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return DeskReply::Idle;
        };
        let args: Vec<&str> = words.collect();

        let notice = match command.to_lowercase().as_str() {
            "borrow" | "return" => {
                match args.as_slice() {
                    [user, book] => self.fill(*user, *book),
                    _ => return DeskReply::Notice(Notice::error(&CatalogError::InvalidInput)),
                }
                if command.eq_ignore_ascii_case("borrow") {
                    self.borrow_book()
                } else {
                    self.return_book()
                }
            }
            "list" | "books" => self.view_books(),
            "search" => {
                self.book_id = args.join(" ");
                self.search_books()
            }
            "loans" => {
                self.user_id = args.first().copied().unwrap_or_default().to_string();
                self.view_loans()
            }
            "help" | "?" => Notice::new(Notice::HELP, HELP),
            "quit" | "exit" => return DeskReply::Quit,
            other => Notice::new(
                Notice::ERROR,
                format!("Unknown command '{}'. Type 'help' for the list of commands.", other),
            ),
        };

        DeskReply::Notice(notice)
    }
}
