//! Store manager screen - the admin table of books
//!
//! Load failures do not close the screen: they become the banner and the
//! table stays empty until the next refresh.

use std::fmt;
use std::sync::Arc;

use crate::auth::{AccessDenied, AdminSession};
use crate::domain::BookStore;
use crate::models::{BookId, BookRecord};

pub const ADD_BOOK_ROUTE: &str = "/store-manager/add-book";

/// One line of the manage table
#[derive(Debug, Clone, PartialEq)]
pub struct BookRow {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: String,
    pub price: String,
}

impl From<&BookRecord> for BookRow {
    fn from(book: &BookRecord) -> Self {
        // Known categories show their label, anything else as stored
        let category = match (book.category_kind(), &book.category) {
            (Some(kind), _) => kind.label().to_string(),
            (None, Some(raw)) => raw.clone(),
            (None, None) => String::new(),
        };

        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            category,
            price: format!("฿{}", book.price),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreManagerError {
    Unauthorized(AccessDenied),
    /// The action is shown on screen but not enabled
    ActionDisabled(&'static str),
}

impl fmt::Display for StoreManagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreManagerError::Unauthorized(denied) => write!(f, "{}", denied),
            StoreManagerError::ActionDisabled(action) => {
                write!(f, "The {} action is not available", action)
            }
        }
    }
}

impl std::error::Error for StoreManagerError {}

impl From<AccessDenied> for StoreManagerError {
    fn from(e: AccessDenied) -> Self {
        StoreManagerError::Unauthorized(e)
    }
}

pub struct StoreManager {
    session: AdminSession,
    store: Arc<dyn BookStore>,
    books: Vec<BookRecord>,
    banner: Option<String>,
}

impl StoreManager {
    /// Gate on the session and fetch the table
    pub async fn load(
        session: AdminSession,
        store: Arc<dyn BookStore>,
    ) -> Result<Self, StoreManagerError> {
        session.require_admin()?;

        let mut manager = Self {
            session,
            store,
            books: Vec::new(),
            banner: None,
        };
        manager.refresh().await;
        Ok(manager)
    }

    pub async fn refresh(&mut self) {
        self.banner = None;
        match self.store.list().await {
            Ok(books) => {
                tracing::info!("Store manager showing {} books", books.len());
                self.books = books;
            }
            Err(e) => {
                tracing::error!("Failed to load books: {}", e);
                self.books.clear();
                self.banner = Some(e.to_string());
            }
        }
    }

    pub fn books(&self) -> &[BookRecord] {
        &self.books
    }

    pub fn rows(&self) -> Vec<BookRow> {
        self.books.iter().map(BookRow::from).collect()
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn add_book_route(&self) -> &'static str {
        ADD_BOOK_ROUTE
    }

    pub fn edit_route(&self, id: &BookId) -> String {
        edit_route(id)
    }

    /// Not enabled yet; never reaches the store
    pub fn delete(&self, id: &BookId) -> Result<(), StoreManagerError> {
        tracing::warn!("Delete requested for book {} but the action is disabled", id);
        Err(StoreManagerError::ActionDisabled("delete"))
    }

    pub fn logout(self) -> &'static str {
        self.session.sign_out()
    }
}

/// Route of the edit screen for a book
pub fn edit_route(id: &BookId) -> String {
    format!("/store-manager/edit/{}", id)
}
