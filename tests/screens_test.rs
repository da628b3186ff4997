//! Edit and manage screen tests against an in-memory record store

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use bookstore_admin::auth::AdminSession;
use bookstore_admin::domain::{BookStore, TransportError, ValidationErrorKind};
use bookstore_admin::models::{BookId, BookRecord};
use bookstore_admin::services::{
    BookEditForm, FieldKey, FormError, FormPhase, StoreManager, StoreManagerError, SubmitOutcome,
};

/// Store double that records writes and can fail on demand
#[derive(Default)]
struct MemoryStore {
    books: Mutex<HashMap<BookId, BookRecord>>,
    saved: Mutex<Vec<BookRecord>>,
    list_failure: Mutex<Option<TransportError>>,
    replace_failures: Mutex<VecDeque<TransportError>>,
}

impl MemoryStore {
    fn with_books(books: Vec<BookRecord>) -> Arc<Self> {
        let store = Self::default();
        {
            let mut map = store.books.lock().unwrap();
            for book in books {
                map.insert(book.id.clone(), book);
            }
        }
        Arc::new(store)
    }

    fn saved(&self) -> Vec<BookRecord> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn list(&self) -> Result<Vec<BookRecord>, TransportError> {
        if let Some(e) = self.list_failure.lock().unwrap().clone() {
            return Err(e);
        }
        let mut books: Vec<BookRecord> = self.books.lock().unwrap().values().cloned().collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn get(&self, id: &BookId) -> Result<BookRecord, TransportError> {
        self.books
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or(TransportError::NotFound)
    }

    async fn replace(&self, id: &BookId, record: &BookRecord) -> Result<(), TransportError> {
        if let Some(e) = self.replace_failures.lock().unwrap().pop_front() {
            return Err(e);
        }
        self.books.lock().unwrap().insert(id.clone(), record.clone());
        self.saved.lock().unwrap().push(record.clone());
        Ok(())
    }
}

// Helper to create a test book
fn book(id: i64, title: &str) -> BookRecord {
    BookRecord {
        id: BookId::Number(id),
        title: title.to_string(),
        author: "Ursula K. Le Guin".to_string(),
        year: Some(1969),
        category: Some("fiction".to_string()),
        price: 350.0,
        ..Default::default()
    }
}

fn admin() -> AdminSession {
    AdminSession::with_flag(true)
}

#[tokio::test]
async fn test_open_requires_admin() {
    let store = MemoryStore::with_books(vec![book(1, "The Dispossessed")]);

    let result = BookEditForm::open(AdminSession::with_flag(false), store, BookId::Number(1)).await;

    match result {
        Err(FormError::Unauthorized(denied)) => assert_eq!(denied.redirect, "/login"),
        _ => panic!("Expected Unauthorized"),
    }
}

#[tokio::test]
async fn test_open_missing_book() {
    let store = MemoryStore::with_books(vec![]);

    let result = BookEditForm::open(admin(), store, BookId::Number(404)).await;

    match result {
        Err(FormError::Transport(e)) => {
            assert_eq!(e, TransportError::NotFound);
            assert_eq!(e.to_string(), "Book not found");
        }
        _ => panic!("Expected NotFound"),
    }
}

#[tokio::test]
async fn test_edit_and_save() {
    let store = MemoryStore::with_books(vec![book(1, "The Dispossessed")]);
    let mut form = BookEditForm::open(admin(), store.clone(), BookId::Number(1))
        .await
        .expect("Failed to open form");

    assert_eq!(form.draft().title, "The Dispossessed");
    assert_eq!(form.phase(), FormPhase::Submittable);

    form.set_field(FieldKey::OriginalPrice, "500");
    form.set_field(FieldKey::Discount, "10");
    form.set_field(FieldKey::Title, "  The Left Hand of Darkness ");
    form.set_field(FieldKey::IsNew, true);
    assert_eq!(form.draft().price, "450.00");

    match form.submit().await {
        SubmitOutcome::Saved { record, redirect } => {
            assert_eq!(redirect, "/store-manager");
            assert_eq!(record.title, "The Left Hand of Darkness");
            assert_eq!(record.price, 450.0);
            assert_eq!(record.original_price, Some(500.0));
            assert_eq!(record.discount, 10);
            assert!(record.is_new);
        }
        other => panic!("Expected Saved, got {:?}", other),
    }

    let saved = store.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id, BookId::Number(1));
    assert_eq!(saved[0].author, "Ursula K. Le Guin");
}

#[tokio::test]
async fn test_invalid_draft_is_not_sent() {
    let store = MemoryStore::with_books(vec![book(1, "The Dispossessed")]);
    let mut form = BookEditForm::open(admin(), store.clone(), BookId::Number(1))
        .await
        .expect("Failed to open form");

    form.set_field(FieldKey::Title, "");
    form.set_field(FieldKey::Price, "-5");

    match form.submit().await {
        SubmitOutcome::Blocked(result) => {
            assert_eq!(result.kind(FieldKey::Title), Some(ValidationErrorKind::Required));
            assert_eq!(result.kind(FieldKey::Price), Some(ValidationErrorKind::Negative));
        }
        other => panic!("Expected Blocked, got {:?}", other),
    }

    assert!(store.saved().is_empty());
    assert_eq!(form.errors().len(), 2);
    assert_eq!(form.phase(), FormPhase::EditingWithErrors);

    // Fixing one field clears its message right away
    form.set_field(FieldKey::Title, "Always Coming Home");
    assert_eq!(form.errors().len(), 1);

    form.set_field(FieldKey::Price, "120");
    assert!(matches!(form.submit().await, SubmitOutcome::Saved { .. }));
    assert_eq!(store.saved().len(), 1);
}

#[tokio::test]
async fn test_failed_save_sets_banner_and_allows_retry() {
    let store = MemoryStore::with_books(vec![book(2, "Lavinia")]);
    store
        .replace_failures
        .lock()
        .unwrap()
        .push_back(TransportError::Status(500));

    let mut form = BookEditForm::open(admin(), store.clone(), BookId::Number(2))
        .await
        .expect("Failed to open form");
    form.set_field(FieldKey::Pages, "279");

    let outcome = form.submit().await;
    assert_eq!(outcome, SubmitOutcome::Failed(TransportError::Status(500)));
    assert_eq!(
        form.banner(),
        Some("Fetch failed: 500")
    );
    // Draft survives the failure
    assert_eq!(form.draft().pages, "279");

    // Retry goes through and clears the banner
    assert!(matches!(form.submit().await, SubmitOutcome::Saved { .. }));
    assert_eq!(form.banner(), None);
    assert_eq!(store.saved()[0].pages, Some(279));
}

#[tokio::test]
async fn test_manager_lists_rows() {
    let store = MemoryStore::with_books(vec![book(2, "Lavinia"), book(1, "Earthsea")]);

    let manager = StoreManager::load(admin(), store)
        .await
        .expect("Failed to load manager");

    assert_eq!(manager.banner(), None);
    let rows = manager.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].title, "Earthsea");
    assert_eq!(rows[0].category, "Fiction");
    assert_eq!(rows[0].price, "฿350");
    assert_eq!(manager.edit_route(&rows[0].id), "/store-manager/edit/1");
    assert_eq!(manager.add_book_route(), "/store-manager/add-book");
}

#[tokio::test]
async fn test_manager_requires_admin() {
    let store = MemoryStore::with_books(vec![]);

    let result = StoreManager::load(AdminSession::with_flag(false), store).await;
    assert!(matches!(result, Err(StoreManagerError::Unauthorized(_))));
}

#[tokio::test]
async fn test_manager_load_failure_becomes_banner() {
    let store = MemoryStore::with_books(vec![book(1, "Earthsea")]);
    *store.list_failure.lock().unwrap() = Some(TransportError::Status(502));

    let mut manager = StoreManager::load(admin(), store.clone())
        .await
        .expect("Load should not fail on transport errors");

    assert!(manager.is_empty());
    assert_eq!(
        manager.banner(),
        Some("Fetch failed: 502")
    );

    *store.list_failure.lock().unwrap() = None;
    manager.refresh().await;
    assert_eq!(manager.banner(), None);
    assert_eq!(manager.books().len(), 1);
}

#[tokio::test]
async fn test_delete_is_disabled() {
    let store = MemoryStore::with_books(vec![book(1, "Earthsea")]);
    let manager = StoreManager::load(admin(), store.clone())
        .await
        .expect("Failed to load manager");

    let err = manager.delete(&BookId::Number(1)).unwrap_err();
    assert_eq!(err, StoreManagerError::ActionDisabled("delete"));

    // Record is still there
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_logout_revokes_session_for_other_screens() {
    let session = admin();
    let store = MemoryStore::with_books(vec![book(1, "Earthsea")]);

    let manager = StoreManager::load(session.clone(), store.clone())
        .await
        .expect("Failed to load manager");
    assert_eq!(manager.logout(), "/login");

    let result = BookEditForm::open(session, store, BookId::Number(1)).await;
    assert!(matches!(result, Err(FormError::Unauthorized(_))));
}
