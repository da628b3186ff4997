//! Book edit screen - load, edit, validate and save one record
//!
//! The form owns a single draft. Every edit replaces it through the form
//! engine; saving sends the whole normalized record back to the store.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::auth::{AccessDenied, AdminSession};
use crate::domain::{BookStore, TransportError, ValidationError};
use crate::models::{BookId, BookRecord};
use crate::services::form_engine::{
    self, DraftState, FieldKey, FieldValue, FormPhase, ValidationResult,
};

/// Where the user lands after a successful save
pub const STORE_MANAGER_ROUTE: &str = "/store-manager";

/// Error type for opening the form
#[derive(Debug)]
pub enum FormError {
    Unauthorized(AccessDenied),
    Transport(TransportError),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::Unauthorized(denied) => write!(f, "{}", denied),
            FormError::Transport(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FormError {}

impl From<AccessDenied> for FormError {
    fn from(e: AccessDenied) -> Self {
        FormError::Unauthorized(e)
    }
}

impl From<TransportError> for FormError {
    fn from(e: TransportError) -> Self {
        FormError::Transport(e)
    }
}

/// Result of one save attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent
    Blocked(ValidationResult),
    /// Store accepted the record
    Saved {
        record: BookRecord,
        redirect: &'static str,
    },
    /// Store rejected the request or could not be reached; the banner is set
    Failed(TransportError),
}

pub struct BookEditForm {
    store: Arc<dyn BookStore>,
    id: BookId,
    draft: DraftState,
    banner: Option<String>,
}

impl BookEditForm {
    /// Gate on the session, then fetch the record and start a draft from it
    pub async fn open(
        session: AdminSession,
        store: Arc<dyn BookStore>,
        id: BookId,
    ) -> Result<Self, FormError> {
        session.require_admin()?;

        tracing::info!("Opening edit form for book {}", id);
        let record = store.get(&id).await.inspect_err(|e| {
            tracing::error!("Failed to load book {}: {}", id, e);
        })?;

        Ok(Self {
            store,
            draft: form_engine::initialize(&record),
            id,
            banner: None,
        })
    }

    pub fn id(&self) -> &BookId {
        &self.id
    }

    pub fn draft(&self) -> &DraftState {
        &self.draft
    }

    pub fn errors(&self) -> &BTreeMap<FieldKey, ValidationError> {
        &self.draft.errors
    }

    /// Page-level message from the last failed save
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn phase(&self) -> FormPhase {
        form_engine::phase(&self.draft)
    }

    pub fn set_field(&mut self, field: FieldKey, raw: impl Into<FieldValue>) {
        self.draft = form_engine::update_field(&self.draft, field, raw);
    }

    /// Validate and, when clean, replace the stored record.
    ///
    /// Takes `&mut self`, so a second save cannot start while one is in
    /// flight.
    pub async fn submit(&mut self) -> SubmitOutcome {
        self.banner = None;

        let result = form_engine::validate(&self.draft);
        self.draft = self.draft.with_errors(&result);
        if !result.is_valid() {
            tracing::info!(
                "Save of book {} blocked by {} validation error(s)",
                self.id,
                result.len()
            );
            return SubmitOutcome::Blocked(result);
        }

        let payload = form_engine::to_submission_payload(&self.draft);
        match self.store.replace(&self.id, &payload).await {
            Ok(()) => SubmitOutcome::Saved {
                record: payload,
                redirect: STORE_MANAGER_ROUTE,
            },
            Err(e) => {
                tracing::error!("Failed to save book {}: {}", self.id, e);
                self.banner = Some(e.to_string());
                SubmitOutcome::Failed(e)
            }
        }
    }
}
