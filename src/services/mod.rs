//! Services Layer
//!
//! Screen logic without any rendering: the form engine itself plus the two
//! admin screens built on top of it.

pub mod book_form;
pub mod form_engine;
pub mod store_manager;

// Re-export for convenience
pub use book_form::{BookEditForm, FormError, SubmitOutcome};
pub use form_engine::{
    DraftState, FieldKey, FieldValue, FormPhase, ValidationResult, initialize,
    to_submission_payload, update_field, validate, validate_for_year,
};
pub use store_manager::{BookRow, StoreManager, StoreManagerError};
