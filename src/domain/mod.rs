//! Domain layer - Pure business abstractions
//!
//! No HTTP client types leak out of here except through error conversions.
//! Only trait definitions and domain error types.

pub mod errors;
pub mod repositories;

pub use errors::{TransportError, ValidationError, ValidationErrorKind};
pub use repositories::BookStore;
