//! Repository trait definitions
//!
//! The record store lives behind an HTTP API. Screens only see this trait;
//! the reqwest implementation is in the infrastructure layer.

use async_trait::async_trait;

use super::TransportError;
use crate::models::{BookId, BookRecord};

/// Access to the remote book records.
///
/// There is no delete operation: the list screen shows a delete button but
/// the action is disabled until its behavior is settled.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Fetch every record for the manage table
    async fn list(&self) -> Result<Vec<BookRecord>, TransportError>;

    /// Fetch one record by id
    async fn get(&self, id: &BookId) -> Result<BookRecord, TransportError>;

    /// Replace a record wholesale
    async fn replace(&self, id: &BookId, record: &BookRecord) -> Result<(), TransportError>;
}
