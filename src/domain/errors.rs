//! Domain error types
//!
//! Two families: validation errors are field-scoped and shown next to the
//! field, transport errors come from the record store and end up in the page
//! banner.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Field is empty or whitespace-only
    Required,
    /// Field is shorter than its minimum length
    TooShort,
    /// Field contains characters outside its allowed set
    InvalidFormat,
    /// Numeric field outside its allowed bounds
    OutOfRange,
    /// Numeric field below zero
    Negative,
}

/// One field-level failure with the message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Record store failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Store answered 404 for the requested record
    NotFound,
    /// Any other non-success status
    Status(u16),
    /// Request never got an answer
    Network(String),
    /// Answer body was not the expected JSON
    Decode(String),
    /// Base URL and id could not form a request URL
    InvalidUrl(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::NotFound => write!(f, "Book not found"),
            TransportError::Status(code) => write!(f, "Fetch failed: {}", code),
            TransportError::Network(msg) => write!(f, "Network error: {}", msg),
            TransportError::Decode(msg) => write!(f, "Unexpected response: {}", msg),
            TransportError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            TransportError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            TransportError::Status(status.as_u16())
        } else {
            TransportError::Network(e.to_string())
        }
    }
}

impl From<url::ParseError> for TransportError {
    fn from(e: url::ParseError) -> Self {
        TransportError::InvalidUrl(e.to_string())
    }
}
