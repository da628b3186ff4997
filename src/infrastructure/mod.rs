//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Record store client over HTTP (http_store)

pub mod http_store;

pub use http_store::HttpBookStore;
