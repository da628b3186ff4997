pub mod book;
pub mod serde_helpers;

pub use book::{BookId, BookRecord, Category, Language};
