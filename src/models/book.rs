use serde::{Deserialize, Serialize};
use std::fmt;

use super::serde_helpers;

/// Server-assigned record identifier.
///
/// The record store hands out either numeric or string ids, so both are kept
/// in their original JSON shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookId {
    Number(i64),
    Text(String),
}

impl Default for BookId {
    fn default() -> Self {
        BookId::Text(String::new())
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookId::Number(n) => write!(f, "{}", n),
            BookId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for BookId {
    fn from(id: i64) -> Self {
        BookId::Number(id)
    }
}

impl From<&str> for BookId {
    fn from(id: &str) -> Self {
        // Command-line ids arrive as text; keep numeric ones numeric
        match id.parse::<i64>() {
            Ok(n) => BookId::Number(n),
            Err(_) => BookId::Text(id.to_string()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    Thai,
    English,
    Other,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Thai => "Thai",
            Language::English => "English",
            Language::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Thai" => Some(Language::Thai),
            "English" => Some(Language::English),
            "Other" => Some(Language::Other),
            _ => None,
        }
    }
}

/// Shelf categories offered by the edit form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Fiction,
    NonFiction,
    Psychology,
    Business,
    Technology,
    History,
}

impl Category {
    const ALL: [Category; 6] = [
        Category::Fiction,
        Category::NonFiction,
        Category::Psychology,
        Category::Business,
        Category::Technology,
        Category::History,
    ];

    /// Value stored in the record
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fiction => "fiction",
            Category::NonFiction => "non-fiction",
            Category::Psychology => "psychology",
            Category::Business => "business",
            Category::Technology => "technology",
            Category::History => "history",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Fiction => "Fiction",
            Category::NonFiction => "Non-fiction",
            Category::Psychology => "Psychology",
            Category::Business => "Business",
            Category::Technology => "Technology",
            Category::History => "History",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

/// A book as exchanged with the record store.
///
/// Every key is optional on the wire; missing keys and `null`s take their
/// defaults so a sparse record from the server can still be edited.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookRecord {
    #[serde(deserialize_with = "serde_helpers::null_as_default")]
    pub id: BookId,
    #[serde(deserialize_with = "serde_helpers::null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "serde_helpers::null_as_default")]
    pub author: String,
    pub isbn: Option<String>,
    pub year: Option<i32>,
    /// Raw category value, see [`Category`] for the known set
    pub category: Option<String>,
    #[serde(deserialize_with = "serde_helpers::null_as_default")]
    pub price: f64,
    pub original_price: Option<f64>,
    #[serde(deserialize_with = "serde_helpers::null_as_default")]
    pub discount: i32,
    pub cover_image: Option<String>,
    #[serde(deserialize_with = "serde_helpers::null_as_default")]
    pub rating: f64,
    #[serde(deserialize_with = "serde_helpers::null_as_default")]
    pub reviews_count: i32,
    #[serde(deserialize_with = "serde_helpers::null_as_default")]
    pub is_new: bool,
    pub pages: Option<i32>,
    #[serde(deserialize_with = "serde_helpers::lenient_language")]
    pub language: Language,
    pub publisher: Option<String>,
    pub description: Option<String>,
}

impl BookRecord {
    pub fn category_kind(&self) -> Option<Category> {
        self.category.as_deref().and_then(Category::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_record_takes_defaults() {
        let record: BookRecord =
            serde_json::from_str(r#"{"id": 7, "title": "Dune", "price": 320.5}"#).unwrap();

        assert_eq!(record.id, BookId::Number(7));
        assert_eq!(record.title, "Dune");
        assert_eq!(record.language, Language::Thai);
        assert_eq!(record.discount, 0);
        assert!(record.original_price.is_none());
        assert!(!record.is_new);
    }

    #[test]
    fn test_nulls_and_unknown_language_take_defaults() {
        let record: BookRecord = serde_json::from_str(
            r#"{"id": 9, "title": null, "author": null, "price": null, "discount": null,
                "rating": null, "reviews_count": null, "is_new": null,
                "language": "Japanese", "year": null, "pages": null}"#,
        )
        .unwrap();

        assert_eq!(record.title, "");
        assert_eq!(record.price, 0.0);
        assert_eq!(record.discount, 0);
        assert_eq!(record.language, Language::Thai);
        assert_eq!(record.year, None);

        let record: BookRecord = serde_json::from_str(r#"{"language": null}"#).unwrap();
        assert_eq!(record.language, Language::Thai);
        let record: BookRecord = serde_json::from_str(r#"{"language": "English"}"#).unwrap();
        assert_eq!(record.language, Language::English);
    }

    #[test]
    fn test_string_ids_keep_their_shape() {
        let record: BookRecord = serde_json::from_str(r#"{"id": "b-42"}"#).unwrap();
        assert_eq!(record.id, BookId::Text("b-42".to_string()));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "b-42");
    }

    #[test]
    fn test_category_lookup() {
        let record = BookRecord {
            category: Some("non-fiction".to_string()),
            ..Default::default()
        };
        assert_eq!(record.category_kind(), Some(Category::NonFiction));
        assert_eq!(Category::parse("poetry"), None);
    }
}
