//! Book form engine - draft state, derived pricing and validation
//!
//! All operations are pure: they take a draft and hand back a new one (or a
//! result), so the edit screen can keep exactly one draft and replace it on
//! every keystroke.

use chrono::Datelike;
use std::collections::BTreeMap;

use crate::domain::{ValidationError, ValidationErrorKind};
use crate::models::{BookId, BookRecord, Language};
use crate::utils::numeric::{format_cents, parse_float, parse_int};

const MIN_YEAR: i32 = 1000;
const MIN_TITLE_CHARS: usize = 2;

/// Editable fields of the book form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    Title,
    Author,
    Isbn,
    Year,
    Category,
    Price,
    OriginalPrice,
    Discount,
    CoverImage,
    Rating,
    ReviewsCount,
    IsNew,
    Pages,
    Language,
    Publisher,
    Description,
}

impl FieldKey {
    pub const ALL: [FieldKey; 16] = [
        FieldKey::Title,
        FieldKey::Author,
        FieldKey::Isbn,
        FieldKey::Year,
        FieldKey::Category,
        FieldKey::Price,
        FieldKey::OriginalPrice,
        FieldKey::Discount,
        FieldKey::CoverImage,
        FieldKey::Rating,
        FieldKey::ReviewsCount,
        FieldKey::IsNew,
        FieldKey::Pages,
        FieldKey::Language,
        FieldKey::Publisher,
        FieldKey::Description,
    ];

    /// Wire name, same as the record's JSON key
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Title => "title",
            FieldKey::Author => "author",
            FieldKey::Isbn => "isbn",
            FieldKey::Year => "year",
            FieldKey::Category => "category",
            FieldKey::Price => "price",
            FieldKey::OriginalPrice => "original_price",
            FieldKey::Discount => "discount",
            FieldKey::CoverImage => "cover_image",
            FieldKey::Rating => "rating",
            FieldKey::ReviewsCount => "reviews_count",
            FieldKey::IsNew => "is_new",
            FieldKey::Pages => "pages",
            FieldKey::Language => "language",
            FieldKey::Publisher => "publisher",
            FieldKey::Description => "description",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

/// Raw input coming from a form control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

/// In-progress edit of one record.
///
/// Every field is always present; what the user has not filled in is an
/// empty string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftState {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub year: String,
    pub category: String,
    pub price: String,
    pub original_price: String,
    pub discount: String,
    pub cover_image: String,
    pub rating: String,
    pub reviews_count: String,
    pub is_new: bool,
    pub pages: String,
    pub language: String,
    pub publisher: String,
    pub description: String,
    /// Errors from the last failed validation, cleared field by field on edit
    pub errors: BTreeMap<FieldKey, ValidationError>,
}

impl DraftState {
    /// Text content of a field, `None` for the `is_new` checkbox
    pub fn text(&self, field: FieldKey) -> Option<&str> {
        let value = match field {
            FieldKey::Title => &self.title,
            FieldKey::Author => &self.author,
            FieldKey::Isbn => &self.isbn,
            FieldKey::Year => &self.year,
            FieldKey::Category => &self.category,
            FieldKey::Price => &self.price,
            FieldKey::OriginalPrice => &self.original_price,
            FieldKey::Discount => &self.discount,
            FieldKey::CoverImage => &self.cover_image,
            FieldKey::Rating => &self.rating,
            FieldKey::ReviewsCount => &self.reviews_count,
            FieldKey::IsNew => return None,
            FieldKey::Pages => &self.pages,
            FieldKey::Language => &self.language,
            FieldKey::Publisher => &self.publisher,
            FieldKey::Description => &self.description,
        };
        Some(value.as_str())
    }

    /// Copy of this draft carrying the errors of `result`
    pub fn with_errors(&self, result: &ValidationResult) -> Self {
        Self {
            errors: result.errors.clone(),
            ..self.clone()
        }
    }

    fn assign(&mut self, field: FieldKey, value: FieldValue) {
        let text = match (field, value) {
            (FieldKey::IsNew, FieldValue::Flag(b)) => {
                self.is_new = b;
                return;
            }
            (FieldKey::IsNew, FieldValue::Text(s)) => {
                self.is_new = matches!(
                    s.trim().to_ascii_lowercase().as_str(),
                    "true" | "on" | "1" | "yes"
                );
                return;
            }
            (_, FieldValue::Text(s)) => s,
            (_, FieldValue::Flag(b)) => b.to_string(),
        };

        let slot = match field {
            FieldKey::Title => &mut self.title,
            FieldKey::Author => &mut self.author,
            FieldKey::Isbn => &mut self.isbn,
            FieldKey::Year => &mut self.year,
            FieldKey::Category => &mut self.category,
            FieldKey::Price => &mut self.price,
            FieldKey::OriginalPrice => &mut self.original_price,
            FieldKey::Discount => &mut self.discount,
            FieldKey::CoverImage => &mut self.cover_image,
            FieldKey::Rating => &mut self.rating,
            FieldKey::ReviewsCount => &mut self.reviews_count,
            FieldKey::IsNew => return,
            FieldKey::Pages => &mut self.pages,
            FieldKey::Language => &mut self.language,
            FieldKey::Publisher => &mut self.publisher,
            FieldKey::Description => &mut self.description,
        };
        *slot = text;
    }
}

/// Full set of field failures found by [`validate`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub errors: BTreeMap<FieldKey, ValidationError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: FieldKey) -> Option<&ValidationError> {
        self.errors.get(&field)
    }

    pub fn kind(&self, field: FieldKey) -> Option<ValidationErrorKind> {
        self.get(field).map(|e| e.kind)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn fail(&mut self, field: FieldKey, kind: ValidationErrorKind, message: impl Into<String>) {
        self.errors.insert(field, ValidationError::new(kind, message));
    }
}

/// Where an edit stands between load and save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    EditingWithErrors,
    Submittable,
}

/// Build an editable draft from a fetched record
pub fn initialize(record: &BookRecord) -> DraftState {
    fn opt_text(value: &Option<String>) -> String {
        value.clone().unwrap_or_default()
    }
    fn opt_num<T: ToString>(value: Option<T>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    DraftState {
        id: record.id.clone(),
        title: record.title.clone(),
        author: record.author.clone(),
        isbn: opt_text(&record.isbn),
        year: opt_num(record.year),
        category: opt_text(&record.category),
        price: record.price.to_string(),
        original_price: opt_num(record.original_price),
        discount: record.discount.to_string(),
        cover_image: opt_text(&record.cover_image),
        rating: record.rating.to_string(),
        reviews_count: record.reviews_count.to_string(),
        is_new: record.is_new,
        pages: opt_num(record.pages),
        language: record.language.as_str().to_string(),
        publisher: opt_text(&record.publisher),
        description: opt_text(&record.description),
        errors: BTreeMap::new(),
    }
}

/// Apply one edit and return the resulting draft.
///
/// Editing the original price or the discount recomputes the sale price
/// whenever the pair is usable. The edited field's error is dropped.
pub fn update_field(
    draft: &DraftState,
    field: FieldKey,
    raw: impl Into<FieldValue>,
) -> DraftState {
    let mut next = draft.clone();
    next.assign(field, raw.into());

    if matches!(field, FieldKey::OriginalPrice | FieldKey::Discount)
        && let Some(price) = derived_price(&next.original_price, &next.discount)
    {
        tracing::debug!(
            "Sale price recomputed: {} at {}% -> {}",
            next.original_price,
            next.discount,
            price
        );
        next.price = price;
    }

    next.errors.remove(&field);
    next
}

/// Sale price text for an original price and a discount percentage, if the
/// pair allows one
pub fn derived_price(original_price: &str, discount: &str) -> Option<String> {
    let original = parse_float(original_price).finite().or_zero();
    let percent = parse_float(discount).finite().or_zero();

    if original > 0.0 && (0.0..=100.0).contains(&percent) {
        Some(format_cents(original * (1.0 - percent / 100.0)))
    } else {
        None
    }
}

/// Check the draft against the current calendar year
pub fn validate(draft: &DraftState) -> ValidationResult {
    validate_for_year(draft, chrono::Local::now().year())
}

/// Check every rule and collect all failures
pub fn validate_for_year(draft: &DraftState, current_year: i32) -> ValidationResult {
    let mut result = ValidationResult::default();

    let title = draft.title.trim();
    if title.is_empty() {
        result.fail(FieldKey::Title, ValidationErrorKind::Required, "Title is required");
    } else if title.chars().count() < MIN_TITLE_CHARS {
        result.fail(
            FieldKey::Title,
            ValidationErrorKind::TooShort,
            format!("Title must be at least {} characters", MIN_TITLE_CHARS),
        );
    }

    if draft.author.trim().is_empty() {
        result.fail(FieldKey::Author, ValidationErrorKind::Required, "Author is required");
    }

    if !draft.isbn.is_empty() && !draft.isbn.chars().all(|c| c.is_ascii_digit() || c == '-') {
        result.fail(
            FieldKey::Isbn,
            ValidationErrorKind::InvalidFormat,
            "ISBN may only contain digits and hyphens",
        );
    }

    if !draft.year.is_empty() {
        let max_year = current_year + 1;
        // Unparsable years never fall inside the range
        let in_range = parse_int(&draft.year)
            .value()
            .is_some_and(|y| (MIN_YEAR..=max_year).contains(&y));
        if !in_range {
            result.fail(
                FieldKey::Year,
                ValidationErrorKind::OutOfRange,
                format!("Year must be between {} and {}", MIN_YEAR, max_year),
            );
        }
    }

    if !draft.price.is_empty() && parse_float(&draft.price).value().is_some_and(|p| p < 0.0) {
        result.fail(
            FieldKey::Price,
            ValidationErrorKind::Negative,
            "Price must not be negative",
        );
    }

    result
}

/// Current phase of a draft
pub fn phase(draft: &DraftState) -> FormPhase {
    if !draft.errors.is_empty() {
        FormPhase::EditingWithErrors
    } else if validate(draft).is_valid() {
        FormPhase::Submittable
    } else {
        FormPhase::Editing
    }
}

/// Normalize a draft into the record sent on save.
///
/// Only call this on a draft that passed [`validate`].
pub fn to_submission_payload(draft: &DraftState) -> BookRecord {
    fn opt_text(value: &str) -> Option<String> {
        (!value.is_empty()).then(|| value.to_string())
    }

    BookRecord {
        id: draft.id.clone(),
        title: draft.title.trim().to_string(),
        author: draft.author.trim().to_string(),
        isbn: opt_text(&draft.isbn),
        // Empty year goes out as 0, not null
        year: Some(parse_int(&draft.year).or_zero()),
        category: opt_text(&draft.category),
        price: parse_float(&draft.price).finite().or_zero(),
        original_price: parse_float(&draft.original_price).finite().value(),
        discount: parse_int(&draft.discount).or_zero(),
        cover_image: opt_text(&draft.cover_image),
        rating: parse_float(&draft.rating).finite().or_zero(),
        reviews_count: parse_int(&draft.reviews_count).or_zero(),
        is_new: draft.is_new,
        pages: parse_int(&draft.pages).value(),
        language: Language::parse(&draft.language).unwrap_or_default(),
        publisher: opt_text(&draft.publisher),
        description: opt_text(&draft.description),
    }
}
