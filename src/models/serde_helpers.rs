//! Lenient field decoders for records coming from the store.
//!
//! `#[serde(default)]` only covers missing keys. The store also sends
//! explicit `null`s, and those should land on the same defaults.

use serde::{Deserialize, Deserializer};

use super::book::Language;

/// `null` decodes to `T::default()`
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Unknown language names and `null` fall back to the default language
pub fn lenient_language<'de, D>(deserializer: D) -> Result<Language, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw.as_deref() {
        Some(name) => Language::parse(name).unwrap_or_else(|| {
            tracing::debug!("Unknown language '{}', using default", name);
            Language::default()
        }),
        None => Language::default(),
    })
}
