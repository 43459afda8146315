// SPDX-License-Identifier: MIT OR Apache-2.0

//! Properties that can be changed after creation.

use crate::domain::Result;
use crate::ports::RawSections;
use crate::service::properties::{Properties, PropertyValue, Section};
use std::fmt::Display;
use std::ops::Deref;
#[cfg(feature = "ini")]
use std::path::Path;

/// Separator used when joining list values.
const JOIN_SEPARATOR: &str = "|";

/// Properties with setters.
///
/// Every setter stores the string form of its value, so the stored text reads
/// back through the same parsing accessors as values loaded from INI. Values set
/// here are stored as given; password keys become secrets only when the store is
/// converted with [`ModifiableProperties::unmodifiable`]. All read operations of
/// [`Properties`] are available through `Deref`.
///
/// # Examples
///
/// ```rust
/// use hexvalues::service::ModifiableProperties;
///
/// # fn main() -> hexvalues::domain::Result<()> {
/// let mut properties = ModifiableProperties::new();
/// properties
///     .set_value("net", "host", "example.com")
///     .set_boolean_value("net", "secure", true)
///     .set_array_value("net", "mirrors", ["a", "b"])
///     .set_range_value("net", "ports", &[8080, 8081, 8082]);
///
/// assert_eq!(properties.keys_for_section("net"), vec!["host", "secure", "mirrors", "ports"]);
/// assert_eq!(properties.value("net", "secure").unwrap(), &"true");
/// assert_eq!(properties.value("net", "ports").unwrap(), &"8080..8082");
/// assert_eq!(properties.parse("net", "mirrors")?.as_list()?.unwrap().len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModifiableProperties {
    inner: Properties,
}

impl ModifiableProperties {
    /// Creates empty properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates properties from raw sections. See [`Properties::new`].
    pub fn from_raw(raw: RawSections) -> Result<Self> {
        Properties::new(raw).map(Self::from)
    }

    /// Parses INI text. See [`Properties::from_string`].
    #[cfg(feature = "ini")]
    pub fn from_string(text: &str) -> Result<Self> {
        Properties::from_string(text).map(Self::from)
    }

    /// Reads an INI file. See [`Properties::from_file`].
    #[cfg(feature = "ini")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Properties::from_file(path).map(Self::from)
    }

    /// Replaces or inserts a whole section.
    pub fn set_section<I, K, V>(&mut self, section: impl Into<String>, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<PropertyValue>,
    {
        let data: Section = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.inner.sections.insert(section.into(), data);
        self
    }

    /// Stores the string form of `value`, creating the section if needed.
    pub fn set_value(
        &mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Display,
    ) -> &mut Self {
        self.inner
            .sections
            .entry(section.into())
            .or_default()
            .insert(key.into(), PropertyValue::Text(value.to_string()));
        self
    }

    /// Stores `"true"` or `"false"`.
    pub fn set_boolean_value(
        &mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: bool,
    ) -> &mut Self {
        self.set_value(section, key, if value { "true" } else { "false" })
    }

    /// Stores the values joined by `|`.
    pub fn set_array_value<I>(
        &mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        values: I,
    ) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let joined = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(JOIN_SEPARATOR);
        self.set_value(section, key, joined)
    }

    /// Stores `key:value` pairs joined by `|`.
    pub fn set_hash_value<I, K, V>(
        &mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        hash: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Display,
        V: Display,
    {
        let pairs = hash.into_iter().map(|(k, v)| format!("{}:{}", k, v));
        self.set_array_value(section, key, pairs)
    }

    /// Stores `first..last` using only the first and last element; a missing end
    /// is left empty.
    pub fn set_range_value<T: Display>(
        &mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        range: &[T],
    ) -> &mut Self {
        let (first, last) = match range {
            [] => (String::new(), String::new()),
            [only] => (only.to_string(), String::new()),
            [first, .., last] => (first.to_string(), last.to_string()),
        };
        self.set_value(section, key, format!("{}..{}", first, last))
    }

    /// A read-only snapshot. Password keys are turned into secrets.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a password value is empty.
    pub fn unmodifiable(&self) -> Result<Properties> {
        Properties::from_sections(
            self.inner.sections.clone(),
            self.inner.parser.clone(),
            self.inner.vault.clone(),
        )
    }
}

impl From<Properties> for ModifiableProperties {
    fn from(properties: Properties) -> Self {
        Self { inner: properties }
    }
}

impl Deref for ModifiableProperties {
    type Target = Properties;

    fn deref(&self) -> &Properties {
        &self.inner
    }
}
