// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sectioned property store.
//!
//! [`Properties`] holds named sections of key-value pairs, usually read from INI
//! text. Values of keys ending in `password` are turned into [`Secret`]s when the
//! store is built, so they never sit in memory as plain strings.

use crate::domain::{Result, Secret, SecretVault, TypedValue, ValuesError};
use crate::ports::RawSections;
use crate::service::{ParsedValue, TypeParser};
use indexmap::IndexMap;
use std::fmt;
#[cfg(feature = "ini")]
use std::path::Path;
use std::sync::Arc;

/// Suffix of keys whose values are stored as secrets.
pub const PASSWORD_SUFFIX: &str = "password";

/// A stored property value.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// A plain string.
    Text(String),
    /// A password, see [`PASSWORD_SUFFIX`].
    Secret(Secret),
}

impl PropertyValue {
    /// The plain string, if this is not a secret.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            PropertyValue::Secret(_) => None,
        }
    }

    /// The secret, if this is one.
    pub fn as_secret(&self) -> Option<&Secret> {
        match self {
            PropertyValue::Secret(secret) => Some(secret),
            PropertyValue::Text(_) => None,
        }
    }

    /// Whether this is a secret.
    pub fn is_secret(&self) -> bool {
        matches!(self, PropertyValue::Secret(_))
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(text) => f.write_str(text),
            PropertyValue::Secret(secret) => write!(f, "{}", secret),
        }
    }
}

impl PartialEq<&str> for PropertyValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

impl From<&str> for PropertyValue {
    fn from(text: &str) -> Self {
        PropertyValue::Text(text.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(text: String) -> Self {
        PropertyValue::Text(text)
    }
}

impl From<Secret> for PropertyValue {
    fn from(secret: Secret) -> Self {
        PropertyValue::Secret(secret)
    }
}

/// Keys and values of one section, in insertion order.
pub type Section = IndexMap<String, PropertyValue>;

/// Sections in insertion order.
pub type Sections = IndexMap<String, Section>;

/// Result of [`Properties::parse_value`].
#[derive(Clone, Debug, PartialEq)]
pub enum ParsedProperty {
    /// The recognized value of a plain string.
    Value(TypedValue),
    /// A secret, returned as stored.
    Secret(Secret),
}

impl ParsedProperty {
    /// The typed value, if this is not a secret.
    pub fn into_value(self) -> Option<TypedValue> {
        match self {
            ParsedProperty::Value(value) => Some(value),
            ParsedProperty::Secret(_) => None,
        }
    }
}

/// Read-only sectioned properties.
///
/// # Examples
///
/// ```rust
/// use hexvalues::service::Properties;
/// use hexvalues::domain::TypedValue;
///
/// # fn main() -> hexvalues::domain::Result<()> {
/// let properties = Properties::from_string(
///     "[net]\nhost = example.com\nport = 8080\n\n[db]\ndb.password = s3cr3t",
/// )?;
///
/// assert_eq!(properties.value("net", "host").unwrap(), &"example.com");
/// assert_eq!(properties.parse("net", "port")?.as_int()?, Some(8080));
///
/// let secret = properties.value("db", "db.password").unwrap().as_secret().unwrap();
/// assert_eq!(secret.to_string(), "[REDACTED]");
/// assert_eq!(secret.unveil()?.as_deref(), Some("s3cr3t"));
/// assert!(properties.parse("db", "db.password").is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Properties {
    pub(crate) sections: Sections,
    pub(crate) parser: Arc<TypeParser>,
    pub(crate) vault: SecretVault,
}

impl Properties {
    /// Creates properties from raw sections, using the shared type parser and the
    /// global secret vault.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a password value is empty.
    pub fn new(raw: RawSections) -> Result<Self> {
        Self::builder().build(raw)
    }

    /// Creates a new properties builder.
    pub fn builder() -> PropertiesBuilder {
        PropertiesBuilder::new()
    }

    /// Parses INI text.
    ///
    /// Values are recognized by [`TypeParser::shared`], whose symbol table is
    /// empty until one is installed with [`TypeParser::set_symbols`]. Use
    /// [`PropertiesBuilder::with_parser`] for a parser with its own symbols.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` carrying the parser's diagnostic if the text is
    /// malformed.
    #[cfg(feature = "ini")]
    pub fn from_string(text: &str) -> Result<Self> {
        Self::builder().parse_string(text)
    }

    /// Reads an INI file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the file does not exist or can not be read,
    /// and `FileFormat` if its content is not UTF-8 or can not be parsed.
    #[cfg(feature = "ini")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().read_file(path)
    }

    /// Reads `config.ini` from the OS-appropriate configuration directory.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use hexvalues::service::Properties;
    ///
    /// let properties = Properties::from_default_location("myapp", "com.example").unwrap();
    /// ```
    #[cfg(feature = "dirs")]
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        use crate::adapters::IniFileAdapter;
        let adapter = IniFileAdapter::from_default_location(app_name, qualifier)?;
        tracing::debug!("Loading properties from {}", adapter.file_path().display());
        Self::new(adapter.into_sections())
    }

    pub(crate) fn from_sections(
        mut sections: Sections,
        parser: Arc<TypeParser>,
        vault: SecretVault,
    ) -> Result<Self> {
        for (section_name, section) in sections.iter_mut() {
            for (key, value) in section.iter_mut() {
                if !key.ends_with(PASSWORD_SUFFIX) {
                    continue;
                }
                if let PropertyValue::Text(text) = value {
                    let secret = vault.create(std::mem::take(text))?;
                    tracing::debug!("Stored '{}.{}' as secret", section_name, key);
                    *value = PropertyValue::Secret(secret);
                }
            }
        }
        Ok(Self {
            sections,
            parser,
            vault,
        })
    }

    /// A new instance with the sections of `other` replacing those of the same
    /// name. Sections are replaced as a whole, not merged key by key.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a password value is empty.
    pub fn merge(&self, other: &Properties) -> Result<Properties> {
        let mut sections = self.sections.clone();
        for (name, section) in &other.sections {
            sections.insert(name.clone(), section.clone());
        }
        Self::from_sections(sections, Arc::clone(&self.parser), self.vault.clone())
    }

    /// Whether a section with this name exists.
    pub fn contain_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// The section with this name.
    pub fn section(&self, section: &str) -> Option<&Section> {
        self.sections.get(section)
    }

    /// Keys of the section in insertion order; empty if the section is missing.
    pub fn keys_for_section(&self, section: &str) -> Vec<&str> {
        self.sections
            .get(section)
            .map(|s| s.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether the section exists and contains `key`.
    pub fn contain_value(&self, section: &str, key: &str) -> bool {
        self.value(section, key).is_some()
    }

    /// The stored value.
    pub fn value(&self, section: &str, key: &str) -> Option<&PropertyValue> {
        self.sections.get(section)?.get(key)
    }

    /// The stored value recognized by the type parser. Secrets are returned as
    /// they are.
    ///
    /// # Errors
    ///
    /// Propagates errors of the type parser.
    pub fn parse_value(&self, section: &str, key: &str) -> Result<Option<ParsedProperty>> {
        match self.value(section, key) {
            None => Ok(None),
            Some(PropertyValue::Secret(secret)) => Ok(Some(ParsedProperty::Secret(secret.clone()))),
            Some(PropertyValue::Text(text)) => self
                .parser
                .to_type(Some(text))
                .map(|value| Some(ParsedProperty::Value(value))),
        }
    }

    /// A fluent parser for the stored value; wraps a missing value if the
    /// section or key does not exist.
    ///
    /// # Errors
    ///
    /// Returns `Logic` if the value is a secret.
    pub fn parse(&self, section: &str, key: &str) -> Result<ParsedValue> {
        match self.value(section, key) {
            Some(PropertyValue::Secret(_)) => {
                Err(ValuesError::logic("Can not parse fields with passwords"))
            }
            Some(PropertyValue::Text(text)) => Ok(ParsedValue::with_parser(
                Some(text),
                Arc::clone(&self.parser),
            )),
            None => Ok(ParsedValue::with_parser(None, Arc::clone(&self.parser))),
        }
    }

    /// Iterates over `(section name, section)` pairs in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Section> {
        self.sections.iter()
    }

    /// Section names in insertion order.
    pub fn section_names(&self) -> Vec<&str> {
        self.sections.keys().map(String::as_str).collect()
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether there are no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// The type parser used by [`Properties::parse_value`].
    pub fn type_parser(&self) -> &Arc<TypeParser> {
        &self.parser
    }
}

impl Default for Properties {
    fn default() -> Self {
        Self {
            sections: Sections::new(),
            parser: TypeParser::shared(),
            vault: SecretVault::global().clone(),
        }
    }
}

impl fmt::Debug for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Properties")
            .field("sections", &self.sections)
            .finish()
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a Section);
    type IntoIter = indexmap::map::Iter<'a, String, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

/// Builder for constructing [`Properties`] with a custom type parser or vault.
///
/// # Examples
///
/// ```rust
/// use hexvalues::domain::SecretVault;
/// use hexvalues::service::{Properties, TypeParser};
/// use std::sync::Arc;
///
/// # fn main() -> hexvalues::domain::Result<()> {
/// let vault = SecretVault::new_named("base64")?;
/// let properties = Properties::builder()
///     .with_parser(Arc::new(TypeParser::new()))
///     .with_vault(vault.clone())
///     .parse_string("[db]\npassword = hunter2")?;
///
/// assert!(properties.value("db", "password").unwrap().is_secret());
/// assert_eq!(vault.stored(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertiesBuilder {
    parser: Option<Arc<TypeParser>>,
    vault: Option<SecretVault>,
}

impl PropertiesBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `parser` for value recognition.
    pub fn with_parser(mut self, parser: Arc<TypeParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Stores passwords in `vault`.
    pub fn with_vault(mut self, vault: SecretVault) -> Self {
        self.vault = Some(vault);
        self
    }

    fn parts(self) -> (Arc<TypeParser>, SecretVault) {
        (
            self.parser.unwrap_or_else(TypeParser::shared),
            self.vault
                .unwrap_or_else(|| SecretVault::global().clone()),
        )
    }

    /// Builds properties from raw sections.
    pub fn build(self, raw: RawSections) -> Result<Properties> {
        let sections = raw
            .into_iter()
            .map(|(name, section)| {
                let section = section
                    .into_iter()
                    .map(|(key, value)| (key, PropertyValue::Text(value)))
                    .collect();
                (name, section)
            })
            .collect();
        self.build_from(sections)
    }

    /// Builds properties from typed sections.
    pub fn build_from(self, sections: Sections) -> Result<Properties> {
        let (parser, vault) = self.parts();
        Properties::from_sections(sections, parser, vault)
    }

    /// Builds properties from INI text.
    #[cfg(feature = "ini")]
    pub fn parse_string(self, text: &str) -> Result<Properties> {
        use crate::adapters::IniParser;
        use crate::ports::PropertiesParser;
        let raw = IniParser::new().parse(text).map_err(|e| {
            let detail = match e {
                ValuesError::ParseError { message, .. } => message,
                other => other.to_string(),
            };
            ValuesError::invalid_argument(format!(
                "Property string contains errors and can not be parsed: {}",
                detail
            ))
        })?;
        self.build(raw)
    }

    /// Builds properties from an INI file.
    #[cfg(feature = "ini")]
    pub fn read_file<P: AsRef<Path>>(self, path: P) -> Result<Properties> {
        use crate::adapters::IniFileAdapter;
        let adapter = IniFileAdapter::from_file(path)?;
        self.build(adapter.into_sections())
    }
}
