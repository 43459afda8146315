// SPDX-License-Identifier: MIT OR Apache-2.0

//! Properties parser trait definition.
//!
//! This module defines the `PropertiesParser` trait, which provides an interface for
//! parsing property text into named sections of key-value pairs.

use crate::domain::Result;
use indexmap::IndexMap;

/// Keys and raw values of one section, in file order.
pub type RawSection = IndexMap<String, String>;

/// Sections in file order.
pub type RawSections = IndexMap<String, RawSection>;

/// A trait for parsing property text.
///
/// Parsers turn a text format into sections. Section and key order must follow the
/// input, since properties are iterated in insertion order. For example, INI text
/// like:
///
/// ```ini
/// [database]
/// host = localhost
/// port = 5432
/// ```
///
/// Should be parsed into one section `database` holding
/// - `host` -> `"localhost"`
/// - `port` -> `"5432"`
///
/// # Examples
///
/// ```rust
/// use hexvalues::ports::{PropertiesParser, RawSections};
/// use hexvalues::domain::Result;
///
/// struct MyParser;
///
/// impl PropertiesParser for MyParser {
///     fn parse(&self, content: &str) -> Result<RawSections> {
///         // Implementation here
///         Ok(RawSections::new())
///     }
/// }
/// ```
pub trait PropertiesParser {
    /// Parses property text into sections.
    ///
    /// # Arguments
    ///
    /// * `content` - The raw property text
    ///
    /// # Returns
    ///
    /// * `Ok(RawSections)` - The parsed sections
    /// * `Err(ValuesError)` - The text is malformed; the error carries the
    ///   parser's diagnostic
    fn parse(&self, content: &str) -> Result<RawSections>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test implementation of PropertiesParser for testing purposes
    struct TestParser;

    impl PropertiesParser for TestParser {
        fn parse(&self, _content: &str) -> Result<RawSections> {
            let mut section = RawSection::new();
            section.insert("host".to_string(), "localhost".to_string());
            section.insert("port".to_string(), "5432".to_string());
            let mut sections = RawSections::new();
            sections.insert("database".to_string(), section);
            Ok(sections)
        }
    }

    #[test]
    fn test_parser_parse_keeps_order() {
        let parser = TestParser;
        let result = parser.parse("dummy content").unwrap();
        let keys: Vec<_> = result["database"].keys().cloned().collect();
        assert_eq!(keys, vec!["host", "port"]);
    }

    #[test]
    fn test_parser_as_trait_object() {
        let parser: Box<dyn PropertiesParser> = Box::new(TestParser);
        let result = parser.parse("dummy content").unwrap();
        assert_eq!(result["database"]["port"], "5432");
    }
}
