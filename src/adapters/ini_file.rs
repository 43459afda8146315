// SPDX-License-Identifier: MIT OR Apache-2.0

//! INI properties source adapter.
//!
//! This module provides a parser for INI text and an adapter that reads INI files
//! from disk or from the OS-appropriate configuration directory.

use crate::domain::{Result, ValuesError};
use crate::ports::{PropertiesParser, RawSections};
#[cfg(feature = "dirs")]
use directories::ProjectDirs;
use ini::{Ini, ParseOption};
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum allowed file size for property files (10MB)
const MAX_INI_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Name of the file looked up in the default location.
pub const DEFAULT_FILE_NAME: &str = "config.ini";

/// INI parser backed by `rust-ini`.
///
/// Understands `[section]` headers and `key = value` lines. Lines starting with
/// `;` or `#` are comments. Values may be wrapped in double or single quotes,
/// which are removed. Backslashes are kept as written, so namespaced class
/// names survive. Every key must belong to a section; a repeated section adds
/// to the first one. Values are kept as written, without any type conversion.
///
/// # Examples
///
/// ```rust
/// use hexvalues::adapters::IniParser;
/// use hexvalues::ports::PropertiesParser;
///
/// let parser = IniParser::new();
/// let sections = parser.parse("[database]\nhost = localhost\nport = 5432").unwrap();
/// assert_eq!(sections["database"]["host"], "localhost");
/// assert_eq!(sections["database"]["port"], "5432");
/// ```
#[derive(Debug, Clone, Default)]
pub struct IniParser;

impl IniParser {
    /// Creates a new INI parser.
    pub fn new() -> Self {
        IniParser
    }

    fn options() -> ParseOption {
        ParseOption {
            enabled_escape: false,
            ..ParseOption::default()
        }
    }
}

impl PropertiesParser for IniParser {
    fn parse(&self, content: &str) -> Result<RawSections> {
        let ini = Ini::load_from_str_opt(content, Self::options()).map_err(|e| {
            ValuesError::ParseError {
                message: e.to_string(),
                source: Some(Box::new(e)),
            }
        })?;

        let mut sections = RawSections::new();
        for (name, properties) in ini.iter() {
            let Some(name) = name else {
                if let Some((key, _)) = properties.iter().next() {
                    return Err(ValuesError::ParseError {
                        message: format!("key '{}' outside of any section", key),
                        source: None,
                    });
                }
                continue;
            };
            let section = sections.entry(name.to_string()).or_default();
            for (key, value) in properties.iter() {
                section.insert(key.to_string(), value.to_string());
            }
        }

        tracing::debug!("Parsed {} INI sections", sections.len());
        Ok(sections)
    }
}

/// Property source adapter for INI files.
///
/// # Examples
///
/// ```rust,no_run
/// use hexvalues::adapters::IniFileAdapter;
///
/// // Load from a specific file
/// let adapter = IniFileAdapter::from_file("/path/to/config.ini").unwrap();
/// println!("{} sections", adapter.sections().len());
/// ```
#[derive(Debug, Clone)]
pub struct IniFileAdapter {
    file_path: PathBuf,
    sections: RawSections,
}

impl IniFileAdapter {
    /// Reads and parses an INI file.
    ///
    /// # Errors
    ///
    /// * `InvalidArgument` - the file does not exist, is not a regular file or
    ///   can not be read
    /// * `FileFormat` - the file is too large, is not UTF-8 or its content can
    ///   not be parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();
        let sections = Self::load(&file_path)?;
        Ok(Self {
            file_path,
            sections,
        })
    }

    /// Reads `config.ini` from the OS-appropriate configuration directory.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use hexvalues::adapters::IniFileAdapter;
    ///
    /// let adapter = IniFileAdapter::from_default_location("myapp", "com.example").unwrap();
    /// ```
    #[cfg(feature = "dirs")]
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        Self::with_filename(app_name, qualifier, DEFAULT_FILE_NAME)
    }

    /// Reads a custom file name from the OS-appropriate configuration directory.
    #[cfg(feature = "dirs")]
    pub fn with_filename(app_name: &str, qualifier: &str, filename: &str) -> Result<Self> {
        let proj_dirs = ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| {
            ValuesError::invalid_argument("Failed to determine project directories")
        })?;
        Self::from_file(proj_dirs.config_dir().join(filename))
    }

    /// Returns the path to the property file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// The parsed sections.
    pub fn sections(&self) -> &RawSections {
        &self.sections
    }

    /// Consumes the adapter, returning the parsed sections.
    pub fn into_sections(self) -> RawSections {
        self.sections
    }

    fn load(path: &Path) -> Result<RawSections> {
        let display = path.display().to_string();
        if !path.is_file() {
            return Err(Self::not_found(&display));
        }

        // Check file size before reading
        let metadata = fs::metadata(path).map_err(|_| Self::not_found(&display))?;
        if metadata.len() > MAX_INI_FILE_SIZE {
            return Err(ValuesError::FileFormat {
                path: display,
                message: format!(
                    "file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_INI_FILE_SIZE
                ),
            });
        }

        let bytes = fs::read(path).map_err(|e| {
            let shown = &display;
            tracing::warn!("Failed to read property file {}: {}", shown, e);
            Self::not_found(&display)
        })?;
        let content = String::from_utf8(bytes).map_err(|e| ValuesError::FileFormat {
            path: display.clone(),
            message: format!("invalid UTF-8: {}", e),
        })?;

        IniParser::new().parse(&content).map_err(|e| match e {
            ValuesError::ParseError { message, .. } => ValuesError::FileFormat {
                path: display,
                message,
            },
            other => other,
        })
    }

    fn not_found(display: &str) -> ValuesError {
        ValuesError::invalid_argument(format!("Property file {} not found", display))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_ini_parser_simple() {
        let parser = IniParser::new();
        let result = parser.parse("[scalar]\nstringValue = This is a string").unwrap();

        assert_eq!(result["scalar"]["stringValue"], "This is a string");
    }

    #[test]
    fn test_ini_parser_keeps_order() {
        let parser = IniParser::new();
        let ini = r#"
[scalar]
b = 2
a = 1

[array]
list = foo|bar
"#;
        let result = parser.parse(ini).unwrap();

        let sections: Vec<_> = result.keys().cloned().collect();
        assert_eq!(sections, vec!["scalar", "array"]);
        let keys: Vec<_> = result["scalar"].keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_ini_parser_comments_and_quotes() {
        let parser = IniParser::new();
        let ini = r#"
; leading comment
# another one
[quoted]
double = "spaced value"
single = 'single'
empty =
"#;
        let result = parser.parse(ini).unwrap();

        assert_eq!(result["quoted"]["double"], "spaced value");
        assert_eq!(result["quoted"]["single"], "single");
        assert_eq!(result["quoted"]["empty"], "");
        assert_eq!(result["quoted"].len(), 3);
    }

    #[test]
    fn test_ini_parser_keeps_backslashes() {
        let parser = IniParser::new();
        let result = parser
            .parse("[mail]\nmailer = app\\Mail\\Mailer.class")
            .unwrap();

        assert_eq!(result["mail"]["mailer"], "app\\Mail\\Mailer.class");
    }

    #[test]
    fn test_ini_parser_values_stay_raw() {
        let parser = IniParser::new();
        let result = parser
            .parse("[types]\nflag = yes\nrange = 1..5\nmap = [foo:bar|baz]")
            .unwrap();

        assert_eq!(result["types"]["flag"], "yes");
        assert_eq!(result["types"]["range"], "1..5");
        assert_eq!(result["types"]["map"], "[foo:bar|baz]");
    }

    #[test]
    fn test_ini_parser_repeated_section_merges() {
        let parser = IniParser::new();
        let result = parser.parse("[a]\nx = 1\n[b]\ny = 2\n[a]\nz = 3").unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result["a"].len(), 2);
        assert_eq!(result["a"]["z"], "3");
    }

    #[test]
    fn test_ini_parser_empty_section() {
        let parser = IniParser::new();
        let result = parser.parse("[empty]").unwrap();

        assert!(result["empty"].is_empty());
    }

    #[test]
    fn test_ini_parser_empty_text() {
        let parser = IniParser::new();
        assert!(parser.parse("").unwrap().is_empty());
        assert!(parser.parse("; only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn test_ini_parser_unterminated_section() {
        let parser = IniParser::new();
        let err = parser.parse("[invalid{").unwrap_err();

        match err {
            ValuesError::ParseError { message, source } => {
                assert!(!message.is_empty());
                assert!(source.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_ini_parser_key_outside_section() {
        let parser = IniParser::new();
        let err = parser.parse("orphan = 1\n[a]\nx = 2").unwrap_err();

        assert!(matches!(err, ValuesError::ParseError { .. }));
        assert!(err.to_string().contains("key 'orphan' outside of any section"));
    }

    #[test]
    fn test_ini_parser_missing_equals() {
        let parser = IniParser::new();
        let err = parser.parse("[a]\n\njust a line").unwrap_err();

        assert!(matches!(err, ValuesError::ParseError { source: Some(_), .. }));
    }

    #[test]
    fn test_ini_file_adapter_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[database]").unwrap();
        writeln!(temp_file, "host = localhost").unwrap();
        temp_file.flush().unwrap();

        let adapter = IniFileAdapter::from_file(temp_file.path()).unwrap();

        assert_eq!(adapter.file_path(), temp_file.path());
        assert_eq!(adapter.sections()["database"]["host"], "localhost");
        assert_eq!(adapter.into_sections().len(), 1);
    }

    #[test]
    fn test_ini_file_adapter_missing_file() {
        let err = IniFileAdapter::from_file("/does/not/exist.ini").unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid argument: Property file /does/not/exist.ini not found"
        );
    }

    #[test]
    fn test_ini_file_adapter_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = IniFileAdapter::from_file(dir.path()).unwrap_err();

        assert!(matches!(err, ValuesError::InvalidArgument { .. }));
    }

    #[test]
    fn test_ini_file_adapter_invalid_content() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[invalid{{").unwrap();
        temp_file.flush().unwrap();

        let err = IniFileAdapter::from_file(temp_file.path()).unwrap_err();

        match err {
            ValuesError::FileFormat { path, message } => {
                assert_eq!(path, temp_file.path().display().to_string());
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_ini_file_adapter_invalid_utf8() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[a]\nx = \xff\xfe\n").unwrap();
        temp_file.flush().unwrap();

        let err = IniFileAdapter::from_file(temp_file.path()).unwrap_err();

        match err {
            ValuesError::FileFormat { message, .. } => {
                assert!(message.starts_with("invalid UTF-8"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
