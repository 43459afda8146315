// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recognition of typed values in strings.
//!
//! The [`TypeParser`] runs an ordered chain of named recognizers over a string and
//! returns the first result. The chain starts with the built-in recognizers (see
//! [`recognizers`](crate::service::recognizers)) and can be extended, overridden or
//! shortened at runtime.

use crate::adapters::StaticSymbolTable;
use crate::domain::convert::{self, LIST_SEPARATOR};
use crate::domain::{MapKey, Result, TypeHandle, TypedValue};
use crate::ports::{FnRecognizer, Recognizer, SymbolTable};
use crate::service::recognizers::{self, builtin_chain};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

type Chain = Vec<(String, Arc<dyn Recognizer>)>;

static SHARED: Lazy<Arc<TypeParser>> = Lazy::new(|| Arc::new(TypeParser::new()));

/// Converts strings into typed values.
///
/// # Examples
///
/// ```rust
/// use hexvalues::domain::TypedValue;
/// use hexvalues::service::TypeParser;
///
/// # fn main() -> hexvalues::domain::Result<()> {
/// let parser = TypeParser::new();
/// assert_eq!(parser.to_type(None)?, TypedValue::Null);
/// assert_eq!(parser.to_type(Some("NULL"))?, TypedValue::Null);
/// assert_eq!(parser.to_type(Some("on"))?, TypedValue::Bool(true));
/// assert_eq!(parser.to_type(Some("303"))?, TypedValue::Int(303));
/// assert_eq!(parser.to_type(Some("3.03"))?, TypedValue::Float(3.03));
/// assert_eq!(parser.to_type(Some("[foo|bar]"))?, TypedValue::from(vec!["foo", "bar"]));
/// assert_eq!(parser.to_type(Some("just text"))?, TypedValue::from("just text"));
///
/// parser.add_recognition("binford", |s| {
///     (s == "Binford 6100").then(|| TypedValue::from("More power!"))
/// });
/// assert_eq!(parser.to_type(Some("Binford 6100"))?, TypedValue::from("More power!"));
/// # Ok(())
/// # }
/// ```
pub struct TypeParser {
    chain: RwLock<Chain>,
    symbols: RwLock<Arc<dyn SymbolTable>>,
    separator: String,
}

impl TypeParser {
    /// Creates a parser with the built-in chain and an empty symbol table.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new type parser builder.
    pub fn builder() -> TypeParserBuilder {
        TypeParserBuilder::new()
    }

    /// The process-wide default parser.
    ///
    /// Recognitions registered on it are visible to every user of the shared
    /// instance, including properties created without an explicit parser. It
    /// starts with an empty symbol table, so `Name.class`, `Name::class` and
    /// constants stay plain strings until one is installed with
    /// [`TypeParser::set_symbols`].
    pub fn shared() -> Arc<TypeParser> {
        Arc::clone(&SHARED)
    }

    fn read_chain(&self) -> RwLockReadGuard<'_, Chain> {
        self.chain.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_chain(&self) -> RwLockWriteGuard<'_, Chain> {
        self.chain.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a recognition closure under `name`.
    ///
    /// A new name is appended to the end of the chain. An existing name keeps its
    /// position and gets the new behavior.
    pub fn add_recognition<F>(&self, name: impl Into<String>, recognition: F)
    where
        F: Fn(&str) -> Option<TypedValue> + Send + Sync + 'static,
    {
        self.add_recognizer(name, FnRecognizer(recognition));
    }

    /// Registers a recognizer under `name`, like [`TypeParser::add_recognition`].
    pub fn add_recognizer(&self, name: impl Into<String>, recognizer: impl Recognizer + 'static) {
        let name = name.into();
        let recognizer: Arc<dyn Recognizer> = Arc::new(recognizer);
        let mut chain = self.write_chain();
        match chain.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => {
                tracing::debug!("Replacing recognition '{}'", name);
                entry.1 = recognizer;
            }
            None => {
                tracing::debug!("Adding recognition '{}'", name);
                chain.push((name, recognizer));
            }
        }
    }

    /// Removes the recognition registered under `name`.
    ///
    /// Returns whether a recognition was removed.
    pub fn remove_recognition(&self, name: &str) -> bool {
        let mut chain = self.write_chain();
        let before = chain.len();
        chain.retain(|(existing, _)| existing != name);
        before != chain.len()
    }

    /// Names of the registered recognitions in chain order.
    pub fn recognition_names(&self) -> Vec<String> {
        self.read_chain()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// The symbol table used for type and constant lookups.
    pub fn symbols(&self) -> Arc<dyn SymbolTable> {
        let symbols = self.symbols.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&symbols)
    }

    /// Replaces the symbol table used for type and constant lookups.
    pub fn set_symbols(&self, symbols: Arc<dyn SymbolTable>) {
        tracing::debug!("Replacing symbol table");
        *self.symbols.write().unwrap_or_else(PoisonError::into_inner) = symbols;
    }

    /// The separator used by [`TypeParser::to_list`].
    pub fn list_separator(&self) -> &str {
        &self.separator
    }

    /// Recognizes the typed value in `input`.
    ///
    /// `None` and any casing of `"null"` are [`TypedValue::Null`], and the empty
    /// string is returned unchanged. Anything no recognizer claims stays a string.
    ///
    /// # Errors
    ///
    /// Propagates recognizer errors, e.g. `Reflection` for `Name.class` with an
    /// unregistered type.
    pub fn to_type(&self, input: Option<&str>) -> Result<TypedValue> {
        let Some(input) = input else {
            return Ok(TypedValue::Null);
        };
        if input.is_empty() {
            return Ok(TypedValue::String(String::new()));
        }
        if input.eq_ignore_ascii_case("null") {
            return Ok(TypedValue::Null);
        }

        // recognizers run without holding the locks, so they may use the parser
        let chain: Vec<Arc<dyn Recognizer>> = self
            .read_chain()
            .iter()
            .map(|(_, recognizer)| Arc::clone(recognizer))
            .collect();
        let symbols = self.symbols();
        for recognizer in chain {
            if let Some(value) = recognizer.recognize(input, symbols.as_ref())? {
                return Ok(value);
            }
        }
        Ok(TypedValue::String(input.to_string()))
    }

    /// See [`convert::to_int`].
    pub fn to_int(&self, input: Option<&str>) -> Option<i64> {
        convert::to_int(input)
    }

    /// See [`convert::to_float`].
    pub fn to_float(&self, input: Option<&str>) -> Option<f64> {
        convert::to_float(input)
    }

    /// See [`convert::to_bool`].
    pub fn to_bool(&self, input: Option<&str>) -> bool {
        convert::to_bool(input)
    }

    /// Splits `input` with the configured list separator.
    pub fn to_list(&self, input: Option<&str>) -> Option<Vec<String>> {
        convert::to_list(input, &self.separator)
    }

    /// Splits `input` with a custom separator.
    pub fn to_list_with(&self, input: Option<&str>, separator: &str) -> Option<Vec<String>> {
        convert::to_list(input, separator)
    }

    /// See [`convert::to_map`].
    pub fn to_map(&self, input: Option<&str>) -> Option<IndexMap<MapKey, String>> {
        convert::to_map(input)
    }

    /// See [`convert::to_range`].
    pub fn to_range(&self, input: Option<&str>) -> Option<Vec<TypedValue>> {
        convert::to_range(input)
    }

    /// Resolves `Name.class` to a handle on a registered type.
    ///
    /// Returns `Ok(None)` for missing or empty input and for input of another
    /// shape.
    ///
    /// # Errors
    ///
    /// Returns `Reflection` if the named type is not registered.
    pub fn to_class(&self, input: Option<&str>) -> Result<Option<TypeHandle>> {
        match input {
            Some(input) => recognizers::class_handle(input, self.symbols().as_ref()),
            None => Ok(None),
        }
    }

    /// Resolves `Name::class` to the type name, if the type is registered.
    pub fn to_classname(&self, input: Option<&str>) -> Option<String> {
        recognizers::class_name(input?, self.symbols().as_ref())
    }
}

impl Default for TypeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeParser")
            .field("recognitions", &self.recognition_names())
            .field("separator", &self.separator)
            .finish()
    }
}

/// Builder for constructing a [`TypeParser`].
///
/// # Examples
///
/// ```rust
/// use hexvalues::adapters::StaticSymbolTable;
/// use hexvalues::domain::TypedValue;
/// use hexvalues::service::TypeParser;
///
/// # fn main() -> hexvalues::domain::Result<()> {
/// let parser = TypeParser::builder()
///     .with_symbols(StaticSymbolTable::new().with_class("app\\Mailer"))
///     .with_list_separator(",")
///     .build();
///
/// assert_eq!(parser.to_type(Some("app\\Mailer::class"))?, TypedValue::from("app\\Mailer"));
/// assert_eq!(parser.to_list(Some("a,b")), Some(vec!["a".to_string(), "b".to_string()]));
/// # Ok(())
/// # }
/// ```
pub struct TypeParserBuilder {
    symbols: Option<Arc<dyn SymbolTable>>,
    separator: String,
    builtins: bool,
    extra: Chain,
}

impl TypeParserBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            symbols: None,
            separator: LIST_SEPARATOR.to_string(),
            builtins: true,
            extra: Vec::new(),
        }
    }

    /// Uses `symbols` for type and constant lookups.
    pub fn with_symbols(mut self, symbols: impl SymbolTable + 'static) -> Self {
        self.symbols = Some(Arc::new(symbols));
        self
    }

    /// Uses a shared symbol table.
    pub fn with_shared_symbols(mut self, symbols: Arc<dyn SymbolTable>) -> Self {
        self.symbols = Some(symbols);
        self
    }

    /// Sets the separator used by `to_list`.
    pub fn with_list_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Adds a recognition after the built-in chain.
    pub fn with_recognition<F>(mut self, name: impl Into<String>, recognition: F) -> Self
    where
        F: Fn(&str) -> Option<TypedValue> + Send + Sync + 'static,
    {
        self.extra
            .push((name.into(), Arc::new(FnRecognizer(recognition))));
        self
    }

    /// Starts from an empty chain instead of the built-in recognizers.
    pub fn without_builtins(mut self) -> Self {
        self.builtins = false;
        self
    }

    /// Builds the type parser.
    pub fn build(self) -> TypeParser {
        let parser = TypeParser {
            chain: RwLock::new(if self.builtins {
                builtin_chain()
            } else {
                Vec::new()
            }),
            symbols: RwLock::new(
                self.symbols
                    .unwrap_or_else(|| Arc::new(StaticSymbolTable::new())),
            ),
            separator: self.separator,
        };
        for (name, recognizer) in self.extra {
            let mut chain = parser.write_chain();
            match chain.iter_mut().find(|(existing, _)| *existing == name) {
                Some(entry) => entry.1 = recognizer,
                None => chain.push((name, recognizer)),
            }
        }
        parser
    }
}

impl Default for TypeParserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValuesError;

    #[test]
    fn test_to_type_null_handling() {
        let parser = TypeParser::new();
        assert_eq!(parser.to_type(None).unwrap(), TypedValue::Null);
        assert_eq!(parser.to_type(Some("null")).unwrap(), TypedValue::Null);
        assert_eq!(parser.to_type(Some("Null")).unwrap(), TypedValue::Null);
        assert_eq!(
            parser.to_type(Some("")).unwrap(),
            TypedValue::String(String::new())
        );
    }

    #[test]
    fn test_to_type_booleans() {
        let parser = TypeParser::new();
        for word in ["yes", "true", "on", "TRUE"] {
            assert_eq!(parser.to_type(Some(word)).unwrap(), TypedValue::Bool(true));
        }
        for word in ["no", "false", "off", "Off"] {
            assert_eq!(parser.to_type(Some(word)).unwrap(), TypedValue::Bool(false));
        }
    }

    #[test]
    fn test_to_type_numbers() {
        let parser = TypeParser::new();
        assert_eq!(parser.to_type(Some("0")).unwrap(), TypedValue::Int(0));
        assert_eq!(parser.to_type(Some("-303")).unwrap(), TypedValue::Int(-303));
        assert_eq!(parser.to_type(Some("3.03")).unwrap(), TypedValue::Float(3.03));
        assert_eq!(
            parser.to_type(Some("80foo")).unwrap(),
            TypedValue::from("80foo")
        );
    }

    #[test]
    fn test_to_type_collections() {
        let parser = TypeParser::new();
        assert_eq!(
            parser.to_type(Some("[]")).unwrap(),
            TypedValue::List(vec![])
        );
        assert_eq!(
            parser.to_type(Some("1..3")).unwrap(),
            TypedValue::from(vec![1, 2, 3])
        );
        assert_eq!(
            parser.to_type(Some("a..c")).unwrap(),
            TypedValue::from(vec!["a", "b", "c"])
        );
    }

    #[test]
    fn test_set_symbols_enables_class_references() {
        let parser = TypeParser::new();
        assert_eq!(
            parser.to_type(Some("app\\Mailer::class")).unwrap(),
            TypedValue::from("app\\Mailer::class")
        );
        assert_eq!(parser.to_type(Some("APP_RETRIES")).unwrap(), TypedValue::from("APP_RETRIES"));

        parser.set_symbols(Arc::new(
            StaticSymbolTable::new()
                .with_class("app\\Mailer")
                .with_constant("APP_RETRIES", 3),
        ));

        assert_eq!(
            parser.to_type(Some("app\\Mailer::class")).unwrap(),
            TypedValue::from("app\\Mailer")
        );
        assert_eq!(parser.to_type(Some("APP_RETRIES")).unwrap(), TypedValue::Int(3));
        assert_eq!(
            parser.to_class(Some("app\\Mailer.class")).unwrap(),
            Some(TypeHandle::class("app\\Mailer"))
        );
    }

    #[test]
    fn test_to_type_class_references() {
        let parser = TypeParser::builder()
            .with_symbols(
                StaticSymbolTable::new()
                    .with_class("app\\Mailer")
                    .with_constant("app\\Mailer::RETRIES", 3),
            )
            .build();

        assert_eq!(
            parser.to_type(Some("app\\Mailer::class")).unwrap(),
            TypedValue::from("app\\Mailer")
        );
        assert_eq!(
            parser.to_type(Some("app\\Mailer.class")).unwrap(),
            TypedValue::Class(TypeHandle::class("app\\Mailer"))
        );
        assert_eq!(
            parser.to_type(Some("app\\Mailer::RETRIES")).unwrap(),
            TypedValue::Int(3)
        );
        assert_eq!(
            parser.to_type(Some("app\\Missing::class")).unwrap(),
            TypedValue::from("app\\Missing::class")
        );
        assert!(matches!(
            parser.to_type(Some("app\\Missing.class")),
            Err(ValuesError::Reflection { .. })
        ));
    }

    #[test]
    fn test_add_recognition_appends() {
        let parser = TypeParser::new();
        parser.add_recognition("binford", |s| {
            (s == "Binford 6100").then(|| TypedValue::from("More power!"))
        });

        assert_eq!(
            parser.to_type(Some("Binford 6100")).unwrap(),
            TypedValue::from("More power!")
        );
        assert_eq!(
            parser.to_type(Some("Binford 610")).unwrap(),
            TypedValue::from("Binford 610")
        );
        assert_eq!(parser.recognition_names().last().unwrap(), "binford");
    }

    #[test]
    fn test_add_recognition_replaces_in_place() {
        let parser = TypeParser::new();
        parser.add_recognition("booleanTrue", |s| {
            (s == "Binford 6100").then_some(TypedValue::Bool(true))
        });

        assert_eq!(
            parser.to_type(Some("Binford 6100")).unwrap(),
            TypedValue::Bool(true)
        );
        assert_eq!(parser.to_type(Some("yes")).unwrap(), TypedValue::from("yes"));
        assert_eq!(parser.recognition_names()[0], "booleanTrue");
    }

    #[test]
    fn test_remove_recognition() {
        let parser = TypeParser::new();
        assert!(parser.remove_recognition("int"));
        assert!(!parser.remove_recognition("int"));
        assert_eq!(parser.to_type(Some("303")).unwrap(), TypedValue::from("303"));
    }

    #[test]
    fn test_recognizer_may_use_parser() {
        let parser = Arc::new(TypeParser::new());
        let inner = Arc::clone(&parser);
        parser.add_recognition("nested", move |s| {
            s.strip_prefix("int:")
                .and_then(|rest| inner.to_int(Some(rest)))
                .map(TypedValue::Int)
        });
        assert_eq!(parser.to_type(Some("int:7")).unwrap(), TypedValue::Int(7));
    }

    #[test]
    fn test_to_class_and_classname() {
        let parser = TypeParser::builder()
            .with_symbols(StaticSymbolTable::new().with_interface("app\\Transport"))
            .build();

        let handle = parser.to_class(Some("app\\Transport.class")).unwrap().unwrap();
        assert!(handle.is_interface());
        assert_eq!(parser.to_class(None).unwrap(), None);
        assert_eq!(parser.to_class(Some("")).unwrap(), None);
        assert_eq!(
            parser.to_classname(Some("app\\Transport::class")),
            Some("app\\Transport".to_string())
        );
        assert_eq!(parser.to_classname(Some("does\\not\\Exist::class")), None);
        assert_eq!(parser.to_classname(None), None);
    }

    #[test]
    fn test_builder_without_builtins() {
        let parser = TypeParser::builder()
            .without_builtins()
            .with_recognition("answer", |s| (s == "42").then_some(TypedValue::Int(42)))
            .build();

        assert_eq!(parser.recognition_names(), vec!["answer"]);
        assert_eq!(parser.to_type(Some("42")).unwrap(), TypedValue::Int(42));
        assert_eq!(parser.to_type(Some("true")).unwrap(), TypedValue::from("true"));
    }

    #[test]
    fn test_shared_is_one_instance() {
        assert!(Arc::ptr_eq(&TypeParser::shared(), &TypeParser::shared()));
    }
}
