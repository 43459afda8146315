// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fluent conversion of a single optional string.

use crate::domain::{MapKey, Result, TypeHandle, TypedValue, ValuesError};
use crate::service::recognizers::map_value;
use crate::service::TypeParser;
use indexmap::IndexMap;
use std::sync::Arc;

/// A string that may be missing, with a default to fall back on.
///
/// Each `as_*` accessor converts the string when present. When it is missing the
/// accessor returns the default, which must have a matching type.
///
/// # Examples
///
/// ```rust
/// use hexvalues::service::ParsedValue;
///
/// # fn main() -> hexvalues::domain::Result<()> {
/// assert_eq!(ParsedValue::new(Some("8080")).as_int()?, Some(8080));
/// assert_eq!(ParsedValue::new(None).defaulting_to(443).as_int()?, Some(443));
/// assert_eq!(ParsedValue::new(None).as_int()?, None);
///
/// // a default of the wrong type is an error
/// assert!(ParsedValue::new(None).defaulting_to("443").as_int().is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ParsedValue {
    value: Option<String>,
    default: TypedValue,
    parser: Arc<TypeParser>,
}

impl ParsedValue {
    /// Wraps `value`, using the shared type parser.
    pub fn new(value: Option<&str>) -> Self {
        Self::with_parser(value, TypeParser::shared())
    }

    /// Wraps `value`, using `parser` for conversions that need symbols.
    pub fn with_parser(value: Option<&str>, parser: Arc<TypeParser>) -> Self {
        Self {
            value: value.map(str::to_string),
            default: TypedValue::Null,
            parser,
        }
    }

    /// Sets the value returned when the string is missing.
    pub fn defaulting_to(mut self, default: impl Into<TypedValue>) -> Self {
        self.default = default.into();
        self
    }

    /// The wrapped string, if any.
    pub fn raw(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn fallback<T>(
        &self,
        accessor: &str,
        expected: &str,
        extract: impl FnOnce(&TypedValue) -> Option<T>,
    ) -> Result<Option<T>> {
        if self.default.is_null() {
            return Ok(None);
        }
        extract(&self.default)
            .map(Some)
            .ok_or_else(|| ValuesError::TypeMismatch {
                accessor: accessor.to_string(),
                expected: expected.to_string(),
                found: self.default.type_name().to_string(),
            })
    }

    /// The string, or the default in its string form. Never fails.
    pub fn as_string(&self) -> String {
        match &self.value {
            Some(value) => value.clone(),
            None => self.default.to_string(),
        }
    }

    /// The string as an integer.
    pub fn as_int(&self) -> Result<Option<i64>> {
        match &self.value {
            Some(value) => Ok(self.parser.to_int(Some(value))),
            None => self.fallback("as_int", "int", TypedValue::as_int),
        }
    }

    /// The string as a float. An integer default is widened.
    pub fn as_float(&self) -> Result<Option<f64>> {
        match &self.value {
            Some(value) => Ok(self.parser.to_float(Some(value))),
            None => self.fallback("as_float", "float", TypedValue::as_float),
        }
    }

    /// The string as a boolean.
    pub fn as_bool(&self) -> Result<Option<bool>> {
        match &self.value {
            Some(value) => Ok(Some(self.parser.to_bool(Some(value)))),
            None => self.fallback("as_bool", "bool", TypedValue::as_bool),
        }
    }

    /// The string as a list, split with the parser's list separator.
    pub fn as_list(&self) -> Result<Option<Vec<String>>> {
        self.as_list_with(self.parser.list_separator())
    }

    /// The string as a list, split with `separator`.
    pub fn as_list_with(&self, separator: &str) -> Result<Option<Vec<String>>> {
        match &self.value {
            Some(value) => Ok(self.parser.to_list_with(Some(value), separator)),
            None => self.fallback("as_list", "list", |default| match default {
                TypedValue::List(items) => Some(items.iter().map(ToString::to_string).collect()),
                _ => None,
            }),
        }
    }

    /// The string as a map. See [`convert::to_map`](crate::domain::convert::to_map).
    pub fn as_map(&self) -> Result<Option<IndexMap<MapKey, String>>> {
        match &self.value {
            Some(value) => Ok(self.parser.to_map(Some(value))),
            None => self.fallback("as_map", "map", |default| match default {
                TypedValue::Map(entries) => Some(
                    entries
                        .iter()
                        .map(|(key, value)| (key.clone(), value.to_string()))
                        .collect(),
                ),
                _ => None,
            }),
        }
    }

    /// The string as a map of typed values.
    pub fn as_typed_map(&self) -> Result<Option<TypedValue>> {
        match &self.value {
            Some(value) => Ok(self.parser.to_map(Some(value)).map(map_value)),
            None => self.fallback("as_typed_map", "map", |default| {
                matches!(default, TypedValue::Map(_)).then(|| default.clone())
            }),
        }
    }

    /// The string as an inclusive range.
    pub fn as_range(&self) -> Result<Option<Vec<TypedValue>>> {
        match &self.value {
            Some(value) => Ok(self.parser.to_range(Some(value))),
            None => self.fallback("as_range", "list", |default| match default {
                TypedValue::List(items) => Some(items.clone()),
                _ => None,
            }),
        }
    }

    /// The string as a handle on a registered type.
    ///
    /// # Errors
    ///
    /// Returns `Reflection` when the string names an unregistered type, even if
    /// a default is set.
    pub fn as_class(&self) -> Result<Option<TypeHandle>> {
        match &self.value {
            Some(value) => self.parser.to_class(Some(value)),
            None => self.fallback("as_class", "class", |default| match default {
                TypedValue::Class(handle) => Some(handle.clone()),
                _ => None,
            }),
        }
    }

    /// The string as the name of a registered type.
    pub fn as_classname(&self) -> Result<Option<String>> {
        match &self.value {
            Some(value) => Ok(self.parser.to_classname(Some(value))),
            None => self.fallback("as_classname", "string", |default| {
                default.as_str().map(str::to_string)
            }),
        }
    }
}
