// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in recognizers of the type parser.
//!
//! They are registered in this order, and the order matters: `"1..5"` would
//! otherwise never reach the range recognizer if a later shape check came first.
//!
//! | name              | input shape                  | result                |
//! |-------------------|------------------------------|-----------------------|
//! | `booleanTrue`     | `yes`, `true`, `on`          | `Bool(true)`          |
//! | `booleanFalse`    | `no`, `false`, `off`         | `Bool(false)`         |
//! | `int`             | `^[+-]?[0-9]+$`              | `Int`                 |
//! | `float`           | `^[+-]?[0-9]+\.[0-9]+$`      | `Float`               |
//! | `array`           | `[...]`                      | `Map` or `List`       |
//! | `range`           | contains `..`                | `List`                |
//! | `string`          | `Name::class`, if registered | `String`              |
//! | `ReflectionClass` | `Name.class`                 | `Class`, or error     |
//! | `constant`        | registered constant name     | the constant's value  |

use crate::domain::convert::{self, LIST_SEPARATOR};
use crate::domain::{MapKey, Result, TypeHandle, TypedValue, ValuesError};
use crate::ports::{Recognizer, SymbolTable};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static INTEGER: Lazy<Regex> = Lazy::new(|| compile(r"^[+-]?[0-9]+$"));
static FLOAT: Lazy<Regex> = Lazy::new(|| compile(r"^[+-]?[0-9]+\.[0-9]+$"));
static CLASS_NAME: Lazy<Regex> = Lazy::new(|| compile(r"^([a-zA-Z_][a-zA-Z0-9_\\]*)::class$"));
static CLASS_HANDLE: Lazy<Regex> = Lazy::new(|| compile(r"^([a-zA-Z_][a-zA-Z0-9_\\]*)\.class"));

fn compile(pattern: &str) -> Regex {
    // the patterns above are fixed and valid
    Regex::new(pattern).unwrap_or_else(|e| unreachable!("invalid built-in pattern: {e}"))
}

/// Names of the built-in recognizers, in chain order.
pub const BUILTIN_NAMES: [&str; 9] = [
    "booleanTrue",
    "booleanFalse",
    "int",
    "float",
    "array",
    "range",
    "string",
    "ReflectionClass",
    "constant",
];

/// The built-in chain as `(name, recognizer)` pairs.
pub(crate) fn builtin_chain() -> Vec<(String, Arc<dyn Recognizer>)> {
    let recognizers: [Arc<dyn Recognizer>; 9] = [
        Arc::new(BooleanTrue),
        Arc::new(BooleanFalse),
        Arc::new(Integer),
        Arc::new(Float),
        Arc::new(Bracketed),
        Arc::new(Range),
        Arc::new(ClassName),
        Arc::new(ClassHandle),
        Arc::new(Constant),
    ];
    BUILTIN_NAMES
        .iter()
        .map(|name| name.to_string())
        .zip(recognizers)
        .collect()
}

/// Resolves `Name.class` to a handle on a registered type.
///
/// Returns `Ok(None)` when the input does not have that shape.
///
/// # Errors
///
/// Returns `Reflection` when the shape matches but no such type is registered.
pub fn class_handle(input: &str, symbols: &dyn SymbolTable) -> Result<Option<TypeHandle>> {
    if input.is_empty() {
        return Ok(None);
    }
    let Some(captures) = CLASS_HANDLE.captures(input) else {
        return Ok(None);
    };
    let name = &captures[1];
    symbols
        .type_named(name)
        .map(Some)
        .ok_or_else(|| ValuesError::Reflection {
            name: name.to_string(),
        })
}

/// Resolves `Name::class` to the type name if that type is registered.
pub fn class_name(input: &str, symbols: &dyn SymbolTable) -> Option<String> {
    let captures = CLASS_NAME.captures(input)?;
    let name = &captures[1];
    symbols.type_exists(name).then(|| name.to_string())
}

/// Converts the map produced by [`convert::to_map`] into a typed value.
pub(crate) fn map_value(map: IndexMap<MapKey, String>) -> TypedValue {
    TypedValue::Map(
        map.into_iter()
            .map(|(key, value)| (key, TypedValue::String(value)))
            .collect(),
    )
}

pub(crate) fn list_value(list: Vec<String>) -> TypedValue {
    TypedValue::List(list.into_iter().map(TypedValue::String).collect())
}

struct BooleanTrue;

impl Recognizer for BooleanTrue {
    fn recognize(&self, input: &str, _: &dyn SymbolTable) -> Result<Option<TypedValue>> {
        Ok(convert::is_true_word(input).then_some(TypedValue::Bool(true)))
    }
}

struct BooleanFalse;

impl Recognizer for BooleanFalse {
    fn recognize(&self, input: &str, _: &dyn SymbolTable) -> Result<Option<TypedValue>> {
        Ok(convert::is_false_word(input).then_some(TypedValue::Bool(false)))
    }
}

struct Integer;

impl Recognizer for Integer {
    fn recognize(&self, input: &str, _: &dyn SymbolTable) -> Result<Option<TypedValue>> {
        if !INTEGER.is_match(input) {
            return Ok(None);
        }
        Ok(convert::to_int(Some(input)).map(TypedValue::Int))
    }
}

struct Float;

impl Recognizer for Float {
    fn recognize(&self, input: &str, _: &dyn SymbolTable) -> Result<Option<TypedValue>> {
        if !FLOAT.is_match(input) {
            return Ok(None);
        }
        Ok(convert::to_float(Some(input)).map(TypedValue::Float))
    }
}

struct Bracketed;

impl Recognizer for Bracketed {
    fn recognize(&self, input: &str, _: &dyn SymbolTable) -> Result<Option<TypedValue>> {
        if !convert::is_bracketed(input) {
            return Ok(None);
        }
        if input.contains(':') {
            return Ok(convert::to_map(Some(input)).map(map_value));
        }
        Ok(convert::to_list(Some(input), LIST_SEPARATOR).map(list_value))
    }
}

struct Range;

impl Recognizer for Range {
    fn recognize(&self, input: &str, _: &dyn SymbolTable) -> Result<Option<TypedValue>> {
        if !input.contains("..") {
            return Ok(None);
        }
        Ok(convert::to_range(Some(input)).map(TypedValue::List))
    }
}

struct ClassName;

impl Recognizer for ClassName {
    fn recognize(&self, input: &str, symbols: &dyn SymbolTable) -> Result<Option<TypedValue>> {
        Ok(class_name(input, symbols).map(TypedValue::String))
    }
}

struct ClassHandle;

impl Recognizer for ClassHandle {
    fn recognize(&self, input: &str, symbols: &dyn SymbolTable) -> Result<Option<TypedValue>> {
        Ok(class_handle(input, symbols)?.map(TypedValue::Class))
    }
}

struct Constant;

impl Recognizer for Constant {
    fn recognize(&self, input: &str, symbols: &dyn SymbolTable) -> Result<Option<TypedValue>> {
        Ok(symbols.constant(input))
    }
}
