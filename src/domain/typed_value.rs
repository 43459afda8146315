// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dynamically typed values produced by string recognition.
//!
//! Property values are stored as strings. Recognizing them yields one of the
//! shapes in [`TypedValue`]: scalars, lists, ordered maps, or type references.

use crate::domain::convert;
use crate::domain::type_handle::TypeHandle;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Key of an ordered map produced by `to_map`.
///
/// Entries with an explicit key use that key; entries without one are assigned the
/// next free integer index. Explicit keys that spell a canonical decimal integer
/// share the integer key space, so `"5:x|y"` yields keys `5` and `6`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum MapKey {
    /// Integer key.
    Int(i64),
    /// String key.
    Str(String),
}

impl MapKey {
    /// Normalizes a textual key, turning canonical decimal integers into `Int`.
    pub fn normalize(key: &str) -> Self {
        let digits = key.strip_prefix('-').unwrap_or(key);
        let canonical = !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && (digits == "0" || !digits.starts_with('0'))
            && key != "-0";
        if canonical {
            if let Ok(n) = key.parse::<i64>() {
                return MapKey::Int(n);
            }
        }
        MapKey::Str(key.to_string())
    }
}

impl From<&str> for MapKey {
    fn from(key: &str) -> Self {
        MapKey::normalize(key)
    }
}

impl From<String> for MapKey {
    fn from(key: String) -> Self {
        MapKey::normalize(&key)
    }
}

impl From<i64> for MapKey {
    fn from(key: i64) -> Self {
        MapKey::Int(key)
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Int(n) => write!(f, "{}", n),
            MapKey::Str(s) => f.write_str(s),
        }
    }
}

/// A value recognized from a string.
///
/// # Examples
///
/// ```
/// use hexvalues::domain::TypedValue;
///
/// let value = TypedValue::from(303);
/// assert_eq!(value.type_name(), "int");
/// assert!(value.is_scalar());
/// assert_eq!(value.to_string(), "303");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    /// No value.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
    /// An ordered list.
    List(Vec<TypedValue>),
    /// An ordered map with integer or string keys.
    Map(IndexMap<MapKey, TypedValue>),
    /// A handle on a registered type.
    Class(TypeHandle),
}

impl TypedValue {
    /// Short name of the value's type, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            TypedValue::Null => "null",
            TypedValue::Bool(_) => "bool",
            TypedValue::Int(_) => "int",
            TypedValue::Float(_) => "float",
            TypedValue::String(_) => "string",
            TypedValue::List(_) => "list",
            TypedValue::Map(_) => "map",
            TypedValue::Class(_) => "class",
        }
    }

    /// Whether this is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    /// Whether this is a bool, int, float or string.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            TypedValue::Bool(_) | TypedValue::Int(_) | TypedValue::Float(_) | TypedValue::String(_)
        )
    }

    /// Whether this is a list or a map.
    pub fn is_collection(&self) -> bool {
        matches!(self, TypedValue::List(_) | TypedValue::Map(_))
    }

    /// Null, the empty string, or an empty collection.
    pub fn is_empty(&self) -> bool {
        match self {
            TypedValue::Null => true,
            TypedValue::String(s) => s.is_empty(),
            TypedValue::List(l) => l.is_empty(),
            TypedValue::Map(m) => m.is_empty(),
            _ => false,
        }
    }

    /// Returns the string slice if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            TypedValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number if this is an `Int` or a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            TypedValue::Int(n) => Some(*n as f64),
            TypedValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Iterates over the elements of a list or the values of a map.
    ///
    /// Scalars and `Null` yield nothing.
    pub fn elements(&self) -> Box<dyn Iterator<Item = &TypedValue> + '_> {
        match self {
            TypedValue::List(items) => Box::new(items.iter()),
            TypedValue::Map(map) => Box::new(map.values()),
            _ => Box::new(std::iter::empty()),
        }
    }

    /// Truthiness in the usual scripting sense: `0`, `""`, `"0"`, empty collections,
    /// `false` and `Null` are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            TypedValue::Null => false,
            TypedValue::Bool(b) => *b,
            TypedValue::Int(n) => *n != 0,
            TypedValue::Float(f) => *f != 0.0,
            TypedValue::String(s) => !(s.is_empty() || s == "0"),
            TypedValue::List(l) => !l.is_empty(),
            TypedValue::Map(m) => !m.is_empty(),
            TypedValue::Class(_) => true,
        }
    }

    /// Loose comparison: numbers compare by value across int and float, numeric
    /// strings compare as numbers, and booleans or `Null` compare by truthiness.
    pub fn loose_eq(&self, other: &TypedValue) -> bool {
        use TypedValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(b), x) | (x, Bool(b)) => *b == x.is_truthy(),
            (Null, x) | (x, Null) => !x.is_truthy() && !matches!(x, String(s) if s == "0"),
            (Int(a), Float(b)) | (Float(b), Int(a)) => (*a as f64) == *b,
            (String(s), n @ (Int(_) | Float(_))) | (n @ (Int(_) | Float(_)), String(s)) => {
                if convert::is_numeric(s) {
                    convert::to_float(Some(s)) == n.as_float()
                } else {
                    *s == n.to_string()
                }
            }
            (List(a), List(b)) => a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y)),
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Null => Ok(()),
            TypedValue::Bool(b) => write!(f, "{}", b),
            TypedValue::Int(n) => write!(f, "{}", n),
            TypedValue::Float(x) => write!(f, "{}", x),
            TypedValue::String(s) => f.write_str(s),
            TypedValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            TypedValue::Map(map) => {
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{}:{}", key, value)?;
                }
                Ok(())
            }
            TypedValue::Class(handle) => write!(f, "{}", handle),
        }
    }
}

impl From<bool> for TypedValue {
    fn from(b: bool) -> Self {
        TypedValue::Bool(b)
    }
}

impl From<i64> for TypedValue {
    fn from(n: i64) -> Self {
        TypedValue::Int(n)
    }
}

impl From<i32> for TypedValue {
    fn from(n: i32) -> Self {
        TypedValue::Int(i64::from(n))
    }
}

impl From<f64> for TypedValue {
    fn from(f: f64) -> Self {
        TypedValue::Float(f)
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::String(s.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        TypedValue::String(s)
    }
}

impl From<TypeHandle> for TypedValue {
    fn from(handle: TypeHandle) -> Self {
        TypedValue::Class(handle)
    }
}

impl<T: Into<TypedValue>> From<Vec<T>> for TypedValue {
    fn from(items: Vec<T>) -> Self {
        TypedValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<TypedValue>> From<IndexMap<MapKey, V>> for TypedValue {
    fn from(map: IndexMap<MapKey, V>) -> Self {
        TypedValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<TypedValue>> From<Option<T>> for TypedValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(TypedValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_key_normalizes_integers() {
        assert_eq!(MapKey::from("5"), MapKey::Int(5));
        assert_eq!(MapKey::from("-12"), MapKey::Int(-12));
        assert_eq!(MapKey::from("0"), MapKey::Int(0));
    }

    #[test]
    fn test_map_key_keeps_non_canonical_strings() {
        assert_eq!(MapKey::from("05"), MapKey::Str("05".to_string()));
        assert_eq!(MapKey::from("-0"), MapKey::Str("-0".to_string()));
        assert_eq!(MapKey::from("foo"), MapKey::Str("foo".to_string()));
        assert_eq!(MapKey::from(""), MapKey::Str(String::new()));
    }

    #[test]
    fn test_is_empty() {
        assert!(TypedValue::Null.is_empty());
        assert!(TypedValue::from("").is_empty());
        assert!(TypedValue::List(vec![]).is_empty());
        assert!(!TypedValue::from(0).is_empty());
        assert!(!TypedValue::from(false).is_empty());
    }

    #[test]
    fn test_display_list_and_map() {
        let list = TypedValue::from(vec!["foo", "bar"]);
        assert_eq!(list.to_string(), "foo|bar");

        let mut map = IndexMap::new();
        map.insert(MapKey::from("foo"), "bar");
        map.insert(MapKey::Int(0), "baz");
        assert_eq!(TypedValue::from(map).to_string(), "foo:bar|0:baz");
    }

    #[test]
    fn test_loose_eq_numbers_and_strings() {
        assert!(TypedValue::from(1).loose_eq(&TypedValue::from(1.0)));
        assert!(TypedValue::from("303").loose_eq(&TypedValue::from(303)));
        assert!(!TypedValue::from("abc").loose_eq(&TypedValue::from(0)));
        assert!(TypedValue::from(true).loose_eq(&TypedValue::from("yes")));
        assert!(TypedValue::Null.loose_eq(&TypedValue::from("")));
        assert!(!TypedValue::Null.loose_eq(&TypedValue::from("0")));
    }

    #[test]
    fn test_strict_equality_distinguishes_types() {
        assert_ne!(TypedValue::from(1), TypedValue::from(1.0));
        assert_ne!(TypedValue::from("1"), TypedValue::from(1));
    }
}
