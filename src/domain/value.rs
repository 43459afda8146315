// SPDX-License-Identifier: MIT OR Apache-2.0

//! Predicates over a wrapped value.
//!
//! [`Value`] wraps one [`TypedValue`] and answers questions about it: containment,
//! equality, membership, pattern matches and arbitrary predicates. Additional named
//! checks can be registered in a [`CheckRegistry`] and invoked by name.

use crate::domain::convert;
use crate::domain::errors::{Result, ValuesError};
use crate::domain::pattern::Pattern;
use crate::domain::typed_value::TypedValue;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// A named check: receives the wrapped value and the call arguments.
pub type Check = Arc<dyn Fn(&TypedValue, &[TypedValue]) -> bool + Send + Sync>;

type BuiltinCheck = fn(&TypedValue) -> bool;

/// Checks that are always available and can not be redefined.
const BUILTIN_CHECKS: &[(&str, BuiltinCheck)] = &[
    ("is_null", |v| v.is_null()),
    ("is_bool", |v| matches!(v, TypedValue::Bool(_))),
    ("is_int", |v| matches!(v, TypedValue::Int(_))),
    ("is_integer", |v| matches!(v, TypedValue::Int(_))),
    ("is_long", |v| matches!(v, TypedValue::Int(_))),
    ("is_float", |v| matches!(v, TypedValue::Float(_))),
    ("is_double", |v| matches!(v, TypedValue::Float(_))),
    ("is_numeric", is_numeric),
    ("is_string", |v| matches!(v, TypedValue::String(_))),
    ("is_array", |v| v.is_collection()),
    ("is_iterable", |v| v.is_collection()),
    ("is_scalar", |v| v.is_scalar()),
    ("ctype_digit", |v| {
        v.as_str()
            .is_some_and(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
    }),
];

fn is_numeric(value: &TypedValue) -> bool {
    match value {
        TypedValue::Int(_) | TypedValue::Float(_) => true,
        TypedValue::String(s) => convert::is_numeric(s),
        _ => false,
    }
}

fn builtin(name: &str) -> Option<BuiltinCheck> {
    BUILTIN_CHECKS
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|(_, check)| *check)
}

static GLOBAL_CHECKS: Lazy<RwLock<CheckRegistry>> = Lazy::new(|| RwLock::new(CheckRegistry::new()));

/// Registry of named checks.
///
/// A registry starts with no user-defined checks. The built-in checks (`is_int`,
/// `is_string`, ...) are always callable and their names can not be taken.
///
/// # Examples
///
/// ```
/// use hexvalues::domain::{CheckRegistry, TypedValue, Value};
///
/// let mut checks = CheckRegistry::new();
/// checks
///     .define("isPort", |v: &TypedValue, _: &[TypedValue]| {
///         v.as_int().is_some_and(|p| (1..=65535).contains(&p))
///     })
///     .unwrap();
///
/// assert!(Value::of(8080).check_with(&checks, "isPort", &[]).unwrap());
/// assert!(Value::of(8080).check_with(&checks, "is_int", &[]).unwrap());
/// assert!(checks.define("is_int", |_: &TypedValue, _: &[TypedValue]| true).is_err());
/// ```
#[derive(Clone, Default)]
pub struct CheckRegistry {
    checks: HashMap<String, Check>,
}

impl CheckRegistry {
    /// Creates a registry without user-defined checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by [`Value::check`] and [`Value::define_check`].
    pub fn global() -> &'static RwLock<CheckRegistry> {
        &GLOBAL_CHECKS
    }

    /// Registers a named check, replacing an earlier user-defined one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `name` is the name of a built-in check.
    pub fn define<F>(&mut self, name: impl Into<String>, check: F) -> Result<()>
    where
        F: Fn(&TypedValue, &[TypedValue]) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        if builtin(&name).is_some() {
            return Err(ValuesError::invalid_argument(format!(
                "Can not overwrite built-in check {}().",
                name
            )));
        }
        tracing::debug!("Defining value check '{}'", name);
        self.checks.insert(name, Arc::new(check));
        Ok(())
    }

    /// Whether `name` is callable, either user-defined or built in.
    pub fn is_defined(&self, name: &str) -> bool {
        self.checks.contains_key(name) || builtin(name).is_some()
    }

    /// Number of user-defined checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether no user-defined checks exist.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    fn call(&self, name: &str, value: &TypedValue, arguments: &[TypedValue]) -> Result<bool> {
        if let Some(check) = self.checks.get(name) {
            return Ok(check(value, arguments));
        }
        if let Some(check) = builtin(name) {
            return Ok(check(value));
        }
        Err(ValuesError::BadMethodCall {
            class: "Value".to_string(),
            method: name.to_string(),
        })
    }
}

impl fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckRegistry")
            .field("checks", &self.checks.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A wrapped value with predicate methods.
///
/// `Value::of(TypedValue::Null)` and `Value::null()` are the same value.
///
/// # Examples
///
/// ```
/// use hexvalues::domain::Value;
///
/// let value = Value::of("foobar");
/// assert!(value.contains("foo"));
/// assert!(value.is_matched_by("/^foo/").unwrap());
/// assert!(!value.is_null());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Value(TypedValue);

impl Value {
    /// Wraps a value.
    pub fn of(value: impl Into<TypedValue>) -> Self {
        Value(value.into())
    }

    /// The wrapped null value.
    pub const fn null() -> Self {
        Value(TypedValue::Null)
    }

    /// Borrows the wrapped value.
    pub fn value(&self) -> &TypedValue {
        &self.0
    }

    /// Whether the wrapped value is null.
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// Null, the empty string, or an empty collection.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the value contains `needle`.
    ///
    /// Strings are searched for the needle's string form, collections for an
    /// element strictly equal to the needle. A null value only contains null.
    pub fn contains(&self, needle: impl Into<TypedValue>) -> bool {
        let needle = needle.into();
        match &self.0 {
            TypedValue::Null => needle.is_null(),
            TypedValue::String(haystack) => haystack.contains(&needle.to_string()),
            collection => collection.elements().any(|element| *element == needle),
        }
    }

    /// Whether the scalar value equals or, for strings, contains any candidate.
    ///
    /// Boolean candidates only match a strictly equal value.
    pub fn contains_any_of(&self, candidates: &[TypedValue]) -> bool {
        if !self.0.is_scalar() {
            return false;
        }
        candidates.iter().any(|candidate| match candidate {
            TypedValue::Bool(_) => self.0 == *candidate,
            _ => {
                self.0 == *candidate
                    || self
                        .0
                        .as_str()
                        .is_some_and(|s| s.contains(&candidate.to_string()))
            }
        })
    }

    /// Strict comparison with a scalar or null.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `expected` is a collection or type handle.
    pub fn equals(&self, expected: impl Into<TypedValue>) -> Result<bool> {
        let expected = expected.into();
        if !expected.is_scalar() && !expected.is_null() {
            return Err(ValuesError::invalid_argument(
                "Can only compare scalar values and null.",
            ));
        }
        Ok(expected == self.0)
    }

    /// Whether the value, or every element of a collection value, appears in
    /// `allowed` under loose comparison.
    pub fn is_one_of(&self, allowed: &[TypedValue]) -> bool {
        self.is_one_of_by(allowed, TypedValue::loose_eq)
    }

    /// Like [`Value::is_one_of`] but compares type and value.
    pub fn is_one_of_strict(&self, allowed: &[TypedValue]) -> bool {
        self.is_one_of_by(allowed, |a, b| a == b)
    }

    fn is_one_of_by(&self, allowed: &[TypedValue], eq: impl Fn(&TypedValue, &TypedValue) -> bool) -> bool {
        let member = |candidate: &TypedValue| allowed.iter().any(|a| eq(candidate, a));
        if self.0.is_collection() {
            return self.0.elements().all(member);
        }
        member(&self.0)
    }

    /// Whether the string value matches `regex`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for non-string values and `PatternMatchFailed`
    /// when the pattern can not be evaluated.
    pub fn is_matched_by(&self, regex: &str) -> Result<bool> {
        match &self.0 {
            TypedValue::String(s) => Pattern::new(regex).matches(s),
            other => Err(ValuesError::invalid_argument(format!(
                "Given value of type \"{}\" can not be matched against a regular expression.",
                type_of(other)
            ))),
        }
    }

    /// Whether the value satisfies `predicate`.
    pub fn satisfies(&self, predicate: impl FnOnce(&TypedValue) -> bool) -> bool {
        predicate(&self.0)
    }

    /// Registers a named check in the global registry.
    pub fn define_check<F>(name: impl Into<String>, check: F) -> Result<()>
    where
        F: Fn(&TypedValue, &[TypedValue]) -> bool + Send + Sync + 'static,
    {
        CheckRegistry::global()
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .define(name, check)
    }

    /// Invokes a named check from the global registry.
    ///
    /// # Errors
    ///
    /// Returns `BadMethodCall` when no check with that name exists.
    pub fn check(&self, name: &str, arguments: &[TypedValue]) -> Result<bool> {
        let registry = CheckRegistry::global()
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        registry.call(name, &self.0, arguments)
    }

    /// Invokes a named check from an explicit registry.
    pub fn check_with(
        &self,
        registry: &CheckRegistry,
        name: &str,
        arguments: &[TypedValue],
    ) -> Result<bool> {
        registry.call(name, &self.0, arguments)
    }
}

impl From<TypedValue> for Value {
    fn from(value: TypedValue) -> Self {
        Value(value)
    }
}

/// Type name of a value for diagnostics; type handles report the type they name.
pub fn type_of(value: &TypedValue) -> String {
    match value {
        TypedValue::Class(handle) => handle.name().to_string(),
        other => other.type_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> TypedValue {
        TypedValue::from(items.to_vec())
    }

    #[test]
    fn test_null_values_are_equal() {
        assert_eq!(Value::of(TypedValue::Null), Value::null());
        assert_eq!(Value::of(None::<i64>), Value::null());
    }

    #[test]
    fn test_value_returns_wrapped_value() {
        assert_eq!(Value::of(303).value(), &TypedValue::Int(303));
    }

    #[test]
    fn test_contains_true_cases() {
        assert!(Value::null().contains(TypedValue::Null));
        assert!(Value::of("foo5").contains(5));
        assert!(Value::of("fo5o").contains(5));
        assert!(Value::of("foobar").contains("foo"));
        assert!(Value::of(list(&["foo", "bar", "baz"])).contains("foo"));
        assert!(Value::of(TypedValue::List(vec![
            "foo".into(),
            TypedValue::Null,
            "baz".into()
        ]))
        .contains(TypedValue::Null));
    }

    #[test]
    fn test_contains_false_cases() {
        assert!(!Value::of("foo").contains(5));
        assert!(!Value::of("blub").contains(true));
        assert!(!Value::of("bar").contains("dummy"));
        assert!(!Value::of(list(&["foo", "bar", "baz"])).contains("nope"));
        assert!(!Value::of(303).contains(3));
    }

    #[test]
    fn test_contains_any_of_true_cases() {
        assert!(Value::of(true).contains_any_of(&[true.into()]));
        assert!(Value::of(false).contains_any_of(&[false.into()]));
        assert!(Value::of(5).contains_any_of(&[5.into()]));
        assert!(Value::of("55").contains_any_of(&[5.into()]));
        assert!(Value::of("fo5o").contains_any_of(&[5.into()]));
        assert!(Value::of("foobar").contains_any_of(&["foo".into(), "bar".into()]));
    }

    #[test]
    fn test_contains_any_of_false_cases() {
        assert!(!Value::of(false).contains_any_of(&[true.into()]));
        assert!(!Value::null().contains_any_of(&[false.into()]));
        assert!(!Value::of("foo").contains_any_of(&[5.into()]));
        assert!(!Value::of(55).contains_any_of(&[5.into()]));
        assert!(!Value::of(5).contains_any_of(&[true.into()]));
        assert!(!Value::of(0).contains_any_of(&[false.into()]));
        assert!(!Value::of("foo").contains_any_of(&[true.into()]));
        assert!(!Value::of(list(&["foo"])).contains_any_of(&["foo".into()]));
    }

    #[test]
    fn test_equals_is_strict() {
        assert!(Value::of(true).equals(true).unwrap());
        assert!(Value::of(5).equals(5).unwrap());
        assert!(Value::null().equals(TypedValue::Null).unwrap());
        assert!(!Value::of(0).equals(false).unwrap());
        assert!(!Value::of("5").equals(5).unwrap());
        assert!(!Value::null().equals(false).unwrap());
    }

    #[test]
    fn test_equals_rejects_collections() {
        let result = Value::of("foo").equals(list(&["foo"]));
        assert!(matches!(result, Err(ValuesError::InvalidArgument { .. })));
    }

    #[test]
    fn test_is_one_of() {
        let allowed = [TypedValue::from("foo"), TypedValue::from("bar")];
        assert!(Value::of("foo").is_one_of(&allowed));
        assert!(Value::of(list(&["bar", "foo"])).is_one_of(&allowed));
        assert!(!Value::of("baz").is_one_of(&allowed));
        assert!(!Value::null().is_one_of(&allowed));
        assert!(!Value::of(list(&["bar", "foo", "baz"])).is_one_of(&allowed));
    }

    #[test]
    fn test_is_one_of_loose_versus_strict() {
        let allowed = [TypedValue::from(303)];
        assert!(Value::of("303").is_one_of(&allowed));
        assert!(!Value::of("303").is_one_of_strict(&allowed));
    }

    #[test]
    fn test_is_matched_by() {
        assert!(Value::of("foo").is_matched_by("/^([a-z]{3})$/").unwrap());
        assert!(Value::of("Bar").is_matched_by("/^([a-z]{3})$/i").unwrap());
        assert!(!Value::of("Bar").is_matched_by("/^([a-z]{3})$/").unwrap());
        assert!(!Value::of("baz0123").is_matched_by("/^([a-z]{3})$/i").unwrap());
    }

    #[test]
    fn test_is_matched_by_rejects_non_strings() {
        let err = Value::of(303).is_matched_by("/3/").unwrap_err();
        assert!(err.to_string().contains("\"int\""));
    }

    #[test]
    fn test_satisfies() {
        assert!(Value::of(303).satisfies(|v| *v == TypedValue::Int(303)));
        assert!(!Value::of(303).satisfies(|v| *v != TypedValue::Int(303)));
    }

    #[test]
    fn test_undefined_check_is_bad_method_call() {
        let err = Value::of(303).check("isAwesome", &[]).unwrap_err();
        assert_eq!(err.to_string(), "Method Value::isAwesome() does not exist.");
    }

    #[test]
    fn test_defined_check_in_global_registry() {
        Value::define_check("isReallyAwesome", |v, _| *v == TypedValue::Int(303)).unwrap();
        assert!(Value::of(303).check("isReallyAwesome", &[]).unwrap());
    }

    #[test]
    fn test_builtin_checks_are_callable() {
        assert!(Value::of(303).check("is_int", &[]).unwrap());
        assert!(Value::of("3.5").check("is_numeric", &[]).unwrap());
        assert!(!Value::of("abc").check("is_numeric", &[]).unwrap());
    }

    #[test]
    fn test_builtin_checks_can_not_be_overwritten() {
        let err = Value::define_check("is_integer", |_, _| true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument: Can not overwrite built-in check is_integer()."
        );
    }

    #[test]
    fn test_check_receives_arguments() {
        let mut registry = CheckRegistry::new();
        registry
            .define("isGreaterThan", |v, args| {
                match (v.as_int(), args.first().and_then(TypedValue::as_int)) {
                    (Some(v), Some(min)) => v > min,
                    _ => false,
                }
            })
            .unwrap();
        assert!(Value::of(5)
            .check_with(&registry, "isGreaterThan", &[3.into()])
            .unwrap());
        assert_eq!(registry.len(), 1);
    }
}
