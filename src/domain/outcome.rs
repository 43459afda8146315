// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable optional-value box with fallback combinators.
//!
//! [`Outcome`] wraps a value that may be absent. All absent outcomes are the same
//! `Outcome::empty()` variant, so "is this the absent case" is a plain equality check.

use crate::domain::typed_value::TypedValue;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Types that have a notion of being empty beyond being absent.
///
/// Strings and collections are empty when they have no elements. Integers are never
/// empty, zero included.
pub trait Emptiness {
    /// Whether the value counts as empty.
    fn is_empty_value(&self) -> bool;
}

impl Emptiness for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl Emptiness for &str {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Emptiness for Vec<T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V, S> Emptiness for HashMap<K, V, S> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V, S> Emptiness for IndexMap<K, V, S> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl Emptiness for TypedValue {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

macro_rules! never_empty {
    ($($ty:ty),*) => {
        $(impl Emptiness for $ty {
            fn is_empty_value(&self) -> bool {
                false
            }
        })*
    };
}

never_empty!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool);

/// An immutable box around a value that may be absent.
///
/// # Examples
///
/// ```
/// use hexvalues::domain::Outcome;
///
/// let port = Outcome::<&str>::of(Some("8080"))
///     .map(|s| s.parse::<u16>().unwrap_or_default())
///     .filter(|p| *p > 1024);
/// assert_eq!(port.value(), Some(&8080));
///
/// let missing: Outcome<&str> = Outcome::of(None);
/// assert_eq!(missing, Outcome::empty());
/// assert_eq!(missing.when_null("fallback").value(), Some(&"fallback"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Outcome<T>(Option<T>);

impl<T> Outcome<T> {
    /// Wraps a value; `None` yields the empty outcome.
    pub fn of(value: impl Into<Option<T>>) -> Self {
        Outcome(value.into())
    }

    /// The empty outcome.
    pub const fn empty() -> Self {
        Outcome(None)
    }

    /// Whether a value is present.
    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// Borrows the wrapped value.
    pub fn value(&self) -> Option<&T> {
        self.0.as_ref()
    }

    /// Unwraps into the inner option.
    pub fn into_value(self) -> Option<T> {
        self.0
    }

    /// Keeps the value only if it satisfies the predicate.
    pub fn filter(self, predicate: impl FnOnce(&T) -> bool) -> Self {
        match self.0 {
            Some(value) if predicate(&value) => Outcome(Some(value)),
            _ => Outcome::empty(),
        }
    }

    /// Transforms a present value.
    pub fn map<U>(self, mapper: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome(self.0.map(mapper))
    }

    /// Transforms a present value with a mapper that may itself yield nothing.
    pub fn and_then<U>(self, mapper: impl FnOnce(T) -> Option<U>) -> Outcome<U> {
        Outcome(self.0.and_then(mapper))
    }

    /// Falls back to `other` when no value is present.
    pub fn when_null(self, other: impl Into<Option<T>>) -> Self {
        if self.is_present() {
            return self;
        }
        Outcome::of(other)
    }

    /// Falls back to a lazily computed value when no value is present.
    pub fn apply_when_null<O: Into<Option<T>>>(self, other: impl FnOnce() -> O) -> Self {
        if self.is_present() {
            return self;
        }
        Outcome::of(other())
    }
}

impl<T: Emptiness> Outcome<T> {
    /// Absent, or present but an empty string or collection.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            None => true,
            Some(value) => value.is_empty_value(),
        }
    }

    /// Falls back to `other` when the outcome is empty.
    pub fn when_empty(self, other: impl Into<Option<T>>) -> Self {
        if !self.is_empty() {
            return self;
        }
        Outcome::of(other)
    }

    /// Falls back to a lazily computed value when the outcome is empty.
    pub fn apply_when_empty<O: Into<Option<T>>>(self, other: impl FnOnce() -> O) -> Self {
        if !self.is_empty() {
            return self;
        }
        Outcome::of(other())
    }
}

impl<T> Default for Outcome<T> {
    fn default() -> Self {
        Outcome::empty()
    }
}

impl<T> From<Option<T>> for Outcome<T> {
    fn from(value: Option<T>) -> Self {
        Outcome(value)
    }
}
