// SPDX-License-Identifier: MIT OR Apache-2.0

//! Permissive string conversions.
//!
//! These functions never fail. Numeric conversions read the longest numeric
//! prefix of the input and ignore the rest, so `"80foo"` is `80` and `""` is `0`.
//! All of them pass `None` through, except [`to_bool`] which treats a missing
//! value as `false`.

use crate::domain::typed_value::{MapKey, TypedValue};
use indexmap::IndexMap;

/// Default separator for list values.
pub const LIST_SEPARATOR: &str = "|";

/// Words recognized as `true`, compared case-insensitively.
pub const TRUE_WORDS: [&str; 3] = ["yes", "true", "on"];

/// Words recognized as `false`, compared case-insensitively.
pub const FALSE_WORDS: [&str; 3] = ["no", "false", "off"];

const RANGE_OPERATOR: &str = "..";

/// Most elements a numeric range expands to.
pub const MAX_RANGE_LEN: u64 = 1 << 21;

/// Length of the numeric prefix of `input` and whether it is a plain integer.
///
/// Leading whitespace is part of the prefix. A prefix without any digit has
/// length zero.
fn numeric_prefix(input: &str) -> (usize, bool) {
    let bytes = input.as_bytes();
    let mut pos = bytes
        .iter()
        .take_while(|&&b| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c))
        .count();
    if matches!(bytes.get(pos), Some(b'+') | Some(b'-')) {
        pos += 1;
    }

    let int_start = pos;
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    let mut digits = pos - int_start;
    let mut integral = true;

    if bytes.get(pos) == Some(&b'.') {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        if digits > 0 || end > frac_start {
            digits += end - frac_start;
            pos = end;
            integral = false;
        }
    }

    if digits == 0 {
        return (0, true);
    }

    if matches!(bytes.get(pos), Some(b'e') | Some(b'E')) {
        let mut end = pos + 1;
        if matches!(bytes.get(end), Some(b'+') | Some(b'-')) {
            end += 1;
        }
        let exp_start = end;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        if end > exp_start {
            pos = end;
            integral = false;
        }
    }

    (pos, integral)
}

/// Whether the whole input, surrounding whitespace aside, is a number.
pub fn is_numeric(input: &str) -> bool {
    let trimmed = input.trim_end();
    let (len, _) = numeric_prefix(trimmed);
    len > 0 && len == trimmed.len()
}

/// Converts to an integer using the numeric prefix of the input.
///
/// Fractions are truncated and values beyond the `i64` range saturate.
///
/// # Examples
///
/// ```
/// use hexvalues::domain::convert::to_int;
///
/// assert_eq!(to_int(Some("303")), Some(303));
/// assert_eq!(to_int(Some("3.14")), Some(3));
/// assert_eq!(to_int(Some("80foo")), Some(80));
/// assert_eq!(to_int(Some("")), Some(0));
/// assert_eq!(to_int(None), None);
/// ```
pub fn to_int(input: Option<&str>) -> Option<i64> {
    let input = input?;
    let (len, integral) = numeric_prefix(input);
    if len == 0 {
        return Some(0);
    }
    let prefix = input[..len].trim_start();
    if integral {
        let digits = prefix.trim_start_matches('+');
        return Some(digits.parse::<i64>().unwrap_or_else(|_| {
            if digits.starts_with('-') {
                i64::MIN
            } else {
                i64::MAX
            }
        }));
    }
    Some(prefix.parse::<f64>().map(|f| f as i64).unwrap_or(0))
}

/// Converts to a float using the numeric prefix of the input.
///
/// ```
/// use hexvalues::domain::convert::to_float;
///
/// assert_eq!(to_float(Some("2.5")), Some(2.5));
/// assert_eq!(to_float(Some("1e3")), Some(1000.0));
/// assert_eq!(to_float(Some("foo")), Some(0.0));
/// ```
pub fn to_float(input: Option<&str>) -> Option<f64> {
    let input = input?;
    let (len, _) = numeric_prefix(input);
    if len == 0 {
        return Some(0.0);
    }
    Some(input[..len].trim_start().parse::<f64>().unwrap_or(0.0))
}

/// Whether the input is one of [`TRUE_WORDS`]. A missing value is `false`.
pub fn to_bool(input: Option<&str>) -> bool {
    input.is_some_and(is_true_word)
}

pub(crate) fn is_true_word(input: &str) -> bool {
    TRUE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(input))
}

pub(crate) fn is_false_word(input: &str) -> bool {
    FALSE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(input))
}

/// Whether the input is enclosed in square brackets.
pub(crate) fn is_bracketed(input: &str) -> bool {
    input.starts_with('[') && input.ends_with(']')
}

fn strip_brackets(input: &str) -> &str {
    if input.len() >= 2 && is_bracketed(input) {
        &input[1..input.len() - 1]
    } else {
        input
    }
}

/// Splits the input into a list.
///
/// One layer of enclosing brackets is removed first. Text without the separator
/// becomes a single element list.
///
/// ```
/// use hexvalues::domain::convert::to_list;
///
/// assert_eq!(to_list(Some("[foo|bar]"), "|"), Some(vec!["foo".to_string(), "bar".to_string()]));
/// assert_eq!(to_list(Some("foo"), "|"), Some(vec!["foo".to_string()]));
/// assert_eq!(to_list(Some("[]"), "|"), Some(vec![]));
/// ```
pub fn to_list(input: Option<&str>, separator: &str) -> Option<Vec<String>> {
    let stripped = strip_brackets(input?);
    if stripped.is_empty() {
        return Some(Vec::new());
    }
    if !separator.is_empty() && stripped.contains(separator) {
        return Some(stripped.split(separator).map(str::to_string).collect());
    }
    Some(vec![stripped.to_string()])
}

/// Splits the input into a map of `key:value` entries.
///
/// Entries without a colon are appended under the next free integer key. Keys
/// that are canonical integers become [`MapKey::Int`], so they share the space
/// of appended entries.
///
/// ```
/// use hexvalues::domain::convert::to_map;
/// use hexvalues::domain::MapKey;
///
/// let map = to_map(Some("foo:bar|baz")).unwrap();
/// assert_eq!(map[&MapKey::from("foo")], "bar");
/// assert_eq!(map[&MapKey::Int(0)], "baz");
/// ```
pub fn to_map(input: Option<&str>) -> Option<IndexMap<MapKey, String>> {
    let input = input?;
    let mut map = IndexMap::new();
    let mut next_index: i64 = 0;
    for entry in to_list(Some(input), LIST_SEPARATOR).unwrap_or_default() {
        let key = match entry.split_once(':') {
            Some((key, value)) => {
                let key = MapKey::normalize(key);
                map.insert(key.clone(), value.to_string());
                key
            }
            None => {
                let key = MapKey::Int(next_index);
                map.insert(key.clone(), entry);
                key
            }
        };
        if let MapKey::Int(index) = key {
            if index >= next_index {
                next_index = index.saturating_add(1);
            }
        }
    }
    Some(map)
}

/// Expands `min..max` into an inclusive sequence.
///
/// Numeric bounds give integers, or floats with a step of one when either bound
/// has a fraction or exponent. Other bounds give single characters between the
/// first characters of both sides. Descending bounds produce a descending
/// sequence. Text without `..` or with an empty bound gives an empty list, as
/// does a numeric range with a non-finite bound or more than
/// [`MAX_RANGE_LEN`] elements.
///
/// ```
/// use hexvalues::domain::convert::to_range;
/// use hexvalues::domain::TypedValue;
///
/// assert_eq!(to_range(Some("5..3")), Some(vec![TypedValue::Int(5), TypedValue::Int(4), TypedValue::Int(3)]));
/// assert_eq!(to_range(Some("a..c")).unwrap().len(), 3);
/// assert_eq!(to_range(Some("1..")), Some(vec![]));
/// ```
pub fn to_range(input: Option<&str>) -> Option<Vec<TypedValue>> {
    let input = input?;
    let Some((min, max)) = input.split_once(RANGE_OPERATOR) else {
        return Some(Vec::new());
    };
    if min.is_empty() || max.is_empty() {
        return Some(Vec::new());
    }

    if is_numeric(min) || is_numeric(max) {
        let fractional = |s: &str| !numeric_prefix(s).1;
        if fractional(min) || fractional(max) {
            return Some(float_range(
                to_float(Some(min)).unwrap_or(0.0),
                to_float(Some(max)).unwrap_or(0.0),
            ));
        }
        return Some(int_range(
            to_int(Some(min)).unwrap_or(0),
            to_int(Some(max)).unwrap_or(0),
        ));
    }

    let (Some(first), Some(last)) = (min.chars().next(), max.chars().next()) else {
        return Some(Vec::new());
    };
    Some(char_range(first, last))
}

fn int_range(min: i64, max: i64) -> Vec<TypedValue> {
    let count = (i128::from(max) - i128::from(min)).unsigned_abs() + 1;
    if count > u128::from(MAX_RANGE_LEN) {
        tracing::warn!("Range {}..{} exceeds {} elements", min, max, MAX_RANGE_LEN);
        return Vec::new();
    }
    if min <= max {
        (min..=max).map(TypedValue::Int).collect()
    } else {
        (max..=min).rev().map(TypedValue::Int).collect()
    }
}

fn float_range(min: f64, max: f64) -> Vec<TypedValue> {
    let span = (max - min).abs().floor();
    if !span.is_finite() || span >= MAX_RANGE_LEN as f64 {
        tracing::warn!("Range {}..{} exceeds {} elements", min, max, MAX_RANGE_LEN);
        return Vec::new();
    }
    let steps = span as u64;
    let direction = if min <= max { 1.0 } else { -1.0 };
    (0..=steps)
        .map(|i| TypedValue::Float(min + direction * i as f64))
        .collect()
}

fn char_range(first: char, last: char) -> Vec<TypedValue> {
    let as_value = |c: u32| char::from_u32(c).map(|c| TypedValue::String(c.to_string()));
    let (lo, hi) = (first as u32, last as u32);
    if lo <= hi {
        (lo..=hi).filter_map(as_value).collect()
    } else {
        (hi..=lo).rev().filter_map(as_value).collect()
    }
}
