// SPDX-License-Identifier: MIT OR Apache-2.0

//! Regular expression matching with translated failures.
//!
//! A [`Pattern`] holds one regular expression. Patterns may be written bare
//! (`^foo$`) or in the delimited form common to PCRE (`/^foo$/i`); in the latter
//! case trailing modifiers are turned into inline flags.

use crate::domain::errors::{Result, ValuesError};
use once_cell::sync::OnceCell;
use regex::{Regex, RegexBuilder};

/// Upper bound on the compiled size of a pattern.
const SIZE_LIMIT: usize = 10 * 1024 * 1024;

/// Characters accepted as delimiters of a delimited pattern.
const DELIMITERS: &[char] = &['/', '#', '~', '!', '%', '@'];

/// Failure categories of a regular expression engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternFailure {
    /// The pattern does not compile.
    InvalidPattern,
    /// The engine failed internally.
    Internal,
    /// Backtracking limit reached.
    BacktrackLimit,
    /// Recursion limit reached.
    RecursionLimit,
    /// Subject or pattern is not valid UTF-8.
    MalformedUtf8,
    /// An offset did not end on a UTF-8 code point boundary.
    Utf8Boundary,
    /// The JIT ran out of stack.
    JitStackLimit,
}

impl PatternFailure {
    /// Human readable diagnostic for the failure.
    pub fn message(self) -> &'static str {
        match self {
            PatternFailure::InvalidPattern => "invalid regular expression",
            PatternFailure::Internal => "internal PCRE error",
            PatternFailure::BacktrackLimit => "backtrack limit exhausted",
            PatternFailure::RecursionLimit => "recursion limit exhausted",
            PatternFailure::MalformedUtf8 => "malformed UTF-8 data",
            PatternFailure::Utf8Boundary => "did not end at valid UTF-8 codepoint",
            PatternFailure::JitStackLimit => "failed because of limited JIT stack space",
        }
    }

    /// Categorizes a compile failure reported by the regex engine.
    ///
    /// A pattern whose compiled program outgrows the size limit is reported as
    /// [`PatternFailure::BacktrackLimit`], the engine's resource limit. Errors
    /// the engine may add later have no category.
    pub fn from_regex_error(error: &regex::Error) -> Option<Self> {
        match error {
            regex::Error::Syntax(_) => Some(PatternFailure::InvalidPattern),
            regex::Error::CompiledTooBig(_) => Some(PatternFailure::BacktrackLimit),
            _ => None,
        }
    }
}

/// Diagnostic for an engine failure, falling back to the engine's own message.
pub fn message_for_error(error: &regex::Error) -> String {
    PatternFailure::from_regex_error(error)
        .map(|failure| failure.message().to_string())
        .unwrap_or_else(|| format!("Unknown error: {}", error))
}

/// A regular expression.
///
/// # Examples
///
/// ```
/// use hexvalues::domain::Pattern;
///
/// let pattern = Pattern::new("/^[a-z]+$/i");
/// assert!(pattern.matches("Hello").unwrap());
/// assert!(!pattern.matches("hello world").unwrap());
/// ```
#[derive(Debug)]
pub struct Pattern {
    pattern: String,
    compiled: OnceCell<Regex>,
}

impl Pattern {
    /// Creates a pattern. Compilation happens on first use.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            compiled: OnceCell::new(),
        }
    }

    /// The pattern as given.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Whether the pattern matches `value`.
    ///
    /// # Errors
    ///
    /// Returns `PatternMatchFailed` when the pattern can not be evaluated.
    pub fn matches(&self, value: &str) -> Result<bool> {
        let regex = self.compiled.get_or_try_init(|| self.compile())?;
        Ok(regex.find(value).is_some())
    }

    fn compile(&self) -> Result<Regex> {
        let (body, flags) = split_delimited(&self.pattern);
        let mut builder = RegexBuilder::new(body);
        builder.size_limit(SIZE_LIMIT);
        for flag in flags.chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                'x' => builder.ignore_whitespace(true),
                'U' => builder.swap_greed(true),
                'u' => builder.unicode(true),
                other => {
                    return Err(self.failure(format!("unknown modifier '{}'", other)));
                }
            };
        }
        builder.build().map_err(|e| {
            let reason = message_for_error(&e);
            tracing::debug!("Failed to compile pattern '{}': {}", self.pattern, reason);
            self.failure(reason)
        })
    }

    fn failure(&self, reason: String) -> ValuesError {
        ValuesError::PatternMatchFailed {
            pattern: self.pattern.clone(),
            reason,
        }
    }
}

impl Clone for Pattern {
    fn clone(&self) -> Self {
        Pattern::new(self.pattern.clone())
    }
}

/// Shorthand for [`Pattern::new`].
pub fn pattern(regex: impl Into<String>) -> Pattern {
    Pattern::new(regex)
}

/// Splits `/body/flags` into body and flags; bare patterns have no flags.
fn split_delimited(pattern: &str) -> (&str, &str) {
    let mut chars = pattern.chars();
    let Some(delimiter) = chars.next().filter(|c| DELIMITERS.contains(c)) else {
        return (pattern, "");
    };
    let rest = &pattern[delimiter.len_utf8()..];
    match rest.rfind(delimiter) {
        Some(end) => {
            let flags = &rest[end + delimiter.len_utf8()..];
            if flags.chars().all(|c| c.is_ascii_alphabetic()) {
                (&rest[..end], flags)
            } else {
                (pattern, "")
            }
        }
        None => (pattern, ""),
    }
}
