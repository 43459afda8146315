// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and logic.
//!
//! This module contains the value types of the crate: typed values produced by
//! parsing, the optional-value wrapper, pattern matching, value checks, secrets
//! and the permissive string conversions. File formats live in the adapters
//! layer, as do the concrete secret backings the vault resolves by name.

pub mod convert;
pub mod errors;
pub mod outcome;
pub mod pattern;
pub mod secret;
pub mod type_handle;
pub mod typed_value;
pub mod value;

// Re-export commonly used types
pub use errors::{Result, ValuesError};
pub use outcome::{Emptiness, Outcome};
pub use pattern::{pattern, Pattern, PatternFailure};
pub use secret::{IntoSecret, Secret, SecretInput, SecretVault};
pub use type_handle::{TypeHandle, TypeKind};
pub use typed_value::{MapKey, TypedValue};
pub use value::{type_of, CheckRegistry, Value};
