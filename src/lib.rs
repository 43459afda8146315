// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed values from plain strings, sectioned properties, and secrets.
//!
//! This crate turns the strings found in configuration files into typed values,
//! offers read-only and modifiable stores for INI-style properties, and keeps
//! passwords out of plain sight by wrapping them as secrets.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types (`TypedValue`, `Outcome`, `Value`, `Pattern`,
//!   `Secret`, errors) and the permissive string conversions
//! - **Ports**: Trait definitions (`PropertiesParser`, `SecretBacking`,
//!   `Recognizer`, `SymbolTable`)
//! - **Adapters**: The INI parser and file adapter, secret backings, and the
//!   registered symbol table
//! - **Service**: The type parser, the fluent per-value parser and the property
//!   stores
//!
//! # Features
//!
//! - **Type Recognition**: `"yes"` becomes `true`, `"303"` an integer, `"[a|b]"` a
//!   list, `"1..5"` a range, with an extensible, ordered recognizer chain
//! - **Properties**: INI sections with lookups, parsing accessors and merging
//! - **Secrets**: Payloads are encrypted in a side table and never printed
//! - **Value Checks**: Containment, membership, pattern and named checks
//!
//! # Feature Flags
//!
//! - `ini`: Enable INI text and file support (default)
//! - `aes`: Enable the AES-GCM secret backing (default); without it secrets use
//!   the base64 backing
//! - `dirs`: Enable loading from the OS configuration directory (default)
//! - `full`: Enable all features
//!
//! # Shared State
//!
//! Three pieces of state have a process-wide default: the recognizer chain of
//! [`TypeParser::shared`](service::TypeParser::shared), the named checks of
//! [`CheckRegistry::global`](domain::CheckRegistry::global) and the secret side
//! table of [`SecretVault::global`](domain::SecretVault::global). Each can be
//! replaced by an explicitly constructed instance where isolation is needed.
//!
//! # Quick Start
//!
//! ```rust
//! use hexvalues::prelude::*;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let properties = Properties::from_string(
//!     "[server]\nport = 8080\nflags = [fast|safe]\n[db]\npassword = hunter2",
//! )?;
//!
//! assert_eq!(properties.parse("server", "port")?.as_int()?, Some(8080));
//! assert_eq!(
//!     properties.parse_value("server", "flags")?,
//!     Some(ParsedProperty::Value(TypedValue::from(vec!["fast", "safe"])))
//! );
//!
//! let password = properties.value("db", "password").and_then(PropertyValue::as_secret);
//! assert_eq!(password.map(ToString::to_string).as_deref(), Some("[REDACTED]"));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        Outcome, Result, Secret, SecretVault, TypeHandle, TypedValue, Value, ValuesError,
    };
    pub use crate::ports::{PropertiesParser, Recognizer, SecretBacking, SymbolTable};
    pub use crate::service::{
        ModifiableProperties, ParsedProperty, ParsedValue, Properties, PropertyValue, TypeParser,
    };

    pub use crate::adapters::StaticSymbolTable;
    // Re-export adapters based on feature flags
    #[cfg(feature = "ini")]
    pub use crate::adapters::{IniFileAdapter, IniParser};
}
