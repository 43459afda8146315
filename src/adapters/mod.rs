// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing implementations of the ports.
//!
//! This module contains the INI properties parser and file adapter, the secret
//! backings, and the statically registered symbol table used by the type parser.

pub mod backings;
#[cfg(feature = "ini")]
pub mod ini_file;
pub mod static_symbols;

// Re-export adapters based on feature flags
#[cfg(feature = "aes")]
pub use backings::AesGcmBacking;
pub use backings::{Base64Backing, FailingBacking, FailureMode};
#[cfg(feature = "ini")]
pub use ini_file::{IniFileAdapter, IniParser};
pub use static_symbols::StaticSymbolTable;
