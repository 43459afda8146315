// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define the interfaces
//! between the core types and their collaborators: property text parsers, secret
//! backings and name lookup for the type parser. These traits are implemented by
//! adapters in the adapters layer.

pub mod backing;
pub mod parser;
pub mod recognizer;

// Re-export commonly used types
pub use backing::{
    SecretBacking, BACKING_AES, BACKING_NONE, BACKING_NONE_PANIC, BACKING_PLAINTEXT,
};
pub use parser::{PropertiesParser, RawSection, RawSections};
pub use recognizer::{FnRecognizer, Recognizer, SymbolTable};
