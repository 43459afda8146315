// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer built on the domain types and adapters.
//!
//! This module contains the type parser with its recognizer chain, the fluent
//! per-value parser, and the property stores.

pub mod modifiable;
pub mod parsed_value;
pub mod properties;
pub mod recognizers;
pub mod type_parser;

// Re-export commonly used types
pub use modifiable::ModifiableProperties;
pub use parsed_value::ParsedValue;
pub use properties::{
    ParsedProperty, Properties, PropertiesBuilder, PropertyValue, Section, Sections,
};
pub use type_parser::{TypeParser, TypeParserBuilder};
