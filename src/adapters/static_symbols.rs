// SPDX-License-Identifier: MIT OR Apache-2.0

//! Symbol table backed by explicitly registered names.

use crate::domain::{TypeHandle, TypedValue};
use crate::ports::SymbolTable;
use std::collections::HashMap;

/// A [`SymbolTable`] holding types and constants registered up front.
///
/// # Examples
///
/// ```rust
/// use hexvalues::adapters::StaticSymbolTable;
/// use hexvalues::domain::TypedValue;
/// use hexvalues::ports::SymbolTable;
///
/// let symbols = StaticSymbolTable::new()
///     .with_class("app\\Mailer")
///     .with_interface("app\\Transport")
///     .with_constant("app\\Mailer::RETRIES", 3);
///
/// assert!(symbols.type_exists("app\\Mailer"));
/// assert!(symbols.type_named("app\\Transport").unwrap().is_interface());
/// assert_eq!(symbols.constant("app\\Mailer::RETRIES"), Some(TypedValue::Int(3)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticSymbolTable {
    types: HashMap<String, TypeHandle>,
    constants: HashMap<String, TypedValue>,
}

impl StaticSymbolTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type handle under its name.
    pub fn register_type(&mut self, handle: TypeHandle) {
        self.types.insert(handle.name().to_string(), handle);
    }

    /// Registers a constant, replacing any previous value.
    pub fn define_constant(&mut self, name: impl Into<String>, value: impl Into<TypedValue>) {
        self.constants.insert(name.into(), value.into());
    }

    /// Adds a class.
    pub fn with_class(mut self, name: impl Into<String>) -> Self {
        self.register_type(TypeHandle::class(name));
        self
    }

    /// Adds an interface.
    pub fn with_interface(mut self, name: impl Into<String>) -> Self {
        self.register_type(TypeHandle::interface(name));
        self
    }

    /// Adds a constant.
    pub fn with_constant(mut self, name: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        self.define_constant(name, value);
        self
    }
}

impl SymbolTable for StaticSymbolTable {
    fn type_named(&self, name: &str) -> Option<TypeHandle> {
        self.types.get(name).cloned()
    }

    fn constant(&self, name: &str) -> Option<TypedValue> {
        self.constants.get(name).cloned()
    }
}
