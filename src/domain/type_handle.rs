// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handles describing named types.
//!
//! Strings like `Foo::class` and `Foo.class` refer to types by name. Rust has no
//! reflection by name, so known types are registered up front in a symbol table
//! and looked up as [`TypeHandle`] values.

use serde::Serialize;
use std::fmt;

/// What kind of type a handle describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeKind {
    /// A concrete type.
    Class,
    /// An abstract interface.
    Interface,
}

/// A handle on a registered type.
///
/// # Examples
///
/// ```
/// use hexvalues::domain::type_handle::{TypeHandle, TypeKind};
///
/// let handle = TypeHandle::class("app\\Mailer");
/// assert_eq!(handle.name(), "app\\Mailer");
/// assert_eq!(handle.short_name(), "Mailer");
/// assert_eq!(handle.kind(), TypeKind::Class);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TypeHandle {
    name: String,
    kind: TypeKind,
}

impl TypeHandle {
    /// Creates a handle for a concrete type.
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Class,
        }
    }

    /// Creates a handle for an interface.
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Interface,
        }
    }

    /// Fully qualified name, namespace separators included.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its namespace.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('\\').next().unwrap_or(&self.name)
    }

    /// The kind of type.
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Whether the handle describes an interface.
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_without_namespace() {
        assert_eq!(TypeHandle::class("Mailer").short_name(), "Mailer");
    }

    #[test]
    fn test_interface_handle() {
        let handle = TypeHandle::interface("app\\Transport");
        assert!(handle.is_interface());
        assert_eq!(handle.to_string(), "app\\Transport");
    }
}
