// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recognizer and symbol table traits.
//!
//! A recognizer looks at a string and either declines or produces a typed value.
//! Recognizers that resolve names (type references, constants) consult a
//! [`SymbolTable`] instead of runtime reflection.

use crate::domain::{Result, TypeHandle, TypedValue};

/// Lookup of named types and constants.
///
/// # Examples
///
/// ```rust
/// use hexvalues::domain::{TypeHandle, TypedValue};
/// use hexvalues::ports::SymbolTable;
///
/// struct OnlyMailer;
///
/// impl SymbolTable for OnlyMailer {
///     fn type_named(&self, name: &str) -> Option<TypeHandle> {
///         (name == "Mailer").then(|| TypeHandle::class("Mailer"))
///     }
///
///     fn constant(&self, _name: &str) -> Option<TypedValue> {
///         None
///     }
/// }
///
/// assert!(OnlyMailer.type_exists("Mailer"));
/// assert!(!OnlyMailer.type_exists("Transport"));
/// ```
pub trait SymbolTable: Send + Sync {
    /// Handle for the type with this exact name.
    fn type_named(&self, name: &str) -> Option<TypeHandle>;

    /// Value of the constant with this exact name.
    fn constant(&self, name: &str) -> Option<TypedValue>;

    /// Whether a type with this name is registered.
    fn type_exists(&self, name: &str) -> bool {
        self.type_named(name).is_some()
    }
}

/// A step in the type recognition chain.
///
/// Returning `Ok(None)` passes the input on to the next recognizer. Returning an
/// error aborts recognition altogether.
pub trait Recognizer: Send + Sync {
    /// Attempts to recognize `input`.
    fn recognize(&self, input: &str, symbols: &dyn SymbolTable) -> Result<Option<TypedValue>>;
}

/// Adapts a plain closure into a [`Recognizer`] that never fails.
pub struct FnRecognizer<F>(pub F);

impl<F> Recognizer for FnRecognizer<F>
where
    F: Fn(&str) -> Option<TypedValue> + Send + Sync,
{
    fn recognize(&self, input: &str, _symbols: &dyn SymbolTable) -> Result<Option<TypedValue>> {
        Ok((self.0)(input))
    }
}
