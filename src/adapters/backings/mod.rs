// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret backing implementations.
//!
//! Backings are looked up by name when a vault switches strategy. The names are
//! the `BACKING_*` constants of the ports layer; `openssl` is accepted as an
//! alias of the AES backing.

#[cfg(feature = "aes")]
pub mod aes_gcm;
pub mod base64;
pub mod failing;

#[cfg(feature = "aes")]
pub use self::aes_gcm::AesGcmBacking;
pub use self::base64::Base64Backing;
pub use self::failing::{FailingBacking, FailureMode};

use crate::domain::{Result, ValuesError};
use crate::ports::{
    SecretBacking, BACKING_AES, BACKING_NONE, BACKING_NONE_PANIC, BACKING_PLAINTEXT,
};

/// Creates the backing registered under `name`.
///
/// # Errors
///
/// Returns `InvalidArgument` for unknown names, or for `aes-gcm` when the crate
/// was built without the `aes` feature.
pub fn from_name(name: &str) -> Result<Box<dyn SecretBacking>> {
    match name {
        BACKING_AES | "openssl" => aes_backing(),
        BACKING_PLAINTEXT => Ok(Box::new(Base64Backing::new())),
        BACKING_NONE => Ok(Box::new(FailingBacking::new(FailureMode::Error))),
        BACKING_NONE_PANIC => Ok(Box::new(FailingBacking::new(FailureMode::Panic))),
        _ => Err(ValuesError::invalid_argument(format!(
            "Unknown backing {}",
            name
        ))),
    }
}

/// The strongest backing available in this build.
///
/// Falls back to base64 when no AES key can be generated.
pub fn default_backing() -> Box<dyn SecretBacking> {
    aes_backing().unwrap_or_else(|e| {
        tracing::warn!("AES backing unavailable, falling back to base64: {}", e);
        Box::new(Base64Backing::new())
    })
}

#[cfg(feature = "aes")]
fn aes_backing() -> Result<Box<dyn SecretBacking>> {
    Ok(Box::new(AesGcmBacking::new()?))
}

#[cfg(not(feature = "aes"))]
fn aes_backing() -> Result<Box<dyn SecretBacking>> {
    Err(ValuesError::invalid_argument(format!(
        "Backing {} requires the `aes` feature",
        BACKING_AES
    )))
}
