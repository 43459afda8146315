// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret backing trait definition.
//!
//! A backing is the strategy a [`SecretVault`](crate::domain::SecretVault) uses to
//! protect stored payloads. One backing is active per vault; it can only be
//! replaced while the vault holds no payloads.

use crate::domain::Result;
use zeroize::Zeroizing;

/// Name of the AES-GCM backing.
pub const BACKING_AES: &str = "aes-gcm";
/// Name of the reversible base64 backing. It hides payloads from casual
/// inspection only.
pub const BACKING_PLAINTEXT: &str = "base64";
/// Name of the failing backing that reports an error on every encryption.
pub const BACKING_NONE: &str = "__none";
/// Name of the failing backing that panics on every encryption.
pub const BACKING_NONE_PANIC: &str = "__none_error";

/// A strategy for encrypting and decrypting secret payloads.
///
/// # Examples
///
/// ```rust
/// use hexvalues::domain::Result;
/// use hexvalues::ports::SecretBacking;
/// use zeroize::Zeroizing;
///
/// struct Reversed;
///
/// impl SecretBacking for Reversed {
///     fn name(&self) -> &str {
///         "reversed"
///     }
///
///     fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>> {
///         Ok(plaintext.bytes().rev().collect())
///     }
///
///     fn decrypt(&self, ciphertext: &[u8]) -> Result<Zeroizing<String>> {
///         let bytes: Vec<u8> = ciphertext.iter().rev().copied().collect();
///         Ok(Zeroizing::new(String::from_utf8_lossy(&bytes).into_owned()))
///     }
/// }
///
/// let backing = Reversed;
/// let stored = backing.encrypt("abc").unwrap();
/// assert_eq!(backing.decrypt(&stored).unwrap().as_str(), "abc");
/// ```
pub trait SecretBacking: Send {
    /// Short name of the backing, used in logs.
    fn name(&self) -> &str;

    /// Protects a plaintext payload.
    ///
    /// Implementations must not include the plaintext in returned errors.
    fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>>;

    /// Recovers a payload produced by [`SecretBacking::encrypt`].
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Zeroizing<String>>;
}
