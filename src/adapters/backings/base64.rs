// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reversible base64 secret backing.
//!
//! Keeps payloads out of casual sight, e.g. in memory dumps searched for a known
//! string. It provides no confidentiality.

use crate::domain::{Result, ValuesError};
use crate::ports::{SecretBacking, BACKING_PLAINTEXT};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use zeroize::Zeroizing;

/// Stores payloads base64 encoded.
#[derive(Debug, Clone, Default)]
pub struct Base64Backing;

impl Base64Backing {
    /// Creates a new base64 backing.
    pub fn new() -> Self {
        Base64Backing
    }
}

impl SecretBacking for Base64Backing {
    fn name(&self) -> &str {
        BACKING_PLAINTEXT
    }

    fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>> {
        Ok(STANDARD.encode(plaintext).into_bytes())
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Zeroizing<String>> {
        let decoded = Zeroizing::new(STANDARD.decode(ciphertext).map_err(|e| {
            ValuesError::Decryption {
                message: format!("invalid base64 payload: {e}"),
            }
        })?);
        let text = std::str::from_utf8(&decoded).map_err(|_| ValuesError::Decryption {
            message: "decoded payload is not valid UTF-8".to_string(),
        })?;
        Ok(Zeroizing::new(text.to_string()))
    }
}
