// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM secret backing.

use crate::domain::{Result, ValuesError};
use crate::ports::{SecretBacking, BACKING_AES};
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use rand::RngCore;
use zeroize::Zeroizing;

/// Size of the key in bytes.
pub const KEY_SIZE: usize = 32;

/// Size of the nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// Encrypts payloads with a key generated when the backing is created.
///
/// Each payload gets a random nonce, stored in front of the ciphertext. The key
/// lives only in memory, so payloads cannot outlive the backing.
pub struct AesGcmBacking {
    key: Zeroizing<[u8; KEY_SIZE]>,
}

impl AesGcmBacking {
    /// Creates a backing with a fresh random key.
    ///
    /// # Errors
    ///
    /// Returns `Encryption` if the system random source is unavailable.
    pub fn new() -> Result<Self> {
        let mut key = Zeroizing::new([0u8; KEY_SIZE]);
        OsRng
            .try_fill_bytes(key.as_mut())
            .map_err(|e| ValuesError::Encryption {
                message: format!("key generation failed: {e}"),
            })?;
        Ok(Self { key })
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(self.key.as_slice()))
    }
}

impl SecretBacking for AesGcmBacking {
    fn name(&self) -> &str {
        BACKING_AES
    }

    fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>> {
        let mut nonce = [0u8; NONCE_SIZE];
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|e| ValuesError::Encryption {
                message: format!("nonce generation failed: {e}"),
            })?;

        let ciphertext = self
            .cipher()
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|e| ValuesError::Encryption {
                message: format!("secret encryption failed: {e}"),
            })?;

        let mut stored = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        stored.extend_from_slice(&nonce);
        stored.extend_from_slice(&ciphertext);
        Ok(stored)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Zeroizing<String>> {
        if ciphertext.len() < NONCE_SIZE {
            return Err(ValuesError::Decryption {
                message: "stored payload is truncated".to_string(),
            });
        }
        let (nonce, ciphertext) = ciphertext.split_at(NONCE_SIZE);

        let plaintext = Zeroizing::new(
            self.cipher()
                .decrypt(Nonce::from_slice(nonce), ciphertext)
                .map_err(|e| ValuesError::Decryption {
                    message: format!("secret decryption failed: {e}"),
                })?,
        );

        let text = std::str::from_utf8(&plaintext).map_err(|_| ValuesError::Decryption {
            message: "decrypted payload is not valid UTF-8".to_string(),
        })?;
        Ok(Zeroizing::new(text.to_string()))
    }
}
