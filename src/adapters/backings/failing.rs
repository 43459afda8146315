// SPDX-License-Identifier: MIT OR Apache-2.0

//! A backing that never encrypts, for exercising the failure path of secrets.

use crate::domain::{Result, ValuesError};
use crate::ports::{SecretBacking, BACKING_NONE, BACKING_NONE_PANIC};
use zeroize::Zeroizing;

/// How a [`FailingBacking`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Return an `Encryption` error.
    Error,
    /// Panic.
    Panic,
}

/// Simulates unavailable encryption.
#[derive(Debug, Clone)]
pub struct FailingBacking {
    mode: FailureMode,
}

impl FailingBacking {
    /// Creates a backing failing in the given mode.
    pub fn new(mode: FailureMode) -> Self {
        Self { mode }
    }
}

impl SecretBacking for FailingBacking {
    fn name(&self) -> &str {
        match self.mode {
            FailureMode::Error => BACKING_NONE,
            FailureMode::Panic => BACKING_NONE_PANIC,
        }
    }

    fn encrypt(&self, _plaintext: &str) -> Result<Vec<u8>> {
        match self.mode {
            FailureMode::Error => Err(ValuesError::Encryption {
                message: "no backing available".to_string(),
            }),
            FailureMode::Panic => panic!("no backing available"),
        }
    }

    fn decrypt(&self, _ciphertext: &[u8]) -> Result<Zeroizing<String>> {
        Err(ValuesError::Decryption {
            message: "no backing available".to_string(),
        })
    }
}
