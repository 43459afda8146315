// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret strings kept out of reach of accidental disclosure.
//!
//! A [`Secret`] never holds its payload. The payload is encrypted by the active
//! [`SecretBacking`] and stored in a side table of the owning [`SecretVault`],
//! keyed by an opaque id. Dropping the last clone of a secret removes its entry.
//!
//! Secrets print as `[REDACTED]`, refuse serialization, and only reveal the
//! payload through [`Secret::unveil`].

use crate::adapters::backings;
use crate::domain::errors::{Result, ValuesError};
use crate::ports::SecretBacking;
use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;
use zeroize::Zeroizing;

/// The redaction placeholder used in all output.
pub const REDACTED: &str = "[REDACTED]";

static GLOBAL_VAULT: Lazy<SecretVault> = Lazy::new(SecretVault::with_default_backing);

enum Payload {
    Null,
    Cipher(Vec<u8>),
}

struct VaultState {
    backing: Box<dyn SecretBacking>,
    payloads: HashMap<Uuid, Payload>,
    lengths: HashMap<Uuid, usize>,
}

type SharedState = Arc<Mutex<VaultState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, VaultState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// What a secret is created from.
pub enum SecretInput {
    /// A plaintext payload; zeroized once processed.
    Plain(Zeroizing<String>),
    /// An existing secret, passed through unchanged.
    Existing(Secret),
    /// No payload at all.
    Missing,
}

/// Conversion into a [`SecretInput`].
pub trait IntoSecret {
    /// Performs the conversion.
    fn into_secret_input(self) -> SecretInput;
}

impl IntoSecret for &str {
    fn into_secret_input(self) -> SecretInput {
        SecretInput::Plain(Zeroizing::new(self.to_string()))
    }
}

impl IntoSecret for String {
    fn into_secret_input(self) -> SecretInput {
        SecretInput::Plain(Zeroizing::new(self))
    }
}

impl IntoSecret for Secret {
    fn into_secret_input(self) -> SecretInput {
        SecretInput::Existing(self)
    }
}

impl<T: IntoSecret> IntoSecret for Option<T> {
    fn into_secret_input(self) -> SecretInput {
        self.map_or(SecretInput::Missing, IntoSecret::into_secret_input)
    }
}

/// Owner of the side tables and the active backing.
///
/// Most code uses the process-wide [`SecretVault::global`]. Separate vaults are
/// independent: switching the backing of one does not affect secrets of another.
///
/// # Examples
///
/// ```
/// use hexvalues::domain::SecretVault;
///
/// let vault = SecretVault::new_named("base64").unwrap();
/// let secret = vault.create("hunter2").unwrap();
/// assert_eq!(secret.unveil().unwrap().as_deref(), Some("hunter2"));
/// assert_eq!(vault.stored(), 1);
///
/// drop(secret);
/// assert_eq!(vault.stored(), 0);
/// vault.switch_backing("aes-gcm").unwrap();
/// ```
#[derive(Clone)]
pub struct SecretVault {
    state: SharedState,
}

impl SecretVault {
    /// Creates a vault using `backing`.
    pub fn new(backing: Box<dyn SecretBacking>) -> Self {
        Self {
            state: Arc::new(Mutex::new(VaultState {
                backing,
                payloads: HashMap::new(),
                lengths: HashMap::new(),
            })),
        }
    }

    /// Creates a vault using the backing registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for unknown backing names.
    pub fn new_named(name: &str) -> Result<Self> {
        Ok(Self::new(backings::from_name(name)?))
    }

    /// Creates a vault using the strongest available backing.
    pub fn with_default_backing() -> Self {
        Self::new(backings::default_backing())
    }

    /// The process-wide vault.
    pub fn global() -> &'static SecretVault {
        &GLOBAL_VAULT
    }

    /// Name of the active backing.
    pub fn backing_name(&self) -> String {
        lock(&self.state).backing.name().to_string()
    }

    /// Number of side table entries, null secrets included.
    pub fn stored(&self) -> usize {
        lock(&self.state).payloads.len()
    }

    /// Replaces the backing with the one registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns `Logic` while the vault stores any secret, and `InvalidArgument` for
    /// unknown backing names.
    pub fn switch_backing(&self, name: &str) -> Result<()> {
        let mut state = lock(&self.state);
        if !state.payloads.is_empty() {
            return Err(ValuesError::logic(
                "Can not switch backing while secured strings are stored",
            ));
        }
        state.backing = backings::from_name(name)?;
        tracing::debug!("Switched secret backing to '{}'", state.backing.name());
        Ok(())
    }

    /// Replaces the backing with a caller-provided one.
    ///
    /// # Errors
    ///
    /// Returns `Logic` while the vault stores any secret.
    pub fn switch_backing_to(&self, backing: Box<dyn SecretBacking>) -> Result<()> {
        let mut state = lock(&self.state);
        if !state.payloads.is_empty() {
            return Err(ValuesError::logic(
                "Can not switch backing while secured strings are stored",
            ));
        }
        tracing::debug!("Switched secret backing to '{}'", backing.name());
        state.backing = backing;
        Ok(())
    }

    /// Creates a secret in this vault.
    ///
    /// An existing secret is returned unchanged. If the backing fails to encrypt,
    /// the failure is swallowed and the returned secret is not contained.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a missing or empty payload.
    pub fn create(&self, input: impl IntoSecret) -> Result<Secret> {
        let plaintext = match input.into_secret_input() {
            SecretInput::Existing(secret) => return Ok(secret),
            SecretInput::Plain(text) if !text.is_empty() => text,
            SecretInput::Plain(_) | SecretInput::Missing => {
                return Err(ValuesError::invalid_argument(
                    "Given string was null or empty, if you explicitly want to create a \
                     Secret with value null use Secret::for_null()",
                ));
            }
        };

        let id = Uuid::new_v4();
        {
            let mut state = lock(&self.state);
            let attempt = panic::catch_unwind(AssertUnwindSafe(|| state.backing.encrypt(&plaintext)));
            match attempt {
                Ok(Ok(ciphertext)) => {
                    state.payloads.insert(id, Payload::Cipher(ciphertext));
                    state.lengths.insert(id, plaintext.chars().count());
                }
                _ => {
                    tracing::warn!(
                        "Secret backing '{}' failed to encrypt a payload; secret is not contained",
                        state.backing.name()
                    );
                }
            }
        }
        Ok(self.handle(id))
    }

    /// Creates a secret that explicitly holds no payload.
    pub fn for_null(&self) -> Secret {
        let id = Uuid::new_v4();
        {
            let mut state = lock(&self.state);
            state.payloads.insert(id, Payload::Null);
            state.lengths.insert(id, 0);
        }
        self.handle(id)
    }

    fn handle(&self, id: Uuid) -> Secret {
        Secret {
            inner: Arc::new(SecretHandle {
                id,
                vault: Arc::clone(&self.state),
            }),
        }
    }
}

impl fmt::Debug for SecretVault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("SecretVault")
            .field("backing", &state.backing.name())
            .field("stored", &state.payloads.len())
            .finish()
    }
}

struct SecretHandle {
    id: Uuid,
    vault: SharedState,
}

impl Drop for SecretHandle {
    fn drop(&mut self) {
        let mut state = lock(&self.vault);
        state.payloads.remove(&self.id);
        state.lengths.remove(&self.id);
    }
}

/// A string payload that is never stored in plain text on the value itself.
///
/// Clones share the same side table entry, which is released with the last clone.
///
/// # Examples
///
/// ```
/// use hexvalues::domain::Secret;
///
/// let secret = Secret::create("payload").unwrap();
/// assert_eq!(format!("{}", secret), "[REDACTED]");
/// assert_eq!(format!("{:?}", secret), "Secret(\"[REDACTED]\")");
/// assert_eq!(secret.length(), 7);
/// assert_eq!(secret.unveil().unwrap().as_deref(), Some("payload"));
/// ```
#[derive(Clone)]
pub struct Secret {
    inner: Arc<SecretHandle>,
}

impl Secret {
    /// Creates a secret in the global vault.
    ///
    /// See [`SecretVault::create`].
    pub fn create(input: impl IntoSecret) -> Result<Secret> {
        SecretVault::global().create(input)
    }

    /// Creates a null secret in the global vault.
    pub fn for_null() -> Secret {
        SecretVault::global().for_null()
    }

    /// Whether this secret explicitly holds no payload.
    pub fn is_null(&self) -> bool {
        matches!(self.state().payloads.get(&self.inner.id), Some(Payload::Null))
    }

    /// Whether the vault holds an entry for this secret; false if encryption failed.
    pub fn is_contained(&self) -> bool {
        self.state().payloads.contains_key(&self.inner.id)
    }

    /// Reveals the payload; `None` for a null secret.
    ///
    /// # Errors
    ///
    /// Returns `Logic` if encryption failed when the secret was created.
    pub fn unveil(&self) -> Result<Option<String>> {
        let state = self.state();
        match state.payloads.get(&self.inner.id) {
            None => Err(ValuesError::logic(
                "An error occurred during string encryption.",
            )),
            Some(Payload::Null) => Ok(None),
            Some(Payload::Cipher(ciphertext)) => {
                let plaintext = state.backing.decrypt(ciphertext)?;
                Ok(Some(plaintext.as_str().to_string()))
            }
        }
    }

    /// Length of the payload in characters; 0 for null or failed secrets.
    pub fn length(&self) -> usize {
        self.state()
            .lengths
            .get(&self.inner.id)
            .copied()
            .unwrap_or(0)
    }

    /// A new secret holding `length` characters starting at `start`, or the rest
    /// of the payload when `length` is `None`. A null secret returns itself.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `start` lies beyond the payload or the
    /// resulting payload is empty, and `Logic` for failed secrets.
    pub fn substring(&self, start: usize, length: Option<usize>) -> Result<Secret> {
        if self.is_null() {
            return Ok(self.clone());
        }
        let vault = SecretVault {
            state: Arc::clone(&self.inner.vault),
        };
        let Some(unveiled) = self.unveil()?.map(Zeroizing::new) else {
            return Ok(vault.for_null());
        };
        let total = unveiled.chars().count();
        if start > total {
            return Err(ValuesError::invalid_argument(format!(
                "Start position {} is beyond the length of the secret",
                start
            )));
        }
        let part: String = unveiled
            .chars()
            .skip(start)
            .take(length.unwrap_or(total - start))
            .collect();
        vault.create(part)
    }

    /// Whether both values are the same secret.
    pub fn ptr_eq(&self, other: &Secret) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn state(&self) -> MutexGuard<'_, VaultState> {
        lock(&self.inner.vault)
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Secret").field(&REDACTED).finish()
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for Secret {
    fn serialize<S>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Err(serde::ser::Error::custom(
            "Cannot serialize instances of Secret",
        ))
    }
}
