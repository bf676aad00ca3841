//! Keychain unlock secret resolution.

use crate::error::{Result, SignError};
use std::fmt;

/// Environment variable consulted when no secret is passed on the command line.
pub const KEYCHAIN_PASSWORD_ENV: &str = "PASSWORD";

/// Keychain unlock secret. Never printed, not even by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Picks the secret to unlock the keychain with.
    ///
    /// An explicitly supplied value always wins, even when it is empty; the
    /// environment value is only consulted when `explicit` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::Config`] if the chosen value is absent or empty.
    pub fn resolve(explicit: Option<String>, env_value: Option<String>) -> Result<Self> {
        let value = explicit.or(env_value).unwrap_or_default();

        if value.is_empty() {
            return Err(SignError::config(format!(
                "Could not find keychain password: pass -kcpass=<password> or set the {} env var",
                KEYCHAIN_PASSWORD_ENV
            )));
        }

        Ok(Self(value))
    }

    /// Resolves against the process environment (see [`Secret::resolve`]).
    pub fn from_env(explicit: Option<String>) -> Result<Self> {
        let env_value = std::env::var(KEYCHAIN_PASSWORD_ENV).ok();
        Self::resolve(explicit, env_value)
    }

    /// The raw secret, for handing to `security`.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(********)")
    }
}
