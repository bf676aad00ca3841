//! Command line argument parsing and validation.
//!
//! Release scripts call this tool with flat `-key=value` tokens
//! (`-app=MyApp.app -devid="Developer ID Application: ..." -kcpass=...`).
//! Those tokens are first canonicalised into `--key=value` form by
//! [`normalize_tokens`] and then handed to clap.

use crate::error::{CliError, Result, SignError};
use crate::signing::SignConfig;
use clap::Parser;
use path_absolutize::Absolutize;
use std::ffi::OsStr;
use std::path::PathBuf;

/// Binary name used as `argv[0]` when parsing canonical tokens.
const BIN_NAME: &str = "kodegen_bundler_codesign";

/// Keys understood by [`Args`]; anything else is dropped during normalisation.
pub const KNOWN_KEYS: &[&str] = &["app", "devid", "kcpass", "keychain"];

/// Tokens that are forwarded to clap untouched.
const PASSTHROUGH_FLAGS: &[&str] = &["-h", "--help", "-V", "--version"];

/// Login keychain, relative to the user's home directory.
const LOGIN_KEYCHAIN: &str = "Library/Keychains/login.keychain-db";

/// Code-sign a macOS application bundle and verify the result
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "kodegen_bundler_codesign",
    version,
    about = "Code-sign a macOS application bundle and verify the result",
    long_about = "Signs every eligible file inside a macOS application bundle with codesign
(hardened runtime, deep), then signs the bundle root and verifies it.

Arguments use a flat key=value form; dashes in keys and quotes in values are ignored:
  kodegen_bundler_codesign -app=MyApp.app -devid=\"Developer ID Application: Me (TEAMID)\" -kcpass=secret

The keychain password falls back to the PASSWORD environment variable.

Exit code 0 = every step succeeded; 1 = bundle signing or verification failed.",
    args_override_self = true
)]
pub struct Args {
    /// Path to the application bundle to sign
    #[arg(long, value_name = "PATH")]
    pub app: PathBuf,

    /// Signing identity (certificate common name or SHA-1 hash)
    #[arg(long, value_name = "IDENTITY")]
    pub devid: String,

    /// Keychain password (defaults to the PASSWORD env var)
    #[arg(long, value_name = "PASSWORD")]
    pub kcpass: Option<String>,

    /// Keychain to unlock (defaults to ~/Library/Keychains/login.keychain-db)
    #[arg(long, value_name = "PATH")]
    pub keychain: Option<PathBuf>,
}

/// Rewrites flat `-key=value` tokens into canonical `--key=value` tokens.
///
/// - every `-` is removed from the key, which is then lower-cased
/// - every `'` and `"` is removed from the value
/// - the value is everything after the first `=`
/// - keys not in [`KNOWN_KEYS`] are dropped
/// - the first token without `=`, or with nothing after it, ends parsing;
///   the rest are ignored
/// - tokens that are not valid UTF-8 are converted lossily
pub fn normalize_tokens<I, S>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut canonical = Vec::new();

    for token in tokens {
        let token = token.as_ref().to_string_lossy();
        let token: &str = &token;

        if PASSTHROUGH_FLAGS.contains(&token) {
            canonical.push(token.to_string());
            break;
        }

        // `-kcpass=` (e.g. from an unset shell variable) carries no value and
        // must leave the secret to the environment.
        let Some((key, value)) = token
            .split_once('=')
            .filter(|(_, value)| !value.chars().all(|c| c == '='))
        else {
            log::debug!("Stopping argument parsing at malformed token");
            break;
        };

        let key = key.replace('-', "").to_lowercase();
        if !KNOWN_KEYS.contains(&key.as_str()) {
            log::debug!("Ignoring unknown argument: {}", key);
            continue;
        }

        let value: String = value.chars().filter(|c| !matches!(*c, '\'' | '"')).collect();
        canonical.push(format!("--{}={}", key, value));
    }

    canonical
}

impl Args {
    /// Parse the process arguments, exiting with usage on error
    pub fn parse_args() -> Self {
        Self::from_tokens(std::env::args_os().skip(1)).unwrap_or_else(|e| e.exit())
    }

    /// Parse flat tokens (without `argv[0]`)
    pub fn from_tokens<I, S>(tokens: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let canonical = normalize_tokens(tokens);
        Self::try_parse_from(std::iter::once(BIN_NAME.to_string()).chain(canonical))
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.app.as_os_str().is_empty() {
            return Err("Bundle path cannot be empty".to_string());
        }
        if self.devid.trim().is_empty() {
            return Err("Signing identity cannot be empty".to_string());
        }
        Ok(())
    }

    /// Builds the signing configuration.
    ///
    /// The bundle path is made absolute against the current directory and the
    /// keychain defaults to the user's login keychain.
    pub fn to_config(&self) -> Result<SignConfig> {
        self.validate()
            .map_err(|reason| CliError::InvalidArguments { reason })?;

        let bundle_path = self.app.absolutize()?.into_owned();
        let keychain = match &self.keychain {
            Some(path) => path.clone(),
            None => default_keychain()?,
        };

        Ok(SignConfig {
            bundle_path,
            identity: self.devid.clone(),
            keychain,
        })
    }
}

/// `~/Library/Keychains/login.keychain-db`
pub fn default_keychain() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(LOGIN_KEYCHAIN))
        .ok_or_else(|| SignError::config("could not determine home directory for the login keychain"))
}
