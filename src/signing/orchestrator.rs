//! Signing sequence: every eligible file, then the bundle, then verification.
//!
//! This module provides the [`Signer`] orchestrator. Per-file failures are
//! collected into a [`SignReport`] and never abort the run; the outcome of
//! the bundle-level sign decides whether the run succeeded.

use super::codesign;
use super::credentials::Secret;
use super::runner::{CommandRunner, Invocation};
use super::walker::collect_signable_files;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Everything a signing run needs apart from the secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignConfig {
    /// Absolute path to the application bundle root
    pub bundle_path: PathBuf,
    /// Signing identity, passed to `codesign -s` unmodified
    pub identity: String,
    /// Keychain holding the signing certificate
    pub keychain: PathBuf,
}

/// Outcome of [`Signer::sign_app`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignReport {
    /// Files signed successfully, in traversal order
    pub signed: Vec<PathBuf>,
    /// Files whose unlock or sign step failed, in traversal order
    pub failed: Vec<PathBuf>,
    /// Whether the bundle root itself was signed
    pub bundle_signed: bool,
}

impl SignReport {
    /// Overall result of the run, which only depends on the bundle sign.
    pub fn success(&self) -> bool {
        self.bundle_signed
    }
}

/// Main signing orchestrator.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_codesign::signing::{Secret, SignConfig, Signer, SystemRunner};
///
/// # fn example(config: SignConfig) -> kodegen_bundler_codesign::Result<()> {
/// let secret = Secret::from_env(None)?;
/// let signer = Signer::new(SystemRunner, config);
///
/// let report = signer.sign_app(&secret)?;
/// if report.success() && signer.verify() {
///     println!("signed {} files", report.signed.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Signer<R> {
    runner: R,
    config: SignConfig,
}

impl<R: CommandRunner> Signer<R> {
    /// Creates a signer that executes its commands through `runner`.
    pub fn new(runner: R, config: SignConfig) -> Self {
        Self { runner, config }
    }

    /// The configuration this signer was built with.
    pub fn config(&self) -> &SignConfig {
        &self.config
    }

    #[cfg(test)]
    fn runner(&self) -> &R {
        &self.runner
    }

    /// Signs every eligible file in the bundle, then the bundle itself.
    ///
    /// The keychain is unlocked before each sign. A failed file is reported
    /// and skipped; the bundle-level sign always runs.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundle cannot be traversed at all.
    pub fn sign_app(&self, secret: &Secret) -> Result<SignReport> {
        let bundle = &self.config.bundle_path;
        let files = collect_signable_files(bundle)?;

        log::info!(
            "Signing {} files in {} as \"{}\"",
            files.len(),
            bundle.display(),
            self.config.identity
        );

        let mut report = SignReport::default();

        // TODO: sign files in parallel once keychain unlock is hoisted out of the loop
        for file in files {
            let sign = codesign::sign_file(&self.config.identity, &file);
            if self.unlock_and_run(secret, &sign) {
                log::debug!("✓ {}", file.display());
                report.signed.push(file);
            } else {
                println!("error signing {}", file.display());
                report.failed.push(file);
            }
        }

        let sign = codesign::sign_bundle(&self.config.identity, bundle);
        report.bundle_signed = self.unlock_and_run(secret, &sign);

        if report.bundle_signed {
            log::info!("✓ Signed {}", bundle.display());
        } else {
            println!("Error Signing App {}", bundle.display());
        }

        if !report.failed.is_empty() {
            log::warn!("{} files failed to sign", report.failed.len());
        }

        Ok(report)
    }

    /// Verifies the bundle signature with `codesign --verify --verbose`.
    pub fn verify(&self) -> bool {
        println!("Verifying Code Signature");
        verify_codesign(&self.runner, &self.config.bundle_path)
    }

    /// Unlocks the keychain and, only if that worked, runs `invocation`.
    fn unlock_and_run(&self, secret: &Secret, invocation: &Invocation) -> bool {
        let unlock = codesign::unlock_keychain(secret, &self.config.keychain);
        run_step(&self.runner, &unlock) && run_step(&self.runner, invocation)
    }
}

/// Runs `codesign --verify --verbose` against `bundle` and relays its output.
pub fn verify_codesign<R: CommandRunner>(runner: &R, bundle: &Path) -> bool {
    match runner.run(&codesign::verify(bundle)) {
        Ok(output) => {
            for line in output.stdout.lines().chain(output.stderr.lines()) {
                println!("{}", line);
            }
            output.success
        }
        Err(e) => {
            log::error!("{}", e);
            false
        }
    }
}

/// Runs one command, folding spawn errors into failure.
fn run_step<R: CommandRunner>(runner: &R, invocation: &Invocation) -> bool {
    match runner.run(invocation) {
        Ok(output) if output.success => true,
        Ok(output) => {
            log::warn!("Command failed: {}", invocation);
            if !output.stderr.trim().is_empty() {
                log::warn!("  {}", output.stderr.trim());
            }
            false
        }
        Err(e) => {
            log::error!("{}", e);
            false
        }
    }
}
