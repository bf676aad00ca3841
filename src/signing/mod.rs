//! macOS bundle code signing.
//!
//! This module walks an application bundle, signs each eligible file with
//! `codesign`, signs the bundle root, and verifies the result.
//!
//! # Overview
//!
//! The signer:
//! 1. Resolves the keychain unlock [`Secret`] (caller side)
//! 2. Collects signable files with [`collect_signable_files`]
//! 3. Unlocks the keychain and signs each file (`--deep`, hardened runtime)
//! 4. Unlocks the keychain and signs the bundle root (hardened runtime)
//! 5. Verifies the bundle with `codesign --verify --verbose`
//!
//! # Module Organization
//!
//! - [`walker`] - Bundle traversal and exclusion rules
//! - [`credentials`] - Keychain secret resolution
//! - [`codesign`] - `security`/`codesign` command lines
//! - [`runner`] - Subprocess execution behind the [`CommandRunner`] trait
//! - [`orchestrator`] - The [`Signer`] sequencing all of the above

pub mod codesign;
pub mod credentials;
pub mod orchestrator;
pub mod runner;
pub mod walker;

pub use credentials::{KEYCHAIN_PASSWORD_ENV, Secret};
pub use orchestrator::{SignConfig, SignReport, Signer, verify_codesign};
pub use runner::{CommandOutput, CommandRunner, Invocation, SystemRunner};
pub use walker::{collect_signable_files, is_signable};
