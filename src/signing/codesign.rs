//! Command lines for the macOS `security` and `codesign` tools.

use super::credentials::Secret;
use super::runner::Invocation;
use std::path::Path;

/// Keychain unlock tool
pub const SECURITY: &str = "security";

/// Code signing tool
pub const CODESIGN: &str = "codesign";

/// `security unlock-keychain -p <secret> <keychain>`
pub fn unlock_keychain(secret: &Secret, keychain: &Path) -> Invocation {
    Invocation::new(SECURITY)
        .arg("unlock-keychain")
        .arg("-p")
        .sensitive_arg(secret.expose())
        .arg(keychain)
}

/// Force-signs a single file (or `.framework`) with hardened runtime, deep.
pub fn sign_file(identity: &str, file: &Path) -> Invocation {
    Invocation::new(CODESIGN)
        .arg("-f")
        .arg("-o")
        .arg("runtime")
        .arg("-v")
        .arg("--deep")
        .arg("-s")
        .arg(identity)
        .arg(file)
}

/// Force-signs the bundle root with hardened runtime; not deep, since every
/// nested file was already signed individually.
pub fn sign_bundle(identity: &str, bundle: &Path) -> Invocation {
    Invocation::new(CODESIGN)
        .arg("-f")
        .arg("-o")
        .arg("runtime")
        .arg("-v")
        .arg("-s")
        .arg(identity)
        .arg(bundle)
}

/// `codesign --verify --verbose <bundle>`
pub fn verify(bundle: &Path) -> Invocation {
    Invocation::new(CODESIGN)
        .arg("--verify")
        .arg("--verbose")
        .arg(bundle)
}
