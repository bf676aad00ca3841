//! Command line interface for the bundle code signer.

mod args;

pub use args::{Args, KNOWN_KEYS, default_keychain, normalize_tokens};

use crate::error::Result;
use crate::signing::{CommandRunner, Secret, SignConfig, Signer, SystemRunner};

/// Main CLI entry point
pub fn run() -> Result<i32> {
    let args = Args::parse_args();
    let config = args.to_config()?;
    let secret = Secret::from_env(args.kcpass.clone())?;

    execute(SystemRunner, config, &secret)
}

/// Signs and verifies the bundle, returning the process exit code.
///
/// Exit code 1 means the bundle-level sign or the verification failed;
/// per-file failures alone do not change the exit code.
pub fn execute<R: CommandRunner>(runner: R, config: SignConfig, secret: &Secret) -> Result<i32> {
    let signer = Signer::new(runner, config);

    let report = signer.sign_app(secret)?;
    if !report.success() {
        println!("Code Sign Error");
        return Ok(1);
    }

    if !signer.verify() {
        println!("Could Not Verify App Was Signed Correctly");
        return Ok(1);
    }

    println!(
        "✓ Signed {} ({} files signed, {} failed)",
        signer.config().bundle_path.display(),
        report.signed.len(),
        report.failed.len()
    );
    Ok(0)
}
