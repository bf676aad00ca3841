//! Kodegen Bundler Codesign - macOS bundle signing for release pipelines.
//!
//! This binary signs every eligible file inside an application bundle, then
//! the bundle itself, and verifies the result with `codesign --verify`.

use kodegen_bundler_codesign::cli;
use std::process;

fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
