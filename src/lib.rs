//! macOS application bundle code signing
//!
//! This library walks an application bundle, signs every eligible file with
//! `codesign`, signs the bundle root, and verifies the signature:
//! - [`signing`] - traversal, command construction and the signing sequence
//! - [`cli`] - flat `key=value` argument parsing and the process entry point
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod signing;

// Re-export commonly used types
pub use error::{CliError, Result, SignError};
