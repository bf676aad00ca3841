//! Bundle traversal and signing eligibility.
//!
//! Every entry below the bundle root is visited in sorted pre-order. Resources
//! that `codesign` either rejects or has no reason to seal individually (QML,
//! images, fonts, property lists, ...) are filtered out, as are directories,
//! except `.framework` directories which are signed as a unit.

use crate::error::{Result, SignError};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory extension that is signed as a whole rather than skipped.
pub const SIGNABLE_DIR_EXTENSION: &str = "framework";

/// Lower-cased file extensions that are never signed.
pub const EXCLUDED_EXTENSIONS: &[&str] = &[
    "qml", "icns", "qmltypes", "qmlc", "png", "jsc", "js", "svg", "ttf", "conf", "lproj", "plist",
    "pak", "dat", "metainfo",
];

/// Lower-cased base names (extension stripped) that are never signed.
pub const EXCLUDED_NAMES: &[&str] = &["qmldir", "coderesources", "pkginfo", ".ds_store"];

/// Lower-cased, trimmed extension of `path`, or an empty string if it has none.
fn normalized_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().trim().to_lowercase())
        .unwrap_or_default()
}

/// Lower-cased, trimmed file name with the extension stripped.
fn normalized_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().trim().to_lowercase())
        .unwrap_or_default()
}

/// Decides whether a single entry should be handed to `codesign`.
///
/// `is_dir` must reflect what the entry resolves to, so a symlink pointing at
/// a directory is treated as a directory.
pub fn is_signable(path: &Path, is_dir: bool) -> bool {
    let ext = normalized_extension(path);

    if is_dir && ext != SIGNABLE_DIR_EXTENSION {
        return false;
    }
    if !ext.is_empty() && EXCLUDED_EXTENSIONS.contains(&ext.as_str()) {
        return false;
    }
    !EXCLUDED_NAMES.contains(&normalized_stem(path).as_str())
}

/// Whether a walk entry is, or points at, a directory.
fn entry_is_dir(entry: &DirEntry) -> bool {
    if entry.file_type().is_symlink() {
        entry.path().is_dir()
    } else {
        entry.file_type().is_dir()
    }
}

/// Collects every signable path under `root`, root included, in traversal order.
///
/// The walk descends into every directory regardless of whether the directory
/// itself is signable. Symlinks are not followed. Unreadable entries are
/// logged and skipped.
///
/// # Errors
///
/// Returns [`SignError::BundleNotFound`] if `root` is not a directory.
pub fn collect_signable_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(SignError::BundleNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if is_signable(entry.path(), entry_is_dir(&entry)) {
            files.push(entry.into_path());
        } else {
            log::trace!("  excluded: {}", entry.path().display());
        }
    }

    log::debug!(
        "Found {} signable entries under {}",
        files.len(),
        root.display()
    );

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excluded_extensions_are_case_insensitive() {
        assert!(!is_signable(Path::new("/b/icon.PNG"), false));
        assert!(!is_signable(Path::new("/b/Main.Qml"), false));
        assert!(!is_signable(Path::new("/b/Info.plist"), false));
        assert!(is_signable(Path::new("/b/libfoo.dylib"), false));
    }

    #[test]
    fn excluded_names_match_regardless_of_extension() {
        assert!(!is_signable(Path::new("/b/qmldir"), false));
        assert!(!is_signable(Path::new("/b/QMLDIR.bin"), false));
        assert!(!is_signable(Path::new("/b/_CodeSignature/CodeResources"), false));
        assert!(!is_signable(Path::new("/b/Contents/PkgInfo"), false));
        assert!(!is_signable(Path::new("/b/.DS_Store"), false));
    }

    #[test]
    fn files_without_extension_are_signable() {
        assert!(is_signable(Path::new("/b/Contents/MacOS/MyApp"), false));
    }

    #[test]
    fn only_framework_directories_are_signable() {
        assert!(is_signable(Path::new("/b/Frameworks/QtCore.framework"), true));
        assert!(is_signable(Path::new("/b/Frameworks/Qt.FRAMEWORK"), true));
        assert!(!is_signable(Path::new("/b/Contents"), true));
        assert!(!is_signable(Path::new("/b/PlugIns/Helper.app"), true));
        assert!(!is_signable(Path::new("/b/Resources/en.lproj"), true));
    }

    #[test]
    fn framework_directory_with_excluded_name_is_skipped() {
        assert!(!is_signable(Path::new("/b/qmldir.framework"), true));
    }

    #[test]
    fn extension_is_trimmed_before_matching() {
        assert!(!is_signable(Path::new("/b/odd.png "), false));
    }
}
