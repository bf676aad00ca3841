//! Bundle traversal against real directory trees.

mod common;

use kodegen_bundler_codesign::SignError;
use kodegen_bundler_codesign::signing::collect_signable_files;
use std::fs;
use tempfile::TempDir;

#[test]
fn sample_bundle_lists_framework_as_unit_and_skips_resources() {
    let (_dir, app) = common::sample_bundle();

    let files = collect_signable_files(&app).unwrap();

    assert_eq!(
        files,
        vec![
            app.join("Nested.framework"),
            app.join("Nested.framework/x.dylib"),
            app.join("a.txt"),
        ]
    );
}

#[test]
fn children_of_excluded_directories_are_still_visited() {
    let dir = TempDir::new().unwrap();
    let app = dir.path().join("Outer.app");
    let helper = app.join("Contents/PlugIns/Helper.app/Contents/MacOS");
    fs::create_dir_all(&helper).unwrap();
    fs::write(helper.join("Helper"), b"bin").unwrap();
    fs::create_dir_all(app.join("Contents/Resources/en.lproj")).unwrap();
    fs::write(app.join("Contents/Resources/en.lproj/Localizable.strings"), b"s").unwrap();

    let files = collect_signable_files(&app).unwrap();

    assert_eq!(
        files,
        vec![
            helper.join("Helper"),
            app.join("Contents/Resources/en.lproj/Localizable.strings"),
        ]
    );
    assert!(!files.contains(&app));
    assert!(!files.contains(&app.join("Contents/PlugIns/Helper.app")));
}

#[test]
fn framework_root_is_itself_signable() {
    let dir = TempDir::new().unwrap();
    let framework = dir.path().join("Qt.framework");
    fs::create_dir_all(framework.join("Resources")).unwrap();
    fs::write(framework.join("Resources/Info.plist"), b"plist").unwrap();
    fs::write(framework.join("Qt"), b"lib").unwrap();

    let files = collect_signable_files(&framework).unwrap();

    assert_eq!(files, vec![framework.clone(), framework.join("Qt")]);
}

#[test]
fn excluded_names_and_extensions_ignore_case() {
    let dir = TempDir::new().unwrap();
    let app = dir.path().join("My.app");
    fs::create_dir_all(&app).unwrap();
    for name in [".DS_Store", "CodeResources", "PkgInfo", "QMLDIR", "Main.QML", "font.TTF"] {
        fs::write(app.join(name), b"x").unwrap();
    }
    fs::write(app.join("tool"), b"bin").unwrap();

    let files = collect_signable_files(&app).unwrap();

    assert_eq!(files, vec![app.join("tool")]);
}

#[cfg(unix)]
#[test]
fn symlinked_directories_count_as_directories() {
    let dir = TempDir::new().unwrap();
    let framework = dir.path().join("Qt.framework");
    let versions = framework.join("Versions/A");
    fs::create_dir_all(&versions).unwrap();
    fs::write(versions.join("Qt"), b"lib").unwrap();
    std::os::unix::fs::symlink("A", framework.join("Versions/Current")).unwrap();
    std::os::unix::fs::symlink("Versions/Current/Qt", framework.join("Qt")).unwrap();

    let files = collect_signable_files(&framework).unwrap();

    assert_eq!(
        files,
        vec![
            framework.clone(),
            framework.join("Qt"),
            versions.join("Qt"),
        ]
    );
}

#[test]
fn missing_root_is_an_error() {
    let dir = TempDir::new().unwrap();

    let err = collect_signable_files(&dir.path().join("Nope.app")).unwrap_err();

    assert!(matches!(err, SignError::BundleNotFound { .. }));
}
