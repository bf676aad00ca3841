//! Shared fixtures for integration tests.

#![allow(dead_code)]

use kodegen_bundler_codesign::signing::{CommandOutput, CommandRunner, Invocation};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates `<tmp>/Bundle.app` containing `a.txt`, `b.png`,
/// `Nested.framework/x.dylib` and `qmldir`.
pub fn sample_bundle() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let app = dir.path().join("Bundle.app");

    fs::create_dir_all(app.join("Nested.framework")).expect("create framework");
    fs::write(app.join("a.txt"), b"a").expect("write a.txt");
    fs::write(app.join("b.png"), b"png").expect("write b.png");
    fs::write(app.join("Nested.framework/x.dylib"), b"dylib").expect("write x.dylib");
    fs::write(app.join("qmldir"), b"module").expect("write qmldir");

    (dir, app)
}

/// Last argument of an invocation, which is always the signing target.
pub fn target(inv: &Invocation) -> PathBuf {
    inv.args().last().map(PathBuf::from).unwrap_or_default()
}

/// Recording runner whose failures are driven by a predicate.
pub struct ScriptedRunner {
    pub calls: RefCell<Vec<Invocation>>,
    fail_when: Box<dyn Fn(&Invocation) -> bool>,
}

impl ScriptedRunner {
    pub fn ok() -> Self {
        Self::failing_when(|_| false)
    }

    pub fn failing_when(pred: impl Fn(&Invocation) -> bool + 'static) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_when: Box::new(pred),
        }
    }

    /// Fails `codesign` invocations whose target is `path`.
    pub fn failing_codesign_on(path: &Path) -> Self {
        let path = path.to_path_buf();
        Self::failing_when(move |inv| inv.program() == "codesign" && target(inv) == path)
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> kodegen_bundler_codesign::Result<CommandOutput> {
        self.calls.borrow_mut().push(invocation.clone());
        Ok(CommandOutput {
            success: !(self.fail_when)(invocation),
            ..Default::default()
        })
    }
}
