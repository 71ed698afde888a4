//! `architecture-lint [BACKEND_DIR]`
//!
//! Checks the backend's layer boundaries and exits non-zero on any
//! violation. `BACKEND_DIR` defaults to the workspace's `backend/`.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

fn default_backend_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../backend")
}

fn main() -> ExitCode {
    let backend_dir = std::env::args_os()
        .nth(1)
        .map_or_else(default_backend_dir, PathBuf::from);

    match architecture_lint::lint_backend_sources(&backend_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = write!(io::stderr().lock(), "{}: {err}", backend_dir.display());
            ExitCode::FAILURE
        }
    }
}
