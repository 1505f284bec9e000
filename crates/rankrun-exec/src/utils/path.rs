//! Executable lookup.
//!
//! Resolving up front lets a missing launcher be reported before any side effect happens.
use std::{
    env,
    ffi::OsStr,
    path::{Path, PathBuf},
};

/// Resolve `program` the way a shell would.
///
/// Names containing a path separator are checked as-is; bare names are searched in `PATH`.
/// Returns `None` if no executable file matches.
pub fn resolve_program(program: &str) -> Option<PathBuf> {
    if program.trim().is_empty() {
        return None;
    }

    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let paths = env::var_os("PATH")?;
    search(program, &paths)
}

fn search(program: &str, paths: &OsStr) -> Option<PathBuf> {
    env::split_paths(paths)
        .filter(|dir| !dir.as_os_str().is_empty())
        .flat_map(|dir| candidates(&dir, program))
        .find(|p| is_executable(p))
}

#[cfg(unix)]
fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    vec![dir.join(program)]
}

#[cfg(not(unix))]
fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    vec![dir.join(program), dir.join(format!("{program}.exe"))]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
