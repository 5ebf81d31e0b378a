//! Path resolution helpers used by the merge pass and the file-action
//! handler: lexical normalization, rebasing against a document directory,
//! and home-relative expansion.
//!
//! All functions here are purely lexical; none of them touch the
//! filesystem, so they work for destinations that do not exist yet.
use std::path::{Component, Path, PathBuf};

/// Normalize a path lexically: resolve `.` and `..` components without
/// consulting the filesystem.
///
/// Leading `..` components of a relative path are dropped, so callers
/// should absolutize first when that distinction matters.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                out.push(component.as_os_str());
            }
        }
    }
    out
}

/// Resolve `path` against `base`: absolute paths are normalized as-is,
/// relative paths are joined onto `base` first.
#[must_use]
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// Whether a destination is written with a leading `.` marker, making it
/// relative to the directory of the document that declared it.
///
/// Matches any leading dot, so `./foo` and `.bashrc` both qualify.
#[must_use]
pub fn is_dot_prefixed(path: &Path) -> bool {
    path.to_string_lossy().starts_with('.')
}

/// Whether a path is home-relative (`~` or `~/...`).
#[must_use]
pub fn is_home_relative(path: &Path) -> bool {
    path.to_string_lossy().starts_with('~')
}

/// Expand a `~`-prefixed path against `home`; other paths pass through.
///
/// Only a bare `~` component is expanded — `~user/...` forms are left
/// untouched.
#[must_use]
pub fn expand_home(path: &Path, home: &Path) -> PathBuf {
    path.strip_prefix("~")
        .map_or_else(|_| path.to_path_buf(), |rest| normalize(&home.join(rest)))
}

/// Resolve the current user's home directory from the environment
/// (`USERPROFILE` first on Windows, `HOME` otherwise).
#[must_use]
pub fn home_dir() -> Option<PathBuf> {
    let home = if cfg!(target_os = "windows") {
        std::env::var("USERPROFILE").or_else(|_| std::env::var("HOME"))
    } else {
        std::env::var("HOME")
    };
    home.ok().map(PathBuf::from)
}
