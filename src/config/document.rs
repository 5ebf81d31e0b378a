//! YAML document schema and the single-document loader.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// One parsed YAML configuration document.
///
/// All top-level keys are optional; an empty document is valid and merges
/// to nothing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigDocument {
    /// Documents to merge after this one, in declared order. Relative paths
    /// are resolved against this document's directory.
    #[serde(default)]
    pub includes: Vec<PathBuf>,

    /// Managed file/symlink relationships, keyed by action name.
    #[serde(default)]
    pub file_actions: HashMap<String, FileAction>,

    /// Package-install descriptors, keyed by action name. Parsed and merged
    /// but never executed (reserved stage).
    #[serde(default)]
    pub package_actions: HashMap<String, PackageAction>,
}

/// One managed file/symlink relationship.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAction {
    /// Path to the file as authored, relative to the declaring document's
    /// directory. Absolute after merge.
    pub source: PathBuf,

    /// Target path on the filesystem. A leading `.` makes it relative to
    /// the declaring document's directory; otherwise it is absolute or
    /// home-relative (`~/...`).
    pub destination: PathBuf,

    /// Create a symlink at the destination instead of copying the source.
    #[serde(default)]
    pub link: bool,
}

/// A named package-install descriptor. Merge semantics only; execution is
/// a reserved no-op stage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageAction {
    /// Package to install.
    pub name: Option<String>,

    /// Package manager to install it with.
    pub manager: Option<String>,
}

/// A loaded document plus the metadata required for directory-relative
/// resolution of its includes, sources, and destinations.
#[derive(Debug, Clone)]
pub struct ConfigWrapper {
    /// The parsed document.
    pub document: ConfigDocument,
    /// Absolute path to the YAML source file.
    pub config_file_path: PathBuf,
    /// Directory containing the YAML source file.
    pub config_file_directory: PathBuf,
}

impl ConfigWrapper {
    /// An empty wrapper carrying the envelope of `loaded`: used to seed the
    /// merge accumulator so the root document's own actions are folded in
    /// through the same rebasing path as every include.
    #[must_use]
    pub fn empty_like(loaded: &Self) -> Self {
        Self {
            document: ConfigDocument::default(),
            config_file_path: loaded.config_file_path.clone(),
            config_file_directory: loaded.config_file_directory.clone(),
        }
    }
}

/// Load one YAML configuration document from disk.
///
/// The path is canonicalized so later include resolution and rebasing work
/// from a stable absolute directory regardless of the process working
/// directory.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be resolved or read, and
/// [`ConfigError::Parse`] if the content does not conform to the schema.
pub fn load(path: &Path) -> Result<ConfigWrapper, ConfigError> {
    let abs = dunce::canonicalize(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("reading config document {}", abs.display());
    let raw = std::fs::read_to_string(&abs).map_err(|source| ConfigError::Io {
        path: abs.clone(),
        source,
    })?;

    let document: ConfigDocument =
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: abs.clone(),
            source,
        })?;

    let config_file_directory = abs
        .parent()
        .map_or_else(|| PathBuf::from("/"), Path::to_path_buf);

    Ok(ConfigWrapper {
        document,
        config_file_path: abs,
        config_file_directory,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    /// Write `content` to `<name>` inside a fresh temp dir and return both.
    fn write_temp_yaml(name: &str, content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn load_full_document() {
        let (_dir, path) = write_temp_yaml(
            "root.yaml",
            r"includes:
  - sub/extra.yaml
fileActions:
  bashrc:
    source: bashrc
    destination: ~/.bashrc
  gitconfig:
    source: git/config
    destination: ./.gitconfig
    link: true
packageActions:
  editor:
    name: vim
    manager: pacman
",
        );
        let wrapper = load(&path).unwrap();
        assert_eq!(wrapper.document.includes, vec![PathBuf::from("sub/extra.yaml")]);
        assert_eq!(wrapper.document.file_actions.len(), 2);
        assert_eq!(wrapper.document.package_actions.len(), 1);

        let bashrc = &wrapper.document.file_actions["bashrc"];
        assert_eq!(bashrc.source, PathBuf::from("bashrc"));
        assert_eq!(bashrc.destination, PathBuf::from("~/.bashrc"));
        assert!(!bashrc.link);
        assert!(wrapper.document.file_actions["gitconfig"].link);

        let editor = &wrapper.document.package_actions["editor"];
        assert_eq!(editor.name.as_deref(), Some("vim"));
        assert_eq!(editor.manager.as_deref(), Some("pacman"));
    }

    #[test]
    fn load_empty_document() {
        let (_dir, path) = write_temp_yaml("empty.yaml", "");
        let wrapper = load(&path).unwrap();
        assert!(wrapper.document.includes.is_empty());
        assert!(wrapper.document.file_actions.is_empty());
        assert!(wrapper.document.package_actions.is_empty());
    }

    #[test]
    fn load_sets_absolute_path_and_directory() {
        let (dir, path) = write_temp_yaml("root.yaml", "fileActions: {}\n");
        let wrapper = load(&path).unwrap();
        assert!(wrapper.config_file_path.is_absolute());
        assert_eq!(
            wrapper.config_file_directory,
            dunce::canonicalize(dir.path()).unwrap()
        );
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }), "got: {err}");
    }

    #[test]
    fn load_malformed_yaml_is_parse_error() {
        let (_dir, path) = write_temp_yaml("bad.yaml", "fileActions: [not, a, map]\n");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    }

    #[test]
    fn load_unknown_top_level_key_is_parse_error() {
        let (_dir, path) = write_temp_yaml("bad.yaml", "surprises: []\n");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    }

    #[test]
    fn empty_like_carries_envelope_only() {
        let (_dir, path) = write_temp_yaml(
            "root.yaml",
            "fileActions:\n  x:\n    source: a\n    destination: b\n",
        );
        let wrapper = load(&path).unwrap();
        let empty = ConfigWrapper::empty_like(&wrapper);
        assert_eq!(empty.config_file_path, wrapper.config_file_path);
        assert_eq!(empty.config_file_directory, wrapper.config_file_directory);
        assert!(empty.document.file_actions.is_empty());
    }
}
