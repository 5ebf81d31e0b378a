//! Recursive include-tree merging with last-writer-wins semantics.
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::paths;

use super::document::{self, ConfigWrapper};

/// Merges a tree of configuration documents into one accumulated wrapper.
///
/// Traversal is depth-first in include-declaration order, so the override
/// rule is simply "last writer in traversal order wins" for colliding
/// action names. The merger tracks the chain of documents currently being
/// merged to reject include cycles; the same document reached twice through
/// different non-cyclic paths (a diamond) re-merges idempotently.
#[derive(Debug, Default)]
pub struct Merger {
    /// Ancestor chain of the current recursion, by resolved absolute path.
    active: Vec<PathBuf>,
}

impl Merger {
    /// Create a merger with an empty ancestor chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the document at `document_path` and fold its actions — and,
    /// recursively, the actions of everything it includes — into
    /// `accumulator`.
    ///
    /// On the first call the accumulator is seeded with the document's
    /// envelope, so the root document's own actions go through the same
    /// rebasing as every included one.
    ///
    /// # Errors
    ///
    /// Fails fast with a [`ConfigError`] on any load, parse, or include
    /// cycle; a partially merged configuration is unsafe to execute, so
    /// nothing is reported about how far the merge got.
    pub fn merge_into(
        &mut self,
        accumulator: &mut Option<ConfigWrapper>,
        document_path: &Path,
    ) -> Result<(), ConfigError> {
        let loaded = document::load(document_path)?;

        if self.active.contains(&loaded.config_file_path) {
            return Err(ConfigError::IncludeCycle {
                path: loaded.config_file_path,
            });
        }

        let acc = accumulator.get_or_insert_with(|| ConfigWrapper::empty_like(&loaded));
        fold_actions(acc, &loaded);

        self.active.push(loaded.config_file_path.clone());
        for include in &loaded.document.includes {
            let include_path = loaded.config_file_directory.join(include);
            let result = self.merge_into(accumulator, &include_path);
            if result.is_err() {
                self.active.pop();
                return result;
            }
        }
        self.active.pop();

        Ok(())
    }
}

/// Fold one freshly loaded document's actions into the accumulator,
/// rebasing paths against the loaded document's directory:
///
/// - `source` becomes absolute (`document_directory/source`, normalized);
/// - a `.`-prefixed `destination` is rebased the same way; any other
///   destination (absolute or home-relative) passes through unchanged.
///
/// Insertion overwrites colliding keys entirely — no field-level merge.
fn fold_actions(acc: &mut ConfigWrapper, loaded: &ConfigWrapper) {
    let dir = &loaded.config_file_directory;

    for (name, action) in &loaded.document.file_actions {
        let mut action = action.clone();
        action.source = paths::absolutize(dir, &action.source);
        if paths::is_dot_prefixed(&action.destination) {
            action.destination = paths::absolutize(dir, &action.destination);
        }
        acc.document.file_actions.insert(name.clone(), action);
    }

    for (name, package) in &loaded.document.package_actions {
        acc.document
            .package_actions
            .insert(name.clone(), package.clone());
    }
}
