//! File-action execution: validate, back up, then copy or link into place.
use std::fmt;
use std::path::{Path, PathBuf};

use crate::backup::{self, BackupService};
use crate::config::FileAction;
use crate::error::ActionError;
use crate::paths;

/// Executes one merged [`FileAction`]: validation, blacklist check, backup
/// of the destination, then copy (or symlink) of the source into place.
///
/// Failures are fatal to this action only; the executor isolates them and
/// continues with the rest of the batch.
pub struct FileActionHandler<'a> {
    action: &'a FileAction,
    name: &'a str,
    home: Option<&'a Path>,
    backup_service: &'a dyn BackupService,
}

impl fmt::Debug for FileActionHandler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileActionHandler")
            .field("action", &self.action)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<'a> FileActionHandler<'a> {
    /// Build a handler for one named action.
    ///
    /// `home` is the resolved home directory used to expand `~`-prefixed
    /// destinations; `None` when the environment provides no home.
    #[must_use]
    pub const fn new(
        action: &'a FileAction,
        name: &'a str,
        home: Option<&'a Path>,
        backup_service: &'a dyn BackupService,
    ) -> Self {
        Self {
            action,
            name,
            home,
            backup_service,
        }
    }

    /// Run the action. Returns the resolved destination on success.
    ///
    /// The destination is only mutated after the backup step succeeded or
    /// was legitimately skipped (destination absent, backups deactivated).
    ///
    /// # Errors
    ///
    /// Returns an [`ActionError`] for empty paths, blacklisted destinations,
    /// failed backups, or I/O failures while copying/linking.
    pub fn execute(&self) -> Result<PathBuf, ActionError> {
        if self.action.source.as_os_str().is_empty()
            || self.action.destination.as_os_str().is_empty()
        {
            return Err(ActionError::EmptyPath);
        }

        let destination = self.resolve_destination()?;
        if backup::is_blacklisted(&destination) || backup::is_blacklisted(&self.action.source) {
            return Err(ActionError::Blacklisted(destination));
        }

        self.backup_service.backup(&destination)?;

        tracing::debug!(
            "applying file action {}: {} -> {}",
            self.name,
            self.action.source.display(),
            destination.display()
        );
        self.apply(&destination)?;

        Ok(destination)
    }

    /// Expand a home-relative destination against the resolved home
    /// directory; everything else passes through.
    fn resolve_destination(&self) -> Result<PathBuf, ActionError> {
        if paths::is_home_relative(&self.action.destination) {
            let home = self.home.ok_or_else(|| ActionError::NoHomeDirectory {
                path: self.action.destination.clone(),
            })?;
            Ok(paths::expand_home(&self.action.destination, home))
        } else {
            Ok(self.action.destination.clone())
        }
    }

    /// Copy or link the source into place, creating parent directories.
    fn apply(&self, destination: &Path) -> Result<(), ActionError> {
        let io_err = |source: std::io::Error| ActionError::Io {
            path: destination.to_path_buf(),
            source,
        };

        if let Some(parent) = destination.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        if self.action.link {
            // The backup already preserved any prior contents; a stale file
            // or link at the destination must give way to the new link.
            if destination.symlink_metadata().is_ok() {
                std::fs::remove_file(destination).map_err(io_err)?;
            }
            create_symlink(&self.action.source, destination).map_err(io_err)?;
        } else {
            std::fs::copy(&self.action.source, destination).map_err(io_err)?;
        }

        Ok(())
    }
}

/// Create a symlink at `link` pointing to `target`.
#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

/// Create a symlink at `link` pointing to `target`.
#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}
