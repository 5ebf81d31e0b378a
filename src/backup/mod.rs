//! Backup capability: preserve the prior contents of a path before the
//! engine overwrites it.
//!
//! The engine consumes the [`BackupService`] trait; [`FsBackupService`] is
//! the filesystem-backed implementation. Naming the backup target is
//! delegated to a [`TargetPathStrategy`] so tests can substitute failing or
//! colliding strategies without touching the service logic.
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::Arguments;
use crate::error::BackupError;

/// Protected system resources that must never be managed, overwritten, or
/// backed up by this engine.
pub const BLACKLISTED_PATHS: &[&str] = &[
    "/", "/bin", "/boot", "/dev", "/etc", "/home", "/lib", "/proc", "/root", "/sbin", "/sys",
    "/usr", "/var",
];

/// Whether `path` names a protected system resource.
///
/// Exact match against [`BLACKLISTED_PATHS`]; files *inside* those
/// directories are legal targets.
#[must_use]
pub fn is_blacklisted(path: &Path) -> bool {
    BLACKLISTED_PATHS.iter().any(|entry| Path::new(entry) == path)
}

/// Outcome of a successful backup call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupStatus {
    /// The resource was copied aside to the contained path.
    Performed(PathBuf),
    /// No backup was needed: the resource does not exist, or backups are
    /// deactivated for this run.
    NotNeeded,
}

/// Capability consulted before any destination file is overwritten.
#[cfg_attr(test, mockall::automock)]
pub trait BackupService: Send + Sync {
    /// Preserve the current contents of `path`, if it exists.
    ///
    /// # Errors
    ///
    /// Returns a [`BackupError`] if `path` is empty or blacklisted, or if
    /// the backup mechanism itself fails. A failed backup never leaves a
    /// partial copy behind the caller could mistake for a complete one.
    fn backup(&self, path: &Path) -> Result<BackupStatus, BackupError>;
}

/// Names the location a resource is copied aside to.
pub trait TargetPathStrategy: Send + Sync {
    /// Compute the backup target path for `resource`.
    ///
    /// # Errors
    ///
    /// Returns a [`BackupError`] when no target can be derived.
    fn extract_target_path(&self, resource: &Path) -> Result<PathBuf, BackupError>;
}

/// Default strategy: `<name>.bak`, either next to the original or inside
/// the configured backup directory.
#[derive(Debug, Clone, Default)]
pub struct BakFileStrategy {
    backup_directory: Option<PathBuf>,
}

impl BakFileStrategy {
    /// Create a strategy placing backups in `backup_directory` when given,
    /// next to the original otherwise.
    #[must_use]
    pub const fn new(backup_directory: Option<PathBuf>) -> Self {
        Self { backup_directory }
    }
}

impl TargetPathStrategy for BakFileStrategy {
    fn extract_target_path(&self, resource: &Path) -> Result<PathBuf, BackupError> {
        let file_name = resource.file_name().ok_or_else(|| {
            BackupError::Strategy(format!("{} has no file name", resource.display()))
        })?;
        let bak_name = format!("{}.bak", file_name.to_string_lossy());

        Ok(self.backup_directory.as_ref().map_or_else(
            || resource.with_file_name(&bak_name),
            |dir| dir.join(&bak_name),
        ))
    }
}

/// Filesystem-backed [`BackupService`].
pub struct FsBackupService {
    backup_activated: bool,
    backup_strategy: Box<dyn TargetPathStrategy>,
}

impl fmt::Debug for FsBackupService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsBackupService")
            .field("backup_activated", &self.backup_activated)
            .finish_non_exhaustive()
    }
}

impl FsBackupService {
    /// Build the service from run arguments, preparing the backup directory.
    ///
    /// A configured backup directory is created when missing.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::NotADirectory`] if the configured directory
    /// exists but is not a directory, and [`BackupError::Io`] if it cannot
    /// be created.
    pub fn new(arguments: &Arguments) -> Result<Self, BackupError> {
        if let Some(dir) = &arguments.backup_directory {
            if dir.exists() {
                if !dir.is_dir() {
                    return Err(BackupError::NotADirectory { path: dir.clone() });
                }
            } else {
                std::fs::create_dir_all(dir).map_err(|source| BackupError::Io {
                    path: dir.clone(),
                    source,
                })?;
            }
        }

        Ok(Self {
            backup_activated: arguments.backup_activated,
            backup_strategy: Box::new(BakFileStrategy::new(arguments.backup_directory.clone())),
        })
    }

    /// Build the service with a substitute naming strategy (tests).
    #[must_use]
    pub fn with_strategy(
        backup_activated: bool,
        backup_strategy: Box<dyn TargetPathStrategy>,
    ) -> Self {
        Self {
            backup_activated,
            backup_strategy,
        }
    }
}

impl BackupService for FsBackupService {
    fn backup(&self, path: &Path) -> Result<BackupStatus, BackupError> {
        if path.as_os_str().is_empty() {
            return Err(BackupError::EmptyPath);
        }
        if is_blacklisted(path) {
            return Err(BackupError::Blacklisted(path.to_path_buf()));
        }
        if !self.backup_activated {
            return Ok(BackupStatus::NotNeeded);
        }
        if !path.exists() {
            return Ok(BackupStatus::NotNeeded);
        }

        let target = self.backup_strategy.extract_target_path(path)?;
        if target.exists() {
            return Err(BackupError::AlreadyExists { path: target });
        }

        std::fs::copy(path, &target).map_err(|source| BackupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("backed up {} to {}", path.display(), target.display());

        Ok(BackupStatus::Performed(target))
    }
}
