//! Domain-specific error types for the dotbuddy engine.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors ([`ConfigError`], [`ActionError`],
//! [`BackupError`]) while command handlers at the CLI boundary convert them
//! to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Propagation policy
//!
//! - [`ConfigError`] is fatal to the whole run: a partially merged
//!   configuration is unsafe to execute, so load/merge errors abort.
//! - [`ActionError`] and [`BackupError`] are fatal to a single file action
//!   only: the executor logs them and continues with the next action.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading and merging configuration documents.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configuration document could not be read from disk.
    #[error("IO error reading config document {path}: {source}")]
    Io {
        /// Path to the document that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration document does not conform to the YAML schema.
    #[error("invalid YAML in {path}: {source}")]
    Parse {
        /// Path to the malformed document.
        path: PathBuf,
        /// Underlying deserialization error.
        source: serde_yaml::Error,
    },

    /// A document includes itself, directly or through other documents.
    #[error("include cycle detected: {path} is already being merged")]
    IncludeCycle {
        /// Resolved absolute path of the document that closed the cycle.
        path: PathBuf,
    },
}

/// Errors returned by the backup capability.
#[derive(Error, Debug)]
pub enum BackupError {
    /// The path handed to the backup service was empty.
    #[error("path cannot be empty")]
    EmptyPath,

    /// The path is on the fixed blacklist of protected system resources.
    #[error("This is a blacklisted item: {0}")]
    Blacklisted(PathBuf),

    /// The configured backup directory exists but is not a directory.
    #[error("backup location {path} is not a directory")]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// The computed backup target already exists and will not be overwritten.
    #[error("backup target {path} already exists")]
    AlreadyExists {
        /// The backup target path that is already occupied.
        path: PathBuf,
    },

    /// The strategy that names backup targets failed.
    #[error("backup target resolution failed: {0}")]
    Strategy(String),

    /// Copying the resource aside failed.
    #[error("IO error backing up {path}: {source}")]
    Io {
        /// The resource being backed up.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors fatal to a single file action.
#[derive(Error, Debug)]
pub enum ActionError {
    /// The action's source or destination is empty.
    #[error("path cannot be empty")]
    EmptyPath,

    /// The action's destination is a protected system resource.
    #[error("This is a blacklisted item: {0}")]
    Blacklisted(PathBuf),

    /// The destination is home-relative but no home directory is known.
    #[error("cannot expand {path}: no home directory available")]
    NoHomeDirectory {
        /// The home-relative destination that could not be expanded.
        path: PathBuf,
    },

    /// Backing up the destination failed; the destination was not touched.
    #[error("backup failed: {0}")]
    Backup(#[from] BackupError),

    /// Copying or linking the source into place failed.
    #[error("IO error applying action to {path}: {source}")]
    Io {
        /// The destination being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
