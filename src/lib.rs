//! Declarative dotfiles engine.
//!
//! Manages user configuration files and (reserved) package installs, driven
//! by YAML configuration documents that can include one another. The heart
//! of the crate is the configuration resolution pipeline: recursive include
//! loading, last-writer-wins merging of actions across included documents,
//! path rebasing relative to each declaring document, and a backup-then-apply
//! protocol before any destination file is overwritten.
//!
//! The public API is organised into five layers:
//!
//! - **[`config`]** — parse YAML documents and merge include trees
//! - **[`backup`]** — the backup capability consulted before overwrites
//! - **[`actions`]** — per-action execution units (validate, backup, apply)
//! - **[`executor`]** — the read → packages → files pipeline
//! - **[`commands`]** — top-level subcommand orchestration (`apply`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod actions;
pub mod backup;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod paths;
