//! The run pipeline: read and merge configs, execute package actions
//! (reserved no-op), then execute file actions with failure isolation.
use std::fmt;

use crate::actions::FileActionHandler;
use crate::backup::BackupService;
use crate::cli::Arguments;
use crate::config::{ConfigWrapper, Merger};
use crate::error::ConfigError;
use crate::logging::{ActionStatus, Logger};
use crate::paths;

/// Orchestrates one run: `read_configs → execute_packages → execute_files`.
///
/// Stage semantics differ deliberately: any error while reading or merging
/// configuration aborts the run (a partially merged configuration is unsafe
/// to execute), while per-action errors during file execution are recorded
/// and the loop continues with the next action.
pub struct Executor<'a> {
    arguments: &'a Arguments,
    backup_service: &'a dyn BackupService,
    log: &'a Logger,
    merged: Option<ConfigWrapper>,
}

impl fmt::Debug for Executor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("arguments", &self.arguments)
            .field("merged", &self.merged)
            .finish_non_exhaustive()
    }
}

impl<'a> Executor<'a> {
    /// Build an executor for one run.
    #[must_use]
    pub const fn new(
        arguments: &'a Arguments,
        backup_service: &'a dyn BackupService,
        log: &'a Logger,
    ) -> Self {
        Self {
            arguments,
            backup_service,
            log,
            merged: None,
        }
    }

    /// Run the pipeline to completion.
    ///
    /// # Errors
    ///
    /// Returns an error only for configuration failures; file-action
    /// failures are isolated and reflected in the logger's recorded
    /// results instead.
    pub fn run(mut self) -> Result<(), ConfigError> {
        self.read_configs()?;
        self.execute_packages();
        self.execute_files();
        Ok(())
    }

    /// Fold every configured document through the merger, in list order.
    ///
    /// An empty config list is a successful no-op run.
    fn read_configs(&mut self) -> Result<(), ConfigError> {
        if self.arguments.configs.is_empty() {
            self.log
                .info("no config documents provided; nothing to do");
            return Ok(());
        }

        self.log.stage("Resolving configuration");
        let mut accumulator = None;
        let mut merger = Merger::new();
        for path in &self.arguments.configs {
            merger.merge_into(&mut accumulator, path)?;
        }

        if let Some(merged) = &accumulator {
            self.log.info(&format!(
                "resolved {} file actions, {} package actions",
                merged.document.file_actions.len(),
                merged.document.package_actions.len()
            ));
        }
        self.merged = accumulator;
        Ok(())
    }

    /// Reserved extension point: package actions are merged but not yet
    /// executed.
    fn execute_packages(&self) {
        let Some(merged) = &self.merged else { return };
        let count = merged.document.package_actions.len();
        if count > 0 {
            self.log.debug(&format!(
                "skipping {count} package actions (package execution is not implemented)"
            ));
        }
    }

    /// Execute every merged file action, isolating per-action failures.
    ///
    /// Iteration order over the merged map is implementation-defined; the
    /// merge already settled all key collisions.
    fn execute_files(&self) {
        let Some(merged) = &self.merged else { return };
        if merged.document.file_actions.is_empty() {
            return;
        }

        self.log.stage("Applying file actions");
        let home = paths::home_dir();

        for (name, action) in &merged.document.file_actions {
            let handler =
                FileActionHandler::new(action, name, home.as_deref(), self.backup_service);
            match handler.execute() {
                Ok(destination) => {
                    self.log.info(&format!(
                        "{name}: {} -> {}",
                        action.source.display(),
                        destination.display()
                    ));
                    self.log.record_action(name, ActionStatus::Ok, None);
                }
                Err(e) => {
                    self.log
                        .error(&format!("{name}: {e} (action: {action:?})"));
                    self.log
                        .record_action(name, ActionStatus::Failed, Some(&e.to_string()));
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::backup::FsBackupService;
    use std::path::PathBuf;

    fn run_with(configs: Vec<PathBuf>) -> (Result<(), ConfigError>, Logger) {
        let arguments = Arguments {
            configs,
            backup_activated: false,
            backup_directory: None,
        };
        let backup = FsBackupService::new(&arguments).unwrap();
        let log = Logger::new();
        let result = Executor::new(&arguments, &backup, &log).run();
        (result, log)
    }

    #[test]
    fn empty_config_list_is_a_successful_noop() {
        let (result, log) = run_with(vec![]);
        assert!(result.is_ok());
        assert!(log.entries().is_empty(), "no actions should be attempted");
    }

    #[test]
    fn unreadable_config_aborts_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let (result, log) = run_with(vec![dir.path().join("missing.yaml")]);
        assert!(matches!(result, Err(ConfigError::Io { .. })));
        assert!(log.entries().is_empty());
    }

    #[test]
    fn malformed_config_aborts_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "fileActions: nonsense\n").unwrap();
        let (result, _log) = run_with(vec![path]);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn include_collision_executes_the_including_documents_winner() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir_all(&sub).unwrap();

        std::fs::write(dir.path().join("root_payload"), "root").unwrap();
        std::fs::write(sub.join("sub_payload"), "sub").unwrap();

        let destination = dir.path().join("out");
        std::fs::write(
            sub.join("extra.yaml"),
            format!(
                "fileActions:\n  x:\n    source: sub_payload\n    destination: {}\n",
                destination.display()
            ),
        )
        .unwrap();
        std::fs::write(
            dir.path().join("root.yaml"),
            format!(
                "includes:\n  - sub/extra.yaml\nfileActions:\n  x:\n    source: root_payload\n    destination: {}\n",
                destination.display()
            ),
        )
        .unwrap();

        let (result, log) = run_with(vec![dir.path().join("root.yaml")]);
        assert!(result.is_ok());
        assert_eq!(log.failure_count(), 0);
        assert_eq!(
            std::fs::read_to_string(destination).unwrap(),
            "sub",
            "the included document's action must win the key collision"
        );
    }

    #[test]
    fn one_failing_action_does_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a_src", "b_src", "c_src"] {
            std::fs::write(dir.path().join(name), name).unwrap();
        }

        // Action "b" has an empty destination and must fail validation;
        // "a" and "c" must still be attempted and succeed.
        std::fs::write(
            dir.path().join("root.yaml"),
            format!(
                "fileActions:\n  a:\n    source: a_src\n    destination: {out}/a\n  b:\n    source: b_src\n    destination: \"\"\n  c:\n    source: c_src\n    destination: {out}/c\n",
                out = dir.path().display()
            ),
        )
        .unwrap();

        let (result, log) = run_with(vec![dir.path().join("root.yaml")]);
        assert!(result.is_ok(), "per-action failures must not abort the run");

        let entries = log.entries();
        assert_eq!(entries.len(), 3, "all three actions must be attempted");
        assert_eq!(log.failure_count(), 1);
        assert!(dir.path().join("a").is_file());
        assert!(dir.path().join("c").is_file());

        let failed = entries
            .iter()
            .find(|e| e.status == ActionStatus::Failed)
            .unwrap();
        assert_eq!(failed.name, "b");
        assert!(
            failed.message.as_deref().unwrap().contains("path cannot be empty"),
            "failure message should carry the validation error"
        );
    }

    #[test]
    fn later_top_level_config_overwrites_earlier() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one"), "one").unwrap();
        std::fs::write(dir.path().join("two"), "two").unwrap();
        let destination = dir.path().join("out");

        for (doc, src) in [("first.yaml", "one"), ("second.yaml", "two")] {
            std::fs::write(
                dir.path().join(doc),
                format!(
                    "fileActions:\n  x:\n    source: {src}\n    destination: {}\n",
                    destination.display()
                ),
            )
            .unwrap();
        }

        let (result, log) = run_with(vec![
            dir.path().join("first.yaml"),
            dir.path().join("second.yaml"),
        ]);
        assert!(result.is_ok());
        assert_eq!(log.entries().len(), 1);
        assert_eq!(std::fs::read_to_string(destination).unwrap(), "two");
    }
}
