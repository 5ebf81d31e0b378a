//! Command: resolve configuration documents and apply their file actions.
use anyhow::Result;

use crate::backup::FsBackupService;
use crate::cli::{ApplyOpts, Arguments};
use crate::executor::Executor;
use crate::logging::Logger;

/// Run the apply command.
///
/// # Errors
///
/// Returns an error if the backup service cannot be constructed, if
/// configuration loading/merging fails, or if one or more file actions
/// failed (after every action has been attempted).
pub fn run(opts: &ApplyOpts, log: &Logger) -> Result<()> {
    let version = option_env!("DOTBUDDY_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.info(&format!("dotbuddy {version}"));

    let arguments = Arguments::from(opts);
    let backup_service = FsBackupService::new(&arguments)?;

    Executor::new(&arguments, &backup_service, log).run()?;

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} file action(s) failed");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn run_with_no_configs_succeeds() {
        let opts = ApplyOpts {
            configs: vec![],
            backup: false,
            backup_dir: None,
        };
        let log = Logger::new();
        assert!(run(&opts, &log).is_ok());
    }

    #[test]
    fn run_with_invalid_backup_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("occupied");
        std::fs::write(&file, "x").unwrap();

        let opts = ApplyOpts {
            configs: vec![],
            backup: true,
            backup_dir: Some(file),
        };
        let log = Logger::new();
        let err = run(&opts, &log).unwrap_err();
        assert!(
            err.to_string().contains("is not a directory"),
            "got: {err}"
        );
    }

    #[test]
    fn run_with_missing_config_fails() {
        let opts = ApplyOpts {
            configs: vec![PathBuf::from("/definitely/not/here.yaml")],
            backup: false,
            backup_dir: None,
        };
        let log = Logger::new();
        assert!(run(&opts, &log).is_err());
    }

    #[test]
    fn run_reports_failed_actions_in_exit_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("root.yaml"),
            "fileActions:\n  broken:\n    source: \"\"\n    destination: \"\"\n",
        )
        .unwrap();

        let opts = ApplyOpts {
            configs: vec![dir.path().join("root.yaml")],
            backup: false,
            backup_dir: None,
        };
        let log = Logger::new();
        let err = run(&opts, &log).unwrap_err();
        assert!(err.to_string().contains("file action(s) failed"), "got: {err}");
    }
}
