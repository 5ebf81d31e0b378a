//! Command-line interface types and the argument envelope handed to the
//! execution pipeline.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the dotbuddy engine.
#[derive(Parser, Debug)]
#[command(
    name = "dotbuddy",
    about = "Declarative dotfiles engine driven by YAML documents",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve configuration documents and apply their file actions
    Apply(ApplyOpts),
    /// Print version information
    Version,
}

/// Options for the `apply` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ApplyOpts {
    /// Configuration document to load; may be given multiple times, later
    /// documents overwrite colliding action names from earlier ones
    #[arg(short, long = "config", value_name = "FILE")]
    pub configs: Vec<PathBuf>,

    /// Back up an existing destination file before it is overwritten
    #[arg(short, long)]
    pub backup: bool,

    /// Directory where backups are stored (default: next to the original)
    #[arg(long, value_name = "DIR")]
    pub backup_dir: Option<PathBuf>,
}

/// Resolved run arguments threaded through the execution pipeline.
///
/// Decoupled from [`ApplyOpts`] so the pipeline does not depend on clap
/// types and tests can construct arguments directly.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    /// Top-level configuration documents to load, in merge order.
    pub configs: Vec<PathBuf>,
    /// Whether existing destination files are backed up before overwrites.
    pub backup_activated: bool,
    /// Where backups are stored; `None` places them next to the original.
    pub backup_directory: Option<PathBuf>,
}

impl From<&ApplyOpts> for Arguments {
    fn from(opts: &ApplyOpts) -> Self {
        Self {
            configs: opts.configs.clone(),
            backup_activated: opts.backup,
            backup_directory: opts.backup_dir.clone(),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_apply_with_configs() {
        let cli = Cli::parse_from(["dotbuddy", "apply", "-c", "a.yaml", "-c", "b.yaml"]);
        let Command::Apply(opts) = cli.command else {
            panic!("expected Apply command");
        };
        assert_eq!(
            opts.configs,
            vec![PathBuf::from("a.yaml"), PathBuf::from("b.yaml")]
        );
    }

    #[test]
    fn parse_apply_backup_flags() {
        let cli = Cli::parse_from([
            "dotbuddy",
            "apply",
            "-c",
            "a.yaml",
            "--backup",
            "--backup-dir",
            "/tmp/bak",
        ]);
        let Command::Apply(opts) = cli.command else {
            panic!("expected Apply command");
        };
        assert!(opts.backup);
        assert_eq!(opts.backup_dir, Some(PathBuf::from("/tmp/bak")));
    }

    #[test]
    fn backup_is_disabled_by_default() {
        let cli = Cli::parse_from(["dotbuddy", "apply", "-c", "a.yaml"]);
        let Command::Apply(opts) = cli.command else {
            panic!("expected Apply command");
        };
        assert!(!opts.backup);
        assert!(opts.backup_dir.is_none());
    }

    #[test]
    fn parse_apply_without_configs() {
        let cli = Cli::parse_from(["dotbuddy", "apply"]);
        let Command::Apply(opts) = cli.command else {
            panic!("expected Apply command");
        };
        assert!(opts.configs.is_empty());
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["dotbuddy", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["dotbuddy", "-v", "apply"]);
        assert!(cli.verbose);
    }

    #[test]
    fn arguments_from_apply_opts() {
        let opts = ApplyOpts {
            configs: vec![PathBuf::from("x.yaml")],
            backup: true,
            backup_dir: Some(PathBuf::from("bak")),
        };
        let args = Arguments::from(&opts);
        assert_eq!(args.configs, vec![PathBuf::from("x.yaml")]);
        assert!(args.backup_activated);
        assert_eq!(args.backup_directory, Some(PathBuf::from("bak")));
    }
}
