//! Logging infrastructure: tracing subscriber setup and the run logger.
//!
//! Console output goes through [`tracing`]; the [`Logger`] additionally
//! collects one [`ActionEntry`] per attempted file action so the command
//! layer can print a run summary and decide the process exit status.
use std::sync::Mutex;

/// Result of one attempted file action, kept for the run summary.
#[derive(Debug, Clone)]
pub struct ActionEntry {
    /// Name of the file action (its key in the merged configuration).
    pub name: String,
    /// Final status of the action.
    pub status: ActionStatus,
    /// Optional detail message (e.g., the error description).
    pub message: Option<String>,
}

/// Final status of an attempted file action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    /// The action was applied successfully.
    Ok,
    /// The action failed; the run continued with the next action.
    Failed,
    /// The action was not attempted (reserved stage, e.g. package actions).
    Skipped,
}

/// Run logger: delegates display to [`tracing`] and records per-action
/// results for the summary printed at the end of a run.
#[derive(Debug, Default)]
pub struct Logger {
    entries: Mutex<Vec<ActionEntry>>,
}

impl Logger {
    /// Create a new logger with an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: "dotbuddy::stage", "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Record an action result for the summary.
    pub fn record_action(&self, name: &str, status: ActionStatus, message: Option<&str>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(ActionEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Number of actions recorded as [`ActionStatus::Failed`].
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.entries.lock().map_or(0, |entries| {
            entries
                .iter()
                .filter(|e| e.status == ActionStatus::Failed)
                .count()
        })
    }

    /// Whether any recorded action failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Return a clone of all recorded action entries.
    #[must_use]
    pub fn entries(&self) -> Vec<ActionEntry> {
        self.entries.lock().map_or_else(|_| Vec::new(), |e| e.clone())
    }

    /// Print the summary of all recorded actions.
    pub fn print_summary(&self) {
        let entries = self.entries();
        if entries.is_empty() {
            return;
        }

        self.stage("Summary");

        let mut ok = 0usize;
        let mut failed = 0usize;
        let mut skipped = 0usize;

        for entry in &entries {
            let icon = match entry.status {
                ActionStatus::Ok => {
                    ok += 1;
                    "✓"
                }
                ActionStatus::Failed => {
                    failed += 1;
                    "✗"
                }
                ActionStatus::Skipped => {
                    skipped += 1;
                    "○"
                }
            };
            let suffix = entry
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            self.info(&format!("{icon} {}{suffix}", entry.name));
        }

        self.info(&format!(
            "{} actions: {ok} ok, {failed} failed, {skipped} skipped",
            entries.len()
        ));
    }
}

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that emits dotbuddy-style
/// console output: coloured level prefixes, `==>` stage headers, and
/// dimmed debug lines.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let level = *metadata.level();
        let target = metadata.target();

        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        let msg = &extractor.message;

        match level {
            tracing::Level::ERROR => writeln!(writer, "\x1b[31mERROR\x1b[0m {msg}"),
            tracing::Level::WARN => writeln!(writer, "\x1b[33mWARN\x1b[0m  {msg}"),
            tracing::Level::INFO if target == "dotbuddy::stage" => {
                writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m")
            }
            tracing::Level::INFO => writeln!(writer, "  {msg}"),
            _ => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Installs a console subscriber formatting events in the dotbuddy output
/// style, with WARN and above routed to stderr. The default level is INFO
/// (DEBUG when `verbose`); the `RUST_LOG` environment variable overrides it.
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(make_writer)
        .with_filter(filter);

    tracing_subscriber::registry().with(console_layer).init();
}
