//! CLI entrypoint for widgetdesk
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use widgetdesk_application::{
    ConfigId, EditJournal, EditorBehavior, EditorNotifier, EditorSession, NoEditJournal,
    WidgetConfigGateway,
};
use widgetdesk_infrastructure::{
    ConfigLoader, FileConfig, HttpWidgetConfigGateway, InMemoryWidgetConfigGateway,
    JsonlEditJournal, Severity,
};
use widgetdesk_presentation::{Cli, ConsoleFormatter, ConsoleNotifier, EditorRepl};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Held until exit so buffered log lines are flushed
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting widgetdesk");

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        return Ok(());
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };
    config.editor.offline |= cli.offline;

    for issue in config.validate() {
        if issue.severity == Severity::Warning {
            warn!("Configuration {}", issue);
        }
    }
    config.ensure_valid().context("Invalid configuration")?;

    ConsoleFormatter::set_color_enabled(config.output.color);

    // === Dependency Injection ===
    let notifier: Arc<dyn EditorNotifier> = Arc::new(ConsoleNotifier::new());
    let journal = open_journal(&config);
    let behavior = config.editor_behavior();
    let initial = cli.id.map(ConfigId::new);

    if config.editor.offline {
        info!("Running offline with an in-memory service");
        let gateway = Arc::new(InMemoryWidgetConfigGateway::new());
        run_editor(gateway, notifier, journal, behavior, initial).await
    } else {
        let gateway = HttpWidgetConfigGateway::from_config(&config.api)
            .context("Failed to create the API client")?;
        run_editor(Arc::new(gateway), notifier, journal, behavior, initial).await
    }
}

async fn run_editor<G: WidgetConfigGateway + 'static>(
    gateway: Arc<G>,
    notifier: Arc<dyn EditorNotifier>,
    journal: Arc<dyn EditJournal>,
    behavior: EditorBehavior,
    initial: Option<ConfigId>,
) -> Result<()> {
    let session = Arc::new(
        EditorSession::new(gateway)
            .with_notifier(notifier)
            .with_journal(journal)
            .with_behavior(behavior),
    );

    if let Some(id) = initial
        && let Err(e) = session.load(id).await
    {
        // The notifier already told the operator; keep editing the defaults
        warn!("Initial load failed: {}", e);
    }

    EditorRepl::new(session).run().await?;
    Ok(())
}

fn open_journal(config: &FileConfig) -> Arc<dyn EditJournal> {
    let Some(path) = config.journal_path() else {
        return Arc::new(NoEditJournal);
    };
    match JsonlEditJournal::open(path) {
        Some(journal) => {
            info!("Edit journal: {}", journal.path().display());
            Arc::new(journal)
        }
        None => Arc::new(NoEditJournal),
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Cannot open log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}
