//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for widgetdesk
#[derive(Parser, Debug)]
#[command(name = "widgetdesk")]
#[command(author, version, about = "Interactive editor for chat widget configurations")]
#[command(long_about = r#"
widgetdesk edits the configuration of an embeddable AI chat widget and keeps
it in sync with the widget configuration service.

Edits are validated as you type, can be undone and redone, and are only
sent to the service when you save.

Configuration files are loaded from (in priority order):
1. WIDGETDESK_* environment variables (e.g. WIDGETDESK_API__BASE_URL)
2. --config <path>          Explicit config file
3. ./widgetdesk.toml        Project-level config
4. ~/.config/widgetdesk/config.toml   Global config

Example:
  widgetdesk                    Start editing a new widget
  widgetdesk --id 42            Load widget 42 and edit it
  widgetdesk --offline -vv      Edit against an in-memory service
"#)]
pub struct Cli {
    /// Identifier of a stored widget configuration to load on start
    #[arg(long, value_name = "ID")]
    pub id: Option<String>,

    /// Use an in-memory service instead of the configured API
    #[arg(long)]
    pub offline: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
