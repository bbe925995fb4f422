//! Presentation layer for widgetdesk
//!
//! This crate contains CLI definitions, console output formatting,
//! the console notifier and the interactive editor.

pub mod cli;
pub mod editor;
pub mod output;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use editor::{EditorRepl, ReplCommand, parse_command};
pub use output::console::ConsoleFormatter;
pub use output::notifier::ConsoleNotifier;
