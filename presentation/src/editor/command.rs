//! Parsing of interactive editor commands

use widgetdesk_application::ConfigId;
use widgetdesk_domain::{Field, Section};

/// A command typed at the editor prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// `set <field> <value>`
    Set { field: Field, value: String },
    Show,
    /// `show json`
    ShowJson,
    Errors,
    Undo,
    Redo,
    Reset,
    Load(ConfigId),
    Save,
    /// `validate` or `validate remote`
    Validate { remote: bool },
    Test,
    Duplicate(String),
    Section(Section),
    Fields,
    Help,
    Quit,
}

/// Parse one input line.
///
/// A leading `/` is accepted, so `/save` and `save` are the same command.
pub fn parse_command(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();
    let line = line.strip_prefix('/').unwrap_or(line);
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "set" => {
            let (path, value) = match rest.split_once(char::is_whitespace) {
                Some((path, value)) => (path, value.trim()),
                None => (rest, ""),
            };
            if path.is_empty() {
                return Err("Usage: set <field> <value>".to_string());
            }
            let field = path.parse::<Field>().map_err(|e| e.to_string())?;
            ReplCommand::Set {
                field,
                value: unquote(value).to_string(),
            }
        }
        "show" | "s" => match rest {
            "" => ReplCommand::Show,
            "json" => ReplCommand::ShowJson,
            other => return Err(format!("Unknown show format: {other}")),
        },
        "errors" | "e" => ReplCommand::Errors,
        "undo" | "u" => ReplCommand::Undo,
        "redo" | "r" => ReplCommand::Redo,
        "reset" => ReplCommand::Reset,
        "load" | "open" => {
            if rest.is_empty() {
                return Err("Usage: load <id>".to_string());
            }
            ReplCommand::Load(ConfigId::new(rest))
        }
        "save" | "w" => ReplCommand::Save,
        "validate" | "check" => match rest {
            "" => ReplCommand::Validate { remote: false },
            "remote" => ReplCommand::Validate { remote: true },
            other => return Err(format!("Unknown validate mode: {other}")),
        },
        "test" => ReplCommand::Test,
        "duplicate" | "dup" => {
            let name = unquote(rest);
            if name.is_empty() {
                return Err("Usage: duplicate <new name>".to_string());
            }
            ReplCommand::Duplicate(name.to_string())
        }
        "section" | "tab" => {
            let section = rest.parse::<Section>().map_err(|e| e.to_string())?;
            ReplCommand::Section(section)
        }
        "fields" => ReplCommand::Fields,
        "help" | "h" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        _ => return Err(format!("Unknown command: {verb}. Type help for available commands")),
    };
    Ok(command)
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
