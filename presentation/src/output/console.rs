//! Console output formatter for editor state

use colored::Colorize;
use widgetdesk_application::{EditorSnapshot, Notice, NoticeLevel, WidgetConfigPayload};
use widgetdesk_domain::{ErrorMap, Field, Section, WidgetConfig};

/// Formats editor sessions for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Enable or disable ANSI colors for everything this crate prints
    pub fn set_color_enabled(enabled: bool) {
        if enabled {
            colored::control::unset_override();
        } else {
            colored::control::set_override(false);
        }
    }

    /// Format the whole document, grouped by section
    pub fn format_snapshot(snapshot: &EditorSnapshot) -> String {
        let mut output = String::new();

        let title = if snapshot.document.widget_name.trim().is_empty() {
            "(unnamed widget)".to_string()
        } else {
            snapshot.document.widget_name.clone()
        };
        output.push_str(&Self::header(&title));
        output.push('\n');

        let identity = snapshot
            .identity
            .as_ref()
            .map_or_else(|| "not saved yet".dimmed().to_string(), |id| format!("#{id}"));
        let dirty = if snapshot.dirty {
            "unsaved changes".yellow().to_string()
        } else {
            "saved".green().to_string()
        };
        output.push_str(&format!(
            "{} {}  {} {}  {} {}\n",
            "Record:".cyan().bold(),
            identity,
            "State:".cyan().bold(),
            dirty,
            "Sync:".cyan().bold(),
            snapshot.state.as_str()
        ));
        output.push_str(&format!(
            "{} {}  {} {}\n",
            "Undo:".cyan().bold(),
            Self::availability(snapshot.can_undo),
            "Redo:".cyan().bold(),
            Self::availability(snapshot.can_redo)
        ));

        for section in Section::ALL {
            output.push_str(&Self::format_section(
                section,
                &snapshot.document,
                &snapshot.errors,
                section == snapshot.active_section,
            ));
        }

        if snapshot.busy {
            output.push_str(&format!("\n{}\n", "A request is in progress...".dimmed()));
        }
        output
    }

    /// Format one section's fields, marking failing ones
    pub fn format_section(
        section: Section,
        document: &WidgetConfig,
        errors: &ErrorMap,
        active: bool,
    ) -> String {
        let mut output = String::new();
        let title = format!("{} {}", if active { "▸" } else { " " }, section);
        if active {
            output.push_str(&format!("\n{}\n", title.yellow().bold()));
        } else {
            output.push_str(&format!("\n{}\n", title.bold()));
        }

        for field in Field::ALL.iter().filter(|f| f.section() == section) {
            let value = Self::format_value(*field, document);
            match errors.get(field.path()) {
                Some(message) => output.push_str(&format!(
                    "  {:<22} {}\n  {:<22} {}\n",
                    field.path().red(),
                    value,
                    "",
                    format!("✗ {message}").red()
                )),
                None => output.push_str(&format!("  {:<22} {}\n", field.path(), value)),
            }
        }
        output
    }

    /// Display form of a single field value
    pub fn format_value(field: Field, document: &WidgetConfig) -> String {
        let quoted = |s: &str| format!("\"{s}\"");
        match field {
            Field::WidgetName => quoted(&document.widget_name),
            Field::Template => document.template.to_string(),
            Field::PrimaryColor => document.primary_color.clone(),
            Field::Width => format!("{}px", document.width),
            Field::Height => format!("{}px", document.height),
            Field::AssistantAvatar if document.assistant_avatar.is_empty() => {
                "(none)".dimmed().to_string()
            }
            Field::AssistantAvatar => document.assistant_avatar.clone(),
            Field::Position => document.position.to_string(),
            Field::Theme => document.theme.to_string(),
            Field::WelcomeMessage => quoted(&document.welcome_message),
            Field::PlaceholderText => quoted(&document.placeholder_text),
            Field::AssistantName => quoted(&document.assistant_name),
            Field::AutoTriggerEnabled => {
                let state = if document.auto_trigger.enabled { "on" } else { "off" };
                state.to_string()
            }
            Field::AutoTriggerDelay => format!("{}s", document.auto_trigger.delay),
            Field::AutoTriggerMessage => quoted(&document.auto_trigger.message),
            Field::AiModel if document.ai_model.is_empty() => "(none)".dimmed().to_string(),
            Field::AiModel => document.ai_model.clone(),
            Field::KnowledgeBase if document.knowledge_base.is_empty() => {
                "(empty)".dimmed().to_string()
            }
            Field::KnowledgeBase => document.knowledge_base.join(", "),
        }
    }

    /// List validation errors in declaration order
    pub fn format_errors(errors: &ErrorMap) -> String {
        if errors.is_empty() {
            return format!("{}\n", "No validation errors".green());
        }
        let mut output = format!(
            "{}\n",
            format!("{} validation error(s):", errors.len()).red().bold()
        );
        for (path, message) in errors.ordered() {
            let label = Field::from_path(path).map_or(path, |f| f.label());
            output.push_str(&format!("  {} {}: {}\n", "✗".red(), label.bold(), message));
        }
        output
    }

    /// One-line rendering of a notice
    pub fn format_notice(notice: &Notice) -> String {
        let tag = match notice.level {
            NoticeLevel::Success => "✓".green().bold(),
            NoticeLevel::Info => "•".cyan().bold(),
            NoticeLevel::Warning => "!".yellow().bold(),
            NoticeLevel::Error => "✗".red().bold(),
        };
        format!("{} {}", tag, notice.message)
    }

    /// Format the persistence payload as JSON
    pub fn format_json(document: &WidgetConfig) -> String {
        serde_json::to_string_pretty(&WidgetConfigPayload::from(document))
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Field paths accepted by `set`, grouped by section
    pub fn format_field_help() -> String {
        let mut output = String::new();
        for section in Section::ALL {
            let paths: Vec<&str> = Field::ALL
                .iter()
                .filter(|f| f.section() == section)
                .map(|f| f.path())
                .collect();
            output.push_str(&format!("  {:<10} {}\n", section.to_string().bold(), paths.join(", ")));
        }
        output
    }

    fn availability(available: bool) -> String {
        if available {
            "yes".to_string()
        } else {
            "no".dimmed().to_string()
        }
    }

    fn header(title: &str) -> String {
        let line = "═".repeat(50);
        format!(
            "{}\n{}\n{}",
            line.cyan(),
            format!("  {title}").cyan().bold(),
            line.cyan()
        )
    }
}
