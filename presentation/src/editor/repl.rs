//! REPL (Read-Eval-Print Loop) for interactive widget editing

use super::command::{ReplCommand, parse_command};
use super::keymap;
use crate::ConsoleFormatter;
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, Emacs, Reedline, Signal};
use std::sync::Arc;
use tracing::debug;
use widgetdesk_application::{
    CommandDispatcher, EditorSession, SaveReport, TestOutcome, WidgetConfigGateway,
};

/// Interactive editor REPL
pub struct EditorRepl<G: WidgetConfigGateway + 'static> {
    session: Arc<EditorSession<G>>,
    dispatcher: CommandDispatcher,
}

impl<G: WidgetConfigGateway + 'static> EditorRepl<G> {
    pub fn new(session: Arc<EditorSession<G>>) -> Self {
        Self {
            session,
            dispatcher: CommandDispatcher::new(),
        }
    }

    pub fn session(&self) -> &Arc<EditorSession<G>> {
        &self.session
    }

    /// Run the interactive REPL until the operator quits
    pub async fn run(&self) -> std::io::Result<()> {
        // Shortcuts stay routed to this session until the loop ends
        let _shortcuts = self.session.attach_shortcuts(&self.dispatcher);

        let edit_mode = Box::new(Emacs::new(keymap::editor_keybindings()));
        let mut line_editor = Reedline::create().with_edit_mode(edit_mode);

        self.print_welcome();

        loop {
            let prompt = self.prompt();
            match line_editor.read_line(&prompt) {
                Ok(Signal::Success(line)) => {
                    if let Some(chord) = keymap::parse_host_command(&line) {
                        debug!("Shortcut {:?}", chord);
                        self.dispatcher.dispatch_key(chord);
                        continue;
                    }
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match parse_command(line) {
                        Ok(command) => {
                            if self.execute(command).await {
                                break;
                            }
                        }
                        Err(message) => eprintln!("{}", message.red()),
                    }
                }
                Ok(Signal::CtrlC) => {
                    println!("^C");
                    continue;
                }
                Ok(Signal::CtrlD) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        self.session.close();
        Ok(())
    }

    /// Execute one command. Returns true if the REPL should exit.
    ///
    /// Failures are already reported by the session's notifier.
    pub async fn execute(&self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Set { field, value } => {
                if let Ok(outcome) = self.session.update_field(field, &value)
                    && outcome.field_errors.is_empty()
                {
                    let document = self.session.document();
                    println!(
                        "{} = {}",
                        field.path().cyan(),
                        ConsoleFormatter::format_value(field, &document)
                    );
                }
            }
            ReplCommand::Show => {
                println!("{}", ConsoleFormatter::format_snapshot(&self.session.snapshot()));
            }
            ReplCommand::ShowJson => {
                println!("{}", ConsoleFormatter::format_json(&self.session.document()));
            }
            ReplCommand::Errors => {
                print!("{}", ConsoleFormatter::format_errors(&self.session.errors()));
            }
            ReplCommand::Undo => {
                let _ = self.session.undo();
            }
            ReplCommand::Redo => {
                let _ = self.session.redo();
            }
            ReplCommand::Reset => self.session.reset(),
            ReplCommand::Load(id) => {
                if self.session.load(id).await.is_ok() {
                    println!("{}", ConsoleFormatter::format_snapshot(&self.session.snapshot()));
                }
            }
            ReplCommand::Save => {
                if let Ok(SaveReport { id, created: true, .. }) = self.session.save().await {
                    println!("{} {}", "Created record".dimmed(), format!("#{id}").bold());
                }
            }
            ReplCommand::Validate { remote: false } => {
                let _ = self.session.validate();
            }
            ReplCommand::Validate { remote: true } => {
                let _ = self.session.validate_remote().await;
            }
            ReplCommand::Test => {
                if let Ok(TestOutcome::Fallback) = self.session.test().await {
                    println!("{}", "Set aiModel to test a live model.".dimmed());
                }
            }
            ReplCommand::Duplicate(name) => {
                if let Ok(id) = self.session.duplicate(&name).await {
                    println!("{} {}", "Copy stored as".dimmed(), format!("#{id}").bold());
                }
            }
            ReplCommand::Section(section) => {
                self.session.set_active_section(section);
                let snapshot = self.session.snapshot();
                print!(
                    "{}",
                    ConsoleFormatter::format_section(
                        section,
                        &snapshot.document,
                        &snapshot.errors,
                        true
                    )
                );
            }
            ReplCommand::Fields => print!("{}", ConsoleFormatter::format_field_help()),
            ReplCommand::Help => self.print_help(),
            ReplCommand::Quit => {
                if self.session.is_dirty() {
                    println!("{}", "Discarding unsaved changes.".yellow());
                }
                println!("Bye!");
                return true;
            }
        }
        false
    }

    fn prompt(&self) -> DefaultPrompt {
        let snapshot = self.session.snapshot();
        let marker = if snapshot.dirty { "*" } else { "" };
        DefaultPrompt::new(
            DefaultPromptSegment::Basic(format!(
                "widgetdesk:{}{}",
                snapshot.active_section, marker
            )),
            DefaultPromptSegment::Empty,
        )
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│        widgetdesk - Widget Editor           │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        self.print_help();
    }

    fn print_help(&self) {
        println!("Commands:");
        println!("  set <field> <value>   - Change a field (see: fields)");
        println!("  show [json]           - Show the current configuration");
        println!("  errors                - List validation errors");
        println!("  undo, redo, reset     - Step through or reset history");
        println!("  load <id>             - Load a stored configuration");
        println!("  save                  - Validate and save");
        println!("  validate [remote]     - Validate without saving");
        println!("  test                  - Test the widget with its AI model");
        println!("  duplicate <name>      - Copy the saved configuration");
        println!("  section <name>        - Switch section (templates, design, behavior, controls)");
        println!("  help, quit");
        println!();
        println!("Shortcuts: Ctrl+Z undo, Ctrl+Shift+Z / Ctrl+Y redo, Ctrl+S save");
        println!();
    }
}
