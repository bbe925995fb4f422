//! Interactive widget editor
//!
//! A line-oriented REPL over one [`EditorSession`](widgetdesk_application::EditorSession),
//! with undo/redo/save shortcuts bound in the line editor.

pub mod command;
pub mod keymap;
pub mod repl;

pub use command::{ReplCommand, parse_command};
pub use repl::EditorRepl;
