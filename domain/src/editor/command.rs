//! Editor commands and the keyboard chords that trigger them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Command the host UI can dispatch to an editing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorCommand {
    Undo,
    Redo,
    Save,
}

impl EditorCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorCommand::Undo => "undo",
            EditorCommand::Redo => "redo",
            EditorCommand::Save => "save",
        }
    }
}

impl fmt::Display for EditorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key press with modifier state, independent of any terminal or browser API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: char,
    pub ctrl: bool,
    /// Cmd on macOS, Super/Win elsewhere
    pub meta: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn new(key: char) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            shift: false,
        }
    }

    pub fn ctrl(key: char) -> Self {
        Self {
            ctrl: true,
            ..Self::new(key)
        }
    }

    pub fn meta(key: char) -> Self {
        Self {
            meta: true,
            ..Self::new(key)
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Resolve the chord to an editor command.
    ///
    /// - Ctrl/Cmd+Z: undo
    /// - Ctrl/Cmd+Shift+Z, Ctrl/Cmd+Y: redo
    /// - Ctrl/Cmd+S: save
    pub fn command(&self) -> Option<EditorCommand> {
        if !(self.ctrl || self.meta) {
            return None;
        }
        // Terminals report Shift+z as 'Z'
        let shift = self.shift || self.key.is_ascii_uppercase();
        match self.key.to_ascii_lowercase() {
            'z' if shift => Some(EditorCommand::Redo),
            'z' => Some(EditorCommand::Undo),
            'y' if !shift => Some(EditorCommand::Redo),
            's' if !shift => Some(EditorCommand::Save),
            _ => None,
        }
    }
}
