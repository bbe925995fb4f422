//! Keyboard shortcuts of the interactive editor
//!
//! Shortcut chords are bound in the line editor as host commands. The line
//! editor hands them back as an encoded line, which is decoded into a
//! [`KeyChord`] and dispatched like any other key press.

use reedline::{KeyCode, KeyModifiers, Keybindings, ReedlineEvent, default_emacs_keybindings};
use widgetdesk_domain::KeyChord;

const HOST_COMMAND_PREFIX: &str = "\u{1b}[widgetdesk-key ";

/// Chords bound as editor shortcuts
pub fn shortcut_keys() -> Vec<(KeyModifiers, KeyCode)> {
    let ctrl_shift = KeyModifiers::CONTROL | KeyModifiers::SHIFT;
    vec![
        (KeyModifiers::CONTROL, KeyCode::Char('z')),
        (ctrl_shift, KeyCode::Char('z')),
        (ctrl_shift, KeyCode::Char('Z')),
        (KeyModifiers::CONTROL, KeyCode::Char('y')),
        (KeyModifiers::CONTROL, KeyCode::Char('s')),
    ]
}

/// Translate a key press into a terminal-independent chord
pub fn chord_from_key(modifiers: KeyModifiers, code: KeyCode) -> Option<KeyChord> {
    let KeyCode::Char(key) = code else {
        return None;
    };
    Some(KeyChord {
        key,
        ctrl: modifiers.contains(KeyModifiers::CONTROL),
        meta: modifiers.intersects(KeyModifiers::SUPER | KeyModifiers::META),
        shift: modifiers.contains(KeyModifiers::SHIFT),
    })
}

/// Encode a chord as the line the editor returns for it
pub fn host_command(chord: &KeyChord) -> String {
    let mut flags = String::new();
    for (set, flag) in [(chord.ctrl, 'c'), (chord.meta, 'm'), (chord.shift, 's')] {
        if set {
            flags.push(flag);
        }
    }
    format!("{HOST_COMMAND_PREFIX}{flags}:{}", chord.key)
}

/// Decode a line produced by [`host_command`]
pub fn parse_host_command(line: &str) -> Option<KeyChord> {
    let (flags, key) = line.strip_prefix(HOST_COMMAND_PREFIX)?.split_once(':')?;
    let mut chars = key.chars();
    let (Some(key), None) = (chars.next(), chars.next()) else {
        return None;
    };
    Some(KeyChord {
        key,
        ctrl: flags.contains('c'),
        meta: flags.contains('m'),
        shift: flags.contains('s'),
    })
}

/// Emacs-style bindings with the editor shortcuts layered on top
pub fn editor_keybindings() -> Keybindings {
    let mut keybindings = default_emacs_keybindings();
    for (modifiers, code) in shortcut_keys() {
        if let Some(chord) = chord_from_key(modifiers, code) {
            keybindings.add_binding(
                modifiers,
                code,
                ReedlineEvent::ExecuteHostCommand(host_command(&chord)),
            );
        }
    }
    keybindings
}
