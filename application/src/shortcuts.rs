//! Keyboard command dispatch
//!
//! The host (terminal, window) resolves key chords into [`EditorCommand`]s
//! and hands them to whichever session is registered. Registration is
//! explicit and scoped: dropping the [`ShortcutRegistration`] detaches it,
//! so a closed editor never keeps receiving shortcuts.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::mpsc;
use tracing::debug;
use widgetdesk_domain::{EditorCommand, KeyChord};

type Slot = Mutex<Option<Listener>>;

struct Listener {
    id: u64,
    sender: mpsc::UnboundedSender<EditorCommand>,
}

/// Routes resolved commands to the single registered listener
pub struct CommandDispatcher {
    slot: Arc<Slot>,
    next_id: AtomicU64,
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a listener, replacing any previous one
    pub fn register(&self) -> (ShortcutRegistration, mpsc::UnboundedReceiver<EditorCommand>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::unbounded_channel();
        *lock(&self.slot) = Some(Listener { id, sender });
        debug!("Registered shortcut listener {}", id);
        let registration = ShortcutRegistration {
            id,
            slot: Arc::downgrade(&self.slot),
        };
        (registration, receiver)
    }

    pub fn is_registered(&self) -> bool {
        lock(&self.slot).is_some()
    }

    /// Resolve `chord` and deliver the command it maps to.
    ///
    /// Returns the delivered command, or `None` when the chord is unbound
    /// or nobody is listening.
    pub fn dispatch_key(&self, chord: KeyChord) -> Option<EditorCommand> {
        let command = chord.command()?;
        self.dispatch(command).then_some(command)
    }

    /// Deliver `command` to the registered listener
    pub fn dispatch(&self, command: EditorCommand) -> bool {
        let mut slot = lock(&self.slot);
        let Some(listener) = slot.as_ref() else {
            return false;
        };
        if listener.sender.send(command).is_ok() {
            return true;
        }
        debug!("Shortcut listener {} went away", listener.id);
        *slot = None;
        false
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a listener registered until dropped
#[must_use = "dropping the registration detaches the listener"]
pub struct ShortcutRegistration {
    id: u64,
    slot: Weak<Slot>,
}

impl ShortcutRegistration {
    /// Detach now rather than at end of scope
    pub fn unregister(self) {}
}

impl Drop for ShortcutRegistration {
    fn drop(&mut self) {
        let Some(slot) = self.slot.upgrade() else {
            return;
        };
        let mut slot = lock(&slot);
        // A newer registration may have replaced this one
        if slot.as_ref().is_some_and(|listener| listener.id == self.id) {
            *slot = None;
            debug!("Unregistered shortcut listener {}", self.id);
        }
    }
}

fn lock(slot: &Slot) -> MutexGuard<'_, Option<Listener>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
