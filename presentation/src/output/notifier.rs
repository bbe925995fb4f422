//! Console implementation of the notification port

use super::console::ConsoleFormatter;
use std::io::Write;
use std::sync::Mutex;
use widgetdesk_application::{EditorNotifier, Notice, NoticeLevel};

/// Prints notices to the terminal as they are raised.
///
/// Errors and warnings go to stderr; everything else to stdout.
pub struct ConsoleNotifier {
    quiet: bool,
    last: Mutex<Option<Notice>>,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self {
            quiet: false,
            last: Mutex::new(None),
        }
    }

    /// Record notices without printing them
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::new()
        }
    }

    /// The most recent notice, if any
    pub fn last(&self) -> Option<Notice> {
        self.last.lock().ok().and_then(|last| last.clone())
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorNotifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        if !self.quiet {
            let line = ConsoleFormatter::format_notice(&notice);
            match notice.level {
                NoticeLevel::Error | NoticeLevel::Warning => {
                    let _ = writeln!(std::io::stderr(), "{}", line);
                }
                NoticeLevel::Success | NoticeLevel::Info => {
                    let _ = writeln!(std::io::stdout(), "{}", line);
                }
            }
        }
        if let Ok(mut last) = self.last.lock() {
            *last = Some(notice);
        }
    }
}
