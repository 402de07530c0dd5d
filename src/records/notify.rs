//! Notification and confirmation collaborators

use std::fmt;
use std::io::{BufRead, Write};
use std::sync::Mutex;

/// Severity of a transient user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationLevel::Success => write!(f, "success"),
            NotificationLevel::Warning => write!(f, "warning"),
        }
    }
}

/// Displays transient messages to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, level: NotificationLevel);
}

/// Sends notifications to the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, level: NotificationLevel) {
        match level {
            NotificationLevel::Success => tracing::info!(level = %level, "{}", message),
            NotificationLevel::Warning => tracing::warn!(level = %level, "{}", message),
        }
    }
}

/// Prints notifications to stdout, toast style
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, level: NotificationLevel) {
        let icon = match level {
            NotificationLevel::Success => "✓",
            NotificationLevel::Warning => "⚠",
        };
        println!("{} {}", icon, message);
    }
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Mutex<Vec<(String, NotificationLevel)>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(String, NotificationLevel)> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<(String, NotificationLevel)> {
        self.entries().pop()
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, message: &str, level: NotificationLevel) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((message.to_string(), level));
        }
    }
}

/// Blocking yes/no prompt.
///
/// `confirm` may block the calling thread; [`RecordManager`](super::RecordManager)
/// calls it from `tokio::task::spawn_blocking`.
pub trait Confirmer: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Answers every prompt the same way
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirmer for FixedAnswer {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

/// Asks on stdout and reads the answer from stdin
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirmer;

impl Confirmer for StdinConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        ask(prompt, &mut stdin.lock(), &mut stdout.lock())
    }
}

/// Write the prompt, read one line, accept `y`/`yes` (any case)
pub fn ask<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> bool {
    if write!(output, "{} [y/N] ", prompt).and_then(|_| output.flush()).is_err() {
        return false;
    }

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(_) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
