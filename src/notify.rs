use colored::*;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub description: Option<String>,
}

impl Notification {
    pub fn success(title: &str, description: Option<&str>) -> Self {
        Notification {
            level: Level::Success,
            title: title.to_string(),
            description: description.map(str::to_string),
        }
    }

    pub fn error(title: &str, description: Option<&str>) -> Self {
        Notification {
            level: Level::Error,
            title: title.to_string(),
            description: description.map(str::to_string),
        }
    }
}

/// Fire-and-forget one-line messages. Callers never look at the outcome.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Prints notifications to stderr so stdout only carries results.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let title = match notification.level {
            Level::Success => notification.title.green().bold(),
            Level::Error => notification.title.red().bold(),
        };
        match notification.description {
            Some(description) => eprintln!("{title}: {description}"),
            None => eprintln!("{title}"),
        }
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    received: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn take(&self) -> Vec<Notification> {
        match self.received.lock() {
            Ok(mut received) => std::mem::take(&mut *received),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        match self.received.lock() {
            Ok(mut received) => received.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}
