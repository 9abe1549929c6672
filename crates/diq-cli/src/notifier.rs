use colored::Colorize;
use diq_core::notification::{Notification, NotificationSink, Severity};

/// Prints notifications to the terminal; errors go to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotificationSink;

impl NotificationSink for TerminalNotificationSink {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Success => println!("{} {}", "✓".green().bold(), notification.message),
            Severity::Info => println!("{} {}", "i".cyan().bold(), notification.message),
            Severity::Error => eprintln!("{} {}", "✗".red().bold(), notification.message),
        }
    }
}
