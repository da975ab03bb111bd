// Jobs module - Background tasks

pub mod reminder_scanner;

pub use reminder_scanner::{ReminderScanner, ReminderScheduler, ScanStats};
