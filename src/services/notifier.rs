use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::ExposeSecret;

use crate::config::Config;
use crate::error::AppError;
use crate::models::Revision;

pub const REMINDER_SUBJECT: &str = "Reminder Notification";

/// Content of one revision reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderEmail {
    pub email: String,
    pub reminder_date: String,
    pub page_range: String,
    pub difficulty: i64,
}

impl ReminderEmail {
    pub fn body(&self) -> String {
        format!(
            "This is a reminder for your revision from page {} with the difficulty of {} as scheduled on {}.",
            self.page_range, self.difficulty, self.reminder_date
        )
    }
}

impl From<&Revision> for ReminderEmail {
    fn from(revision: &Revision) -> Self {
        Self {
            email: revision.email.clone(),
            reminder_date: revision.reminder.clone(),
            page_range: revision.from_page_to_page.clone(),
            difficulty: revision.difficulty,
        }
    }
}

/// Delivers reminders to their recipients
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, reminder: &ReminderEmail) -> Result<(), AppError>;
}

/// Sends reminders through an authenticated SMTP relay
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailNotifier {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| AppError::Transport(format!("Invalid SMTP relay: {}", e)))?
            .credentials(credentials)
            .build();

        let from = config
            .mail_from
            .parse::<Mailbox>()
            .map_err(|e| AppError::Transport(format!("Invalid sender address: {}", e)))?;

        Ok(Self { transport, from })
    }
}

fn build_message(from: &Mailbox, reminder: &ReminderEmail) -> Result<Message, AppError> {
    let to = reminder
        .email
        .parse::<Mailbox>()
        .map_err(|e| AppError::Transport(format!("Invalid recipient {}: {}", reminder.email, e)))?;

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(REMINDER_SUBJECT)
        .header(ContentType::TEXT_PLAIN)
        .body(reminder.body())
        .map_err(|e| AppError::Transport(format!("Failed to build message: {}", e)))
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, reminder: &ReminderEmail) -> Result<(), AppError> {
        let result = match build_message(&self.from, reminder) {
            Ok(message) => self
                .transport
                .send(message)
                .await
                .map(|_| ())
                .map_err(|e| AppError::Transport(e.to_string())),
            Err(e) => Err(e),
        };

        match &result {
            Ok(()) => tracing::info!(email = %reminder.email, "Reminder email sent"),
            Err(e) => tracing::error!(email = %reminder.email, error = %e, "Error sending email"),
        }

        result
    }
}
