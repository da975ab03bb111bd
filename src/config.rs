use secrecy::Secret;
use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 8089;
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_MAIL_FROM: &str = "\"No Reply\" <noreply@example.com>";
/// Every day at 11:00:00 (seconds-first cron, evaluated in UTC)
pub const DEFAULT_REMINDER_CRON: &str = "0 0 11 * * *";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Postgres connection string. Without it the in-memory store is used.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,

    // Outbound email (SMTP relay)
    pub smtp_host: String,
    pub smtp_username: String,
    pub smtp_password: Secret<String>,
    pub mail_from: String,

    pub reminder_cron: String,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        // Load .env file if it exists (for local development)
        let _ = dotenvy::dotenv();

        let config = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .build()?;

        Self::from_config(&config)
    }

    pub fn from_config(config: &config::Config) -> Result<Self, config::ConfigError> {
        Ok(Self {
            database_url: config
                .get::<String>("database_url")
                .ok()
                .filter(|url| !url.is_empty()),
            host: config.get("host").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: config.get("port").unwrap_or(DEFAULT_PORT),

            smtp_host: config
                .get("smtp_host")
                .unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string()),
            smtp_username: config.get("smtp_username")?,
            smtp_password: Secret::new(config.get("smtp_password")?),
            mail_from: config
                .get("mail_from")
                .unwrap_or_else(|_| DEFAULT_MAIL_FROM.to_string()),

            reminder_cron: config
                .get("reminder_cron")
                .unwrap_or_else(|_| DEFAULT_REMINDER_CRON.to_string()),
        })
    }
}
