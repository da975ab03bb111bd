use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

use crate::clock::Clock;
use crate::db::RevisionStore;
use crate::error::AppError;
use crate::models::revision::format_reminder_date;
use crate::services::notifier::{Notifier, ReminderEmail};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub matched: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Finds the revisions due today and sends one reminder per record.
///
/// Records are never marked as notified: scanning twice on the same date
/// notifies the same recipients twice.
#[derive(Clone)]
pub struct ReminderScanner {
    store: Arc<dyn RevisionStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl ReminderScanner {
    pub fn new(
        store: Arc<dyn RevisionStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
        }
    }

    /// Runs one scan. Fails only when the store query fails, in which case
    /// no reminder is attempted.
    pub async fn scan(&self) -> Result<ScanStats, AppError> {
        let today = format_reminder_date(self.clock.today());

        tracing::info!(today = %today, "Starting reminder scan");

        let due = self.store.find_by_reminder(&today).await?;

        let mut stats = ScanStats {
            matched: due.len(),
            ..ScanStats::default()
        };

        if due.is_empty() {
            tracing::info!(today = %today, "No reminders for today");
            return Ok(stats);
        }

        // All sends are in flight before any is awaited
        let dispatches: Vec<_> = due
            .iter()
            .map(|revision| {
                let notifier = Arc::clone(&self.notifier);
                let reminder = ReminderEmail::from(revision);
                tokio::spawn(async move {
                    let result = notifier.notify(&reminder).await;
                    (reminder, result)
                })
            })
            .collect();

        for outcome in join_all(dispatches).await {
            match outcome {
                Ok((reminder, Ok(()))) => {
                    tracing::debug!(email = %reminder.email, "Reminder delivered");
                    stats.delivered += 1;
                }
                Ok((reminder, Err(e))) => {
                    tracing::error!(
                        email = %reminder.email,
                        error = %e,
                        "Reminder delivery failed"
                    );
                    stats.failed += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Reminder dispatch task aborted");
                    stats.failed += 1;
                }
            }
        }

        tracing::info!(?stats, "Reminder scan completed");

        Ok(stats)
    }

    /// Scan entry point for the timer: failures are logged, never propagated.
    pub async fn run(&self) -> Option<ScanStats> {
        match self.scan().await {
            Ok(stats) => Some(stats),
            Err(e) => {
                tracing::error!(error = %e, "Error checking reminders");
                None
            }
        }
    }
}

/// Owns the daily timer that drives a [`ReminderScanner`].
///
/// The schedule is a seconds-first cron expression evaluated in UTC. Missed
/// triggers (process down at trigger time) are not replayed.
pub struct ReminderScheduler {
    scheduler: JobScheduler,
    scanner: ReminderScanner,
    schedule: String,
    job_id: Option<Uuid>,
}

impl ReminderScheduler {
    pub async fn new(
        scanner: ReminderScanner,
        schedule: impl Into<String>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            scheduler: JobScheduler::new().await?,
            scanner,
            schedule: schedule.into(),
            job_id: None,
        })
    }

    /// Registers the scan job and starts the timer
    pub async fn start(&mut self) -> Result<(), AppError> {
        if self.job_id.is_some() {
            return Ok(());
        }

        let scanner = self.scanner.clone();
        let job = Job::new_async_tz(self.schedule.as_str(), Utc, move |_id, _lock| {
            let scanner = scanner.clone();
            Box::pin(async move {
                scanner.run().await;
            })
        })?;

        let job_id = self.scheduler.add(job).await?;
        self.scheduler.start().await?;
        self.job_id = Some(job_id);

        tracing::info!(schedule = %self.schedule, %job_id, "Reminder scheduler started");

        Ok(())
    }

    /// Runs the scan exactly as a timer firing would
    pub async fn trigger(&self) -> Option<ScanStats> {
        self.scanner.run().await
    }

    pub fn is_running(&self) -> bool {
        self.job_id.is_some()
    }

    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        if self.job_id.take().is_some() {
            self.scheduler.shutdown().await?;
            tracing::info!("Reminder scheduler stopped");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::db::MemoryRevisionStore;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct NoopNotifier;

    #[async_trait]
    impl Notifier for NoopNotifier {
        async fn notify(&self, _reminder: &ReminderEmail) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn scanner() -> ReminderScanner {
        ReminderScanner::new(
            Arc::new(MemoryRevisionStore::new()),
            Arc::new(NoopNotifier),
            Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())),
        )
    }

    #[tokio::test]
    async fn test_empty_store_scan() {
        let stats = scanner().scan().await.unwrap();
        assert_eq!(stats, ScanStats::default());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_invalid_schedule_rejected() {
        let mut scheduler = ReminderScheduler::new(scanner(), "not a cron").await.unwrap();

        let result = scheduler.start().await;

        assert!(matches!(result, Err(AppError::Scheduler(_))));
        assert!(!scheduler.is_running());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_start_and_shutdown() {
        let mut scheduler = ReminderScheduler::new(scanner(), crate::config::DEFAULT_REMINDER_CRON)
            .await
            .unwrap();

        scheduler.start().await.unwrap();
        assert!(scheduler.is_running());

        scheduler.shutdown().await.unwrap();
        assert!(!scheduler.is_running());
    }
}
