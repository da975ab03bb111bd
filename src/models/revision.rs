use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;

/// Storage and wire format of the reminder date (DD-MM-YYYY)
pub const REMINDER_DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub id: Uuid,
    #[serde(rename = "deviceID")]
    pub device_id: String,
    pub pages_read: i32,
    pub from_page_to_page: String,
    pub difficulty: i64,
    pub email: String,
    /// Sole deletion key, unique across all records
    pub token: String,
    /// Reminder date as DD-MM-YYYY, fixed at creation
    pub reminder: String,
    pub created_at: DateTime<Utc>,
}

/// A progress submission as sent by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRevision {
    pub pages_read: i32,
    pub from_page_to_page: String,
    pub difficulty: i64,
    #[serde(rename = "deviceID")]
    pub device_id: String,
    pub email: String,
}

impl Revision {
    /// Builds a record from a submission made at `now`, assigning a fresh
    /// token and the reminder date `now + difficulty weeks`.
    pub fn from_submission(data: NewRevision, now: DateTime<Utc>) -> Result<Self, AppError> {
        let reminder = reminder_date(now.date_naive(), data.difficulty)?;

        Ok(Self {
            id: Uuid::new_v4(),
            device_id: data.device_id,
            pages_read: data.pages_read,
            from_page_to_page: data.from_page_to_page,
            difficulty: data.difficulty,
            email: data.email,
            token: Uuid::new_v4().to_string(),
            reminder: format_reminder_date(reminder),
            created_at: now,
        })
    }
}

/// Date that lies `difficulty` weeks after `submitted_on`. Non-positive
/// difficulties are accepted and land on or before the submission date.
pub fn reminder_date(submitted_on: NaiveDate, difficulty: i64) -> Result<NaiveDate, AppError> {
    Duration::try_weeks(difficulty)
        .and_then(|offset| submitted_on.checked_add_signed(offset))
        .ok_or_else(|| {
            AppError::Validation(format!(
                "difficulty {} is outside the supported date range",
                difficulty
            ))
        })
}

pub fn format_reminder_date(date: NaiveDate) -> String {
    date.format(REMINDER_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn submission(difficulty: i64) -> NewRevision {
        NewRevision {
            pages_read: 10,
            from_page_to_page: "1-10".to_string(),
            difficulty,
            device_id: "dev1".to_string(),
            email: "a@x.com".to_string(),
        }
    }

    #[test]
    fn test_two_weeks_from_new_year() {
        let reminder = reminder_date(date(2024, 1, 1), 2).unwrap();
        assert_eq!(format_reminder_date(reminder), "15-01-2024");
    }

    #[test]
    fn test_offset_crosses_month_and_leap_day() {
        let reminder = reminder_date(date(2024, 2, 20), 1).unwrap();
        assert_eq!(format_reminder_date(reminder), "27-02-2024");

        let reminder = reminder_date(date(2024, 2, 26), 1).unwrap();
        assert_eq!(format_reminder_date(reminder), "04-03-2024");
    }

    #[test]
    fn test_non_positive_difficulty() {
        assert_eq!(reminder_date(date(2024, 1, 15), 0).unwrap(), date(2024, 1, 15));
        assert_eq!(reminder_date(date(2024, 1, 15), -2).unwrap(), date(2024, 1, 1));
    }

    #[test]
    fn test_out_of_range_difficulty() {
        let result = reminder_date(date(2024, 1, 1), i64::MAX);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_from_submission() {
        let now = date(2024, 1, 1).and_hms_opt(9, 30, 0).unwrap().and_utc();
        let revision = Revision::from_submission(submission(2), now).unwrap();

        assert_eq!(revision.reminder, "15-01-2024");
        assert_eq!(revision.device_id, "dev1");
        assert_eq!(revision.created_at, now);
        assert!(Uuid::parse_str(&revision.token).is_ok());
    }

    #[test]
    fn test_tokens_are_fresh() {
        let now = Utc::now();
        let first = Revision::from_submission(submission(1), now).unwrap();
        let second = Revision::from_submission(submission(1), now).unwrap();
        assert_ne!(first.token, second.token);
    }

    #[test]
    fn test_wire_field_names() {
        let parsed: NewRevision = serde_json::from_str(
            r#"{"pagesRead":10,"fromPageToPage":"1-10","difficulty":2,"deviceID":"dev1","email":"a@x.com"}"#,
        )
        .unwrap();
        assert_eq!(parsed.device_id, "dev1");
        assert_eq!(parsed.from_page_to_page, "1-10");

        let revision = Revision::from_submission(parsed, Utc::now()).unwrap();
        let json = serde_json::to_value(&revision).unwrap();
        assert_eq!(json["deviceID"], "dev1");
        assert_eq!(json["pagesRead"], 10);
        assert!(json.get("reminder").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
