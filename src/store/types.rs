use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One reconciled calendar event. Dates are whole calendar days; time of day
/// and timezone are out of scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Stable identifier supplied by the remote feed; primary key.
    pub uid: String,
    pub summary: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Internal row type for the `events` table, where day-granularity dates
/// live in TIMESTAMP columns as midnight values.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct EventDbRow {
    pub uid: String,
    pub summary: String,
    pub dtstart: NaiveDateTime,
    pub dtend: NaiveDateTime,
}

impl EventDbRow {
    pub(crate) fn into_record(self) -> EventRecord {
        EventRecord {
            uid: self.uid,
            summary: self.summary,
            start: self.dtstart.date(),
            end: self.dtend.date(),
        }
    }
}

impl EventRecord {
    pub(crate) fn start_timestamp(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    pub(crate) fn end_timestamp(&self) -> NaiveDateTime {
        self.end.and_time(NaiveTime::MIN)
    }
}
