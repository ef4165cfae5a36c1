//! Tutor blackout windows.
//!
//! Exceptions are advisory only: they are stored and returned with the
//! tutor's availability, but never block slot creation or booking.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use tutorhub_core::types::{ExceptionId, SubjectId};
use tutorhub_core::{AppError, AppResult};

use crate::time_format;

/// A stored blackout window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityException {
    pub id: ExceptionId,
    pub tutor_id: SubjectId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, with = "time_format::option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "time_format::option")]
    pub end_time: Option<NaiveTime>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for a new blackout window. A missing end date means a single day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionSpec {
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default, with = "time_format::option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "time_format::option")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl ExceptionSpec {
    /// Validate the range and build the stored record.
    pub fn into_exception(
        self,
        tutor_id: SubjectId,
        now: DateTime<Utc>,
    ) -> AppResult<AvailabilityException> {
        let end_date = self.end_date.unwrap_or(self.start_date);
        if end_date < self.start_date {
            return Err(AppError::validation("Exception end date precedes its start"));
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time)
            && end <= start
        {
            return Err(AppError::validation("Exception end time must follow its start"));
        }

        Ok(AvailabilityException {
            id: ExceptionId::new(),
            tutor_id,
            start_date: self.start_date,
            end_date,
            start_time: self.start_time,
            end_time: self.end_time,
            reason: self.reason.filter(|r| !r.trim().is_empty()),
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_day_default() {
        let spec: ExceptionSpec =
            serde_json::from_str(r#"{"startDate":"2026-12-24","reason":"Holiday"}"#).unwrap();
        let exc = spec.into_exception(SubjectId::new("tut-1"), Utc::now()).unwrap();
        assert_eq!(exc.start_date, exc.end_date);
        assert_eq!(exc.reason.as_deref(), Some("Holiday"));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let spec: ExceptionSpec =
            serde_json::from_str(r#"{"startDate":"2026-12-24","endDate":"2026-12-20"}"#).unwrap();
        assert!(spec.into_exception(SubjectId::new("tut-1"), Utc::now()).is_err());
    }
}
