//! Error types for meeting-engine operations.
//!
//! Every variant is a client-input error: nothing here is retried and nothing is
//! fatal. Validation always runs before mutation, so a failed call leaves the
//! store exactly as it was.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{MeetingId, UserId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("No user with id {0} is registered")]
    UnknownUser(UserId),

    #[error("No meeting with id {0} is registered")]
    UnknownMeeting(MeetingId),

    #[error("User with id {user} is not invited to meeting with id {meeting}")]
    NotInvited { user: UserId, meeting: MeetingId },

    #[error("Invalid interval: start {start} must be before end {end}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid period: {period_seconds}s must exceed the meeting duration of {duration_seconds}s")]
    InvalidPeriod {
        period_seconds: i64,
        duration_seconds: i64,
    },

    #[error("Invalid duration: {0}s must be positive")]
    InvalidDuration(i64),

    #[error("Username must not be empty")]
    InvalidUsername,

    #[error("User with name {0} is already registered")]
    DuplicateUsername(String),
}

impl ScheduleError {
    /// Stable machine-readable code, used in protocol error responses.
    pub fn code(&self) -> &'static str {
        match self {
            ScheduleError::UnknownUser(_) => "unknown_user",
            ScheduleError::UnknownMeeting(_) => "unknown_meeting",
            ScheduleError::NotInvited { .. } => "not_invited",
            ScheduleError::InvalidInterval { .. } => "invalid_interval",
            ScheduleError::InvalidPeriod { .. } => "invalid_period",
            ScheduleError::InvalidDuration(_) => "invalid_duration",
            ScheduleError::InvalidUsername => "invalid_username",
            ScheduleError::DuplicateUsername(_) => "duplicate_username",
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
