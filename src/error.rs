use std::fmt;

use chrono::NaiveTime;
use thiserror::Error;

/// Errors produced by the booking engine.
///
/// The `Invalid*` variants reject malformed input before any shared state is
/// touched. `NotAvailable`, `Conflict` and `NotFound` are expected outcomes
/// the caller renders back to the user. `Storage` wraps infrastructure
/// faults and is never folded into any of the other kinds.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid time: {0}")]
    InvalidTime(String),

    #[error("opening time {open} must be before closing time {close}")]
    InvalidRange { open: NaiveTime, close: NaiveTime },

    #[error("duration must be positive, got {0} minutes")]
    InvalidDuration(i64),

    #[error("slot granularity must be positive")]
    InvalidGranularity,

    #[error("invalid calendar input: year {year}, month {month}")]
    InvalidCalendarInput { year: i32, month: u32 },

    #[error("slot not available: {reason}")]
    NotAvailable { reason: NotAvailableReason },

    #[error("slot already taken by an overlapping booking")]
    Conflict,

    #[error("booking not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Why a reservation was refused before it ever reached the conflict check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotAvailableReason {
    WeeklyOffDay,
    DayClosed,
    SlotClosed,
}

impl fmt::Display for NotAvailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotAvailableReason::WeeklyOffDay => write!(f, "weekly day off"),
            NotAvailableReason::DayClosed => write!(f, "day is closed"),
            NotAvailableReason::SlotClosed => write!(f, "slot is closed"),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
