use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A confirmed appointment. `id` is assigned by the ledger on commit and is
/// unique across the lifetime of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub client_ref: i64,
    pub service_ref: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    pub price: i64,
}

/// Daily opening window; `open` is always strictly before `close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct WorkingHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

/// An admin-imposed closure: the whole day when `time` is `None`, otherwise
/// a single start time on that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ClosedSlot {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

/// A reservation candidate as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRequest {
    pub client_ref: i64,
    pub service_ref: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    pub price: i64,
}
