use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use log::{info, warn};
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::calendar::minutes_from_midnight;
use crate::error::{EngineError, EngineResult};
use crate::models::{Booking, SlotRequest};

/// Authoritative set of confirmed bookings.
///
/// `reserve` and `cancel` targeting the same date are serialized through a
/// lock table keyed by date, so a check-then-insert sequence can never
/// interleave with another writer on that date. Read-only listings go
/// straight to storage. The struct is deliberately not `Clone`: a second
/// lock table would defeat the serialization.
pub struct BookingLedger {
    pool: SqlitePool,
    date_locks: Mutex<HashMap<NaiveDate, Arc<Mutex<()>>>>,
}

impl BookingLedger {
    pub fn new(pool: SqlitePool) -> Self {
        BookingLedger {
            pool,
            date_locks: Mutex::new(HashMap::new()),
        }
    }

    async fn date_lock(&self, date: NaiveDate) -> Arc<Mutex<()>> {
        let mut locks = self.date_locks.lock().await;
        locks
            .entry(date)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Bookings on `date`, earliest first.
    pub async fn list_for_date(&self, date: NaiveDate) -> EngineResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>(
            "SELECT id, client_ref, service_ref, date, start_time, duration_minutes, price
             FROM bookings WHERE date = ? ORDER BY start_time",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// A client's bookings, most recent first.
    pub async fn list_for_client(&self, client_ref: i64) -> EngineResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>(
            "SELECT id, client_ref, service_ref, date, start_time, duration_minutes, price
             FROM bookings WHERE client_ref = ? ORDER BY date DESC, start_time DESC",
        )
        .bind(client_ref)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: i64) -> EngineResult<Option<Booking>> {
        let row = sqlx::query_as::<_, Booking>(
            "SELECT id, client_ref, service_ref, date, start_time, duration_minutes, price
             FROM bookings WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Checks `req` against every booking on its date and commits it when no
    /// interval overlaps, as one unit with respect to other writers on that
    /// date. Returns `Conflict` when the slot is already taken; the caller
    /// should re-run availability rather than retry the same slot.
    pub async fn reserve(&self, req: &SlotRequest) -> EngineResult<Booking> {
        if req.duration_minutes <= 0 {
            return Err(EngineError::InvalidDuration(req.duration_minutes));
        }

        let lock = self.date_lock(req.date).await;
        let _guard = lock.lock().await;

        let existing = self.list_for_date(req.date).await?;
        if existing.iter().any(|b| {
            overlaps(
                req.start_time,
                req.duration_minutes,
                b.start_time,
                b.duration_minutes,
            )
        }) {
            warn!(
                "reservation conflict on {} at {}",
                req.date, req.start_time
            );
            return Err(EngineError::Conflict);
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO bookings (client_ref, service_ref, date, start_time, duration_minutes, price)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(req.client_ref)
        .bind(&req.service_ref)
        .bind(req.date)
        .bind(req.start_time)
        .bind(req.duration_minutes)
        .bind(req.price)
        .fetch_one(&self.pool)
        .await?;

        info!("booking {} committed for {} at {}", id, req.date, req.start_time);
        Ok(Booking {
            id,
            client_ref: req.client_ref,
            service_ref: req.service_ref.clone(),
            date: req.date,
            start_time: req.start_time,
            duration_minutes: req.duration_minutes,
            price: req.price,
        })
    }

    /// Removes a booking and returns the removed record so the caller can
    /// notify its owner.
    pub async fn cancel(&self, id: i64) -> EngineResult<Booking> {
        let booking = self.find_by_id(id).await?.ok_or(EngineError::NotFound)?;

        let lock = self.date_lock(booking.date).await;
        let _guard = lock.lock().await;

        let deleted = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if deleted.rows_affected() == 0 {
            // lost to a concurrent cancel between lookup and delete
            return Err(EngineError::NotFound);
        }
        info!("booking {} cancelled", id);
        Ok(booking)
    }
}

/// Half-open interval test: `[s1, s1+d1)` against `[s2, s2+d2)`. Bookings
/// that touch exactly at a boundary do not conflict.
pub fn overlaps(s1: NaiveTime, d1: i64, s2: NaiveTime, d2: i64) -> bool {
    let a = minutes_from_midnight(s1);
    let b = minutes_from_midnight(s2);
    a < b + d2 && b < a + d1
}
