use chrono::{NaiveDate, NaiveTime};
use log::info;
use sqlx::SqlitePool;

use crate::error::EngineResult;
use crate::models::ClosedSlot;

/// Admin-imposed closures, whole days and single start times.
///
/// Reopening a day removes only the whole-day entry; per-slot closures on
/// that date stay in force until `open_slot` removes them one by one. The
/// weekly day off is not stored here; callers exclude it separately.
#[derive(Debug, Clone)]
pub struct ClosureRegistry {
    pool: SqlitePool,
}

impl ClosureRegistry {
    pub fn new(pool: SqlitePool) -> Self {
        ClosureRegistry { pool }
    }

    /// Closes the whole day. Idempotent.
    pub async fn close_day(&self, date: NaiveDate) -> EngineResult<()> {
        // SQLite treats NULLs in a composite key as distinct, so a plain
        // INSERT OR IGNORE would stack duplicate whole-day rows.
        sqlx::query(
            "INSERT INTO closed_slots (date, time)
             SELECT ?, NULL
             WHERE NOT EXISTS (SELECT 1 FROM closed_slots WHERE date = ? AND time IS NULL)",
        )
        .bind(date)
        .bind(date)
        .execute(&self.pool)
        .await?;
        info!("closed whole day {}", date);
        Ok(())
    }

    /// Closes one start time. Idempotent; the time does not have to fall
    /// inside working hours.
    pub async fn close_slot(&self, date: NaiveDate, time: NaiveTime) -> EngineResult<()> {
        sqlx::query("INSERT OR IGNORE INTO closed_slots (date, time) VALUES (?, ?)")
            .bind(date)
            .bind(time)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Removes the whole-day entry only.
    pub async fn open_day(&self, date: NaiveDate) -> EngineResult<()> {
        sqlx::query("DELETE FROM closed_slots WHERE date = ? AND time IS NULL")
            .bind(date)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn open_slot(&self, date: NaiveDate, time: NaiveTime) -> EngineResult<()> {
        sqlx::query("DELETE FROM closed_slots WHERE date = ? AND time = ?")
            .bind(date)
            .bind(time)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn is_day_closed(&self, date: NaiveDate) -> EngineResult<bool> {
        let row = sqlx::query("SELECT 1 FROM closed_slots WHERE date = ? AND time IS NULL")
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// True when the time itself is closed or the whole day is.
    pub async fn is_slot_closed(&self, date: NaiveDate, time: NaiveTime) -> EngineResult<bool> {
        if self.is_day_closed(date).await? {
            return Ok(true);
        }
        let row = sqlx::query("SELECT 1 FROM closed_slots WHERE date = ? AND time = ?")
            .bind(date)
            .bind(time)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// All closures ordered by date, whole-day entries before timed ones.
    pub async fn list(&self) -> EngineResult<Vec<ClosedSlot>> {
        let rows = sqlx::query_as::<_, ClosedSlot>(
            "SELECT date, time FROM closed_slots ORDER BY date, time",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
