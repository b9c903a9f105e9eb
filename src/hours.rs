use chrono::NaiveTime;
use log::info;
use sqlx::SqlitePool;

use crate::error::{EngineError, EngineResult};
use crate::models::WorkingHours;

/// Process-wide opening window, stored as a single row. Reads fall back to
/// the documented 09:00-19:00 default until an admin sets a value.
#[derive(Debug, Clone)]
pub struct WorkingHoursPolicy {
    pool: SqlitePool,
}

impl WorkingHoursPolicy {
    pub fn new(pool: SqlitePool) -> Self {
        WorkingHoursPolicy { pool }
    }

    pub async fn get(&self) -> EngineResult<WorkingHours> {
        let row = sqlx::query_as::<_, WorkingHours>(
            "SELECT open_time AS open, close_time AS close FROM working_hours",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.unwrap_or_else(default_hours))
    }

    /// Replaces the window, last write wins. Fails with `InvalidRange` when
    /// `open` is not strictly before `close`.
    pub async fn set(&self, open: NaiveTime, close: NaiveTime) -> EngineResult<()> {
        if open >= close {
            return Err(EngineError::InvalidRange { open, close });
        }
        let updated = sqlx::query("UPDATE working_hours SET open_time = ?, close_time = ?")
            .bind(open)
            .bind(close)
            .execute(&self.pool)
            .await?;
        if updated.rows_affected() == 0 {
            sqlx::query("INSERT INTO working_hours (open_time, close_time) VALUES (?, ?)")
                .bind(open)
                .bind(close)
                .execute(&self.pool)
                .await?;
        }
        info!("working hours set to {} - {}", open, close);
        Ok(())
    }
}

fn default_hours() -> WorkingHours {
    WorkingHours {
        open: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        close: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[tokio::test]
    async fn get_returns_default_until_set() {
        let policy = WorkingHoursPolicy::new(test_pool().await);
        let hours = policy.get().await.unwrap();
        assert_eq!(hours.open, time(9, 0));
        assert_eq!(hours.close, time(19, 0));
    }

    #[tokio::test]
    async fn set_replaces_the_single_row() {
        let policy = WorkingHoursPolicy::new(test_pool().await);

        policy.set(time(10, 0), time(18, 0)).await.unwrap();
        let hours = policy.get().await.unwrap();
        assert_eq!(hours.open, time(10, 0));
        assert_eq!(hours.close, time(18, 0));

        // last write wins
        policy.set(time(8, 30), time(20, 0)).await.unwrap();
        let hours = policy.get().await.unwrap();
        assert_eq!(hours.open, time(8, 30));
        assert_eq!(hours.close, time(20, 0));
    }

    #[tokio::test]
    async fn rejects_inverted_and_empty_windows() {
        let policy = WorkingHoursPolicy::new(test_pool().await);

        assert!(matches!(
            policy.set(time(19, 0), time(9, 0)).await,
            Err(EngineError::InvalidRange { .. })
        ));
        assert!(matches!(
            policy.set(time(12, 0), time(12, 0)).await,
            Err(EngineError::InvalidRange { .. })
        ));

        // the stored value is untouched after a rejected set
        let hours = policy.get().await.unwrap();
        assert_eq!(hours.open, time(9, 0));
    }
}
