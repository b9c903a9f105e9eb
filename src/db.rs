use log::debug;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::error::EngineResult;

/// Opens the pool and makes sure the schema exists.
pub async fn connect(database_url: &str) -> EngineResult<SqlitePool> {
    let pool = SqlitePoolOptions::new().connect(database_url).await?;
    init_schema(&pool).await?;
    debug!("database ready at {}", database_url);
    Ok(pool)
}

async fn init_schema(pool: &SqlitePool) -> EngineResult<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS bookings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            client_ref INTEGER NOT NULL,
            service_ref TEXT NOT NULL,
            date TEXT NOT NULL,
            start_time TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL,
            price INTEGER NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS closed_slots (
            date TEXT NOT NULL,
            time TEXT,
            PRIMARY KEY (date, time)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS working_hours (
            open_time TEXT NOT NULL,
            close_time TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    // a single connection keeps every statement on the same in-memory
    // database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    init_schema(&pool).await.expect("schema init");
    pool
}
