//! Health check for the database behind a provider.

use sqlx::AnyPool;

/// Check that the database can be reached and answers a trivial query.
pub async fn health_check(pool: &AnyPool) -> Result<(), sqlx::Error> {
    let mut connection = pool.acquire().await?;
    let count: i64 = sqlx::query_scalar("SELECT CAST(1 AS BIGINT) AS count")
        .fetch_one(&mut *connection)
        .await?;

    if count == 1 {
        Ok(())
    } else {
        Err(sqlx::Error::Protocol(format!(
            "health check returned {count} instead of 1"
        )))
    }
}
