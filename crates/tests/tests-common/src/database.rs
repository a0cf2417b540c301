//! A throwaway SQLite database holding a small `people` table.

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

/// The rows of the `people` table: id, name, age and status.
pub const PEOPLE: &[(i64, &str, Option<i64>, Option<&str>)] = &[
    (1, "alice", Some(34), Some("active")),
    (2, "bob", Some(17), None),
    (3, "carol", Some(65), Some("retired")),
    (4, "dave", None, Some("active")),
    (5, "eve", Some(29), Some("suspended")),
    (6, "frank", Some(41), None),
    (7, "grace", Some(18), Some("active")),
    (8, "heidi", Some(52), Some("active")),
    (9, "ivan", None, None),
    (10, "judy", Some(23), Some("retired")),
];

/// A database living in a temporary directory, removed when dropped.
pub struct PeopleDatabase {
    pub connection_uri: String,
    pub pool: AnyPool,
    _directory: tempfile::TempDir,
}

/// Create the database, the `people` table and its rows.
pub async fn people_database() -> anyhow::Result<PeopleDatabase> {
    sqlx::any::install_default_drivers();

    let directory = tempfile::tempdir()?;
    let connection_uri = format!(
        "sqlite://{}?mode=rwc",
        directory.path().join("people.db").display()
    );
    let pool = AnyPoolOptions::new()
        .max_connections(2)
        .connect(&connection_uri)
        .await?;

    sqlx::query(
        "create table people (id integer primary key, name text not null, age integer, status text)",
    )
    .execute(&pool)
    .await?;

    for (id, name, age, status) in PEOPLE {
        sqlx::query("insert into people (id, name, age, status) values ($1, $2, $3, $4)")
            .bind(*id)
            .bind(*name)
            .bind(*age)
            .bind(*status)
            .execute(&pool)
            .await?;
    }

    tracing::debug!(%connection_uri, rows = PEOPLE.len(), "created people database");

    Ok(PeopleDatabase {
        connection_uri,
        pool,
        _directory: directory,
    })
}
