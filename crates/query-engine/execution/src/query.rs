//! Execute an execution plan against the database.

use async_trait::async_trait;
use sqlx::any::{AnyArguments, AnyRow};
use sqlx::{Any, AnyPool, Column, Row as _, ValueRef};
use tracing::{info_span, Instrument};

use query_engine_sql::sql;
use query_engine_sql::sql::ast::Value;
use query_engine_sql::sql::execution_plan::{Count, ExecutionPlan, Fetch};
use query_engine_sql::sql::string::PositionalSQL;

use crate::error::{Error, QueryError};
use crate::metrics;
use crate::rows::Row;

/// Something able to run resolved queries.
///
/// Implementations acquire whatever connection they need for the duration of a single call
/// and release it before returning, whether the call succeeds or not.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Run a count query and return its single value.
    async fn count(&self, plan: &ExecutionPlan<Count>) -> Result<u64, Error>;

    /// Run a fetch query and return every row it produced.
    async fn fetch(&self, plan: &ExecutionPlan<Fetch>) -> Result<Vec<Row>, Error>;
}

/// Runs queries on a sqlx connection pool, for any of the drivers it was built with.
#[derive(Debug, Clone)]
pub struct SqlxExecutor {
    pool: AnyPool,
    metrics: metrics::Metrics,
}

impl SqlxExecutor {
    pub fn new(pool: AnyPool, metrics: metrics::Metrics) -> Self {
        SqlxExecutor { pool, metrics }
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }
}

#[async_trait]
impl Executor for SqlxExecutor {
    async fn count(&self, plan: &ExecutionPlan<Count>) -> Result<u64, Error> {
        let query = plan.query_sql().to_positional().map_err(QueryError::from)?;
        log_query(plan.query_sql(), &query);

        let result: Result<u64, Error> = async {
            let _timer = self.metrics.time_query();
            let mut connection = self.pool.acquire().await?;
            let row = build_query_with_params(&query)
                .fetch_one(&mut *connection)
                .await?;
            let count: i64 = row.try_get(0)?;
            u64::try_from(count).map_err(|_| Error::Query(QueryError::NegativeCount(count)))
        }
        .instrument(info_span!(
            "Execute count query",
            root_field = %plan.root_field,
            internal.visibility = "user",
        ))
        .await;

        match &result {
            Ok(_) => self.metrics.record_count_query(),
            Err(_) => self.metrics.record_query_error(),
        }
        result
    }

    async fn fetch(&self, plan: &ExecutionPlan<Fetch>) -> Result<Vec<Row>, Error> {
        let query = plan.query_sql().to_positional().map_err(QueryError::from)?;
        log_query(plan.query_sql(), &query);

        let result: Result<Vec<Row>, Error> = async {
            let _timer = self.metrics.time_query();
            let mut connection = self.pool.acquire().await?;
            let rows = build_query_with_params(&query)
                .fetch_all(&mut *connection)
                .await?;
            rows.iter()
                .map(row_to_json)
                .collect::<Result<Vec<Row>, sqlx::Error>>()
                .map_err(Error::DB)
        }
        .instrument(info_span!(
            "Execute fetch query",
            root_field = %plan.root_field,
            internal.visibility = "user",
        ))
        .await;

        match &result {
            Ok(rows) => self.metrics.record_fetch_query(rows.len()),
            Err(_) => self.metrics.record_query_error(),
        }
        result
    }
}

fn log_query(named: &sql::string::SQL, positional: &PositionalSQL) {
    tracing::info!(
        generated_sql = %named.sql,
        positional_sql = %positional.sql,
        params = ?positional.params,
        "executing query"
    );
}

/// Create a sqlx query based on our SQL query and bind our parameters and variables to it.
fn build_query_with_params(
    query: &PositionalSQL,
) -> sqlx::query::Query<'_, Any, AnyArguments<'_>> {
    query
        .params
        .iter()
        .fold(sqlx::query::<Any>(&query.sql), |sqlx_query, param| {
            match param {
                Value::Null => sqlx_query.bind(Option::<String>::None),
                Value::Bool(b) => sqlx_query.bind(*b),
                Value::Int8(i) => sqlx_query.bind(*i),
                Value::Float8(f) => sqlx_query.bind(*f),
                Value::String(s) => sqlx_query.bind(s.as_str()),
            }
        })
}

/// Convert a database row into a map from column names to JSON values.
fn row_to_json(row: &AnyRow) -> Result<Row, sqlx::Error> {
    let mut columns = serde_json::Map::new();
    for column in row.columns() {
        let value = column_to_json(row, column.ordinal())?;
        columns.insert(column.name().to_string(), value);
    }
    Ok(Row(columns))
}

/// Decode a single column, trying each of the scalar types the drivers produce.
///
/// NULL is checked first: the `Any` driver gives NULL values their own type, which none of the
/// typed decodes accept.
fn column_to_json(row: &AnyRow, index: usize) -> Result<serde_json::Value, sqlx::Error> {
    use serde_json::Value as Json;

    if row.try_get_raw(index)?.is_null() {
        return Ok(Json::Null);
    }
    if let Ok(value) = row.try_get::<i64, _>(index) {
        return Ok(Json::from(value));
    }
    if let Ok(value) = row.try_get::<i32, _>(index) {
        return Ok(Json::from(value));
    }
    if let Ok(value) = row.try_get::<i16, _>(index) {
        return Ok(Json::from(value));
    }
    if let Ok(value) = row.try_get::<f64, _>(index) {
        return Ok(serde_json::Number::from_f64(value).map_or(Json::Null, Json::Number));
    }
    if let Ok(value) = row.try_get::<f32, _>(index) {
        return Ok(serde_json::Number::from_f64(f64::from(value)).map_or(Json::Null, Json::Number));
    }
    if let Ok(value) = row.try_get::<bool, _>(index) {
        return Ok(Json::Bool(value));
    }
    row.try_get::<String, _>(index).map(Json::String)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::Registry;
    use sqlx::any::AnyPoolOptions;

    async fn pool() -> (tempfile::TempDir, AnyPool) {
        sqlx::any::install_default_drivers();
        let dir = tempfile::tempdir().unwrap();
        let uri = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .connect(&uri)
            .await
            .unwrap();
        sqlx::query("create table people (id integer primary key, name text, score real)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("insert into people values (1, 'alice', 1.5), (2, 'bob', null), (3, 'carol', 3.0)")
            .execute(&pool)
            .await
            .unwrap();
        (dir, pool)
    }

    fn executor(pool: AnyPool) -> SqlxExecutor {
        let metrics = metrics::Metrics::initialize(&mut Registry::new()).unwrap();
        SqlxExecutor::new(pool, metrics)
    }

    fn plan<Kind>(sql_text: &str, params: Vec<(&str, Value)>) -> ExecutionPlan<Kind> {
        let mut query = sql::string::SQL::new();
        query.append_syntax(sql_text);
        for (name, value) in params {
            query.params.insert(name.into(), value);
        }
        ExecutionPlan::new("people", query)
    }

    #[tokio::test]
    async fn counts_rows() {
        let (_dir, pool) = pool().await;
        let executor = executor(pool);

        let count = executor
            .count(&plan(
                "SELECT count(*) FROM (select * from people where id > :p1) AS count_source",
                vec![("p1", Value::Int8(1))],
            ))
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn fetches_rows_as_json() {
        let (_dir, pool) = pool().await;
        let executor = executor(pool);

        let rows = executor
            .fetch(&plan(
                "select id, name, score from people where name <> :p1 or name = :p1 order by id",
                vec![("p1", Value::from("bob"))],
            ))
            .await
            .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].0["name"], serde_json::json!("alice"));
        assert_eq!(rows[0].0["score"], serde_json::json!(1.5));
        assert_eq!(rows[1].0["score"], serde_json::Value::Null);
        assert_eq!(rows[2].0["id"], serde_json::json!(3));
    }

    #[tokio::test]
    async fn null_columns_become_json_null() {
        let (_dir, pool) = pool().await;
        let executor = executor(pool);

        let rows = executor
            .fetch(&plan(
                "select id, score, null as nothing from people where id = :p1",
                vec![("p1", Value::Int8(2))],
            ))
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("id"), Some(&serde_json::json!(2)));
        assert_eq!(rows[0].get("score"), Some(&serde_json::Value::Null));
        assert_eq!(rows[0].get("nothing"), Some(&serde_json::Value::Null));
    }

    #[tokio::test]
    async fn unbound_parameters_fail_before_reaching_the_database() {
        let (_dir, pool) = pool().await;
        let executor = executor(pool);

        let result = executor
            .fetch(&plan("select * from people where id = :missing", vec![]))
            .await;
        assert!(matches!(result, Err(Error::Query(QueryError::Bind(_)))));
    }

    #[tokio::test]
    async fn database_errors_are_passed_through() {
        let (_dir, pool) = pool().await;
        let executor = executor(pool);

        let result = executor
            .fetch(&plan("select * from no_such_table", vec![]))
            .await;
        assert!(matches!(result, Err(Error::DB(sqlx::Error::Database(_)))));
    }
}
