use std::fs;
use std::path::PathBuf;

use query_engine_sql::sql;
use query_engine_translation::translation;
use sql_grid_configuration::environment::FixedEnvironment;
use sql_grid_configuration::version1::DEFAULT_CONNECTION_URI_VARIABLE;

/// A resolved query, with its parameters in binding order.
pub struct Resolved {
    pub sql: String,
    pub params: Vec<(String, sql::ast::Value)>,
}

impl From<sql::string::SQL> for Resolved {
    fn from(query: sql::string::SQL) -> Self {
        Resolved {
            sql: query.sql,
            params: query
                .params
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }
}

/// Load the configuration and request of a goldenfile directory, and resolve both the count
/// and the fetch query.
pub async fn test_translation(testname: &str) -> anyhow::Result<(Resolved, Resolved)> {
    let directory = PathBuf::from("tests/goldenfiles").join(testname);

    let parsed_configuration = sql_grid_configuration::parse_configuration(&directory).await?;
    let configuration = sql_grid_configuration::make_runtime_configuration(
        parsed_configuration,
        FixedEnvironment::from([(
            DEFAULT_CONNECTION_URI_VARIABLE.into(),
            "the translation tests do not rely on a database connection".into(),
        )]),
    )?;
    let metadata = configuration.metadata;

    let request: translation::request::GridQuery =
        serde_json::from_str(&fs::read_to_string(directory.join("request.json"))?)?;

    let count = translation::query::translate_count(&metadata, &request)?;
    let fetch = translation::query::translate_fetch(&metadata, &request)?;

    Ok((count.query.into(), fetch.query.into()))
}
