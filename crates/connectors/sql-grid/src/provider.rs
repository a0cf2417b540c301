//! The data provider a grid talks to.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{info_span, Instrument};

use query_engine_execution::query::Executor;
use query_engine_execution::rows::MappedRows;
use query_engine_metadata::metadata::{HolderInfo, Metadata, QueryTemplate, StaticParameters};
use query_engine_sql::sql::execution_plan::{Count, ExecutionPlan, Fetch};
use query_engine_translation::translation;
use query_engine_translation::translation::request::GridQuery;
use sql_grid_configuration::Configuration;

use crate::error::Error;

/// What a grid needs from its data source.
#[async_trait]
pub trait DataProvider<H, K>: Send + Sync {
    /// The number of rows matching the query's filter.
    async fn size(&self, query: &GridQuery) -> Result<u64, Error>;

    /// One page of rows matching the query's filter, in the query's sort order.
    async fn fetch(&self, query: &GridQuery) -> Result<MappedRows<H>, Error>;

    /// The identity of a row, stable across fetches.
    fn id(&self, item: &H) -> K;
}

type IdFunction<H, K> = dyn Fn(&H) -> K + Send + Sync;

/// A data provider backed by a hand-written query template.
///
/// The template, its static parameters, the holder description and the identity function are
/// fixed at construction. Each call resolves the grid's filter, sort orders and page window
/// into the template and runs the result through the executor.
pub struct SqlDataProvider<H, K> {
    metadata: Metadata,
    id: Box<IdFunction<H, K>>,
    executor: Arc<dyn Executor>,
}

impl<H, K> SqlDataProvider<H, K> {
    pub fn new(
        holder: HolderInfo,
        template: QueryTemplate,
        static_parameters: StaticParameters,
        id: impl Fn(&H) -> K + Send + Sync + 'static,
        executor: Arc<dyn Executor>,
    ) -> Self {
        SqlDataProvider {
            metadata: Metadata {
                template,
                parameters: static_parameters,
                holder,
            },
            id: Box::new(id),
            executor,
        }
    }

    /// Build a provider from a runtime configuration.
    pub fn from_configuration(
        configuration: &Configuration,
        id: impl Fn(&H) -> K + Send + Sync + 'static,
        executor: Arc<dyn Executor>,
    ) -> Self {
        SqlDataProvider {
            metadata: configuration.metadata.clone(),
            id: Box::new(id),
            executor,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Resolve the query counting every row that matches the filter.
    pub fn resolve_count_query(
        &self,
        query: &GridQuery,
    ) -> Result<ExecutionPlan<Count>, translation::error::Error> {
        info_span!(
            "Resolve count query",
            holder = %self.metadata.holder.name,
            internal.visibility = "user",
        )
        .in_scope(|| translation::query::translate_count(&self.metadata, query))
    }

    /// Resolve the query fetching one page of matching rows.
    pub fn resolve_fetch_query(
        &self,
        query: &GridQuery,
    ) -> Result<ExecutionPlan<Fetch>, translation::error::Error> {
        info_span!(
            "Resolve fetch query",
            holder = %self.metadata.holder.name,
            internal.visibility = "user",
        )
        .in_scope(|| translation::query::translate_fetch(&self.metadata, query))
    }
}

#[async_trait]
impl<H, K> DataProvider<H, K> for SqlDataProvider<H, K>
where
    H: DeserializeOwned + Send + 'static,
    K: 'static,
{
    async fn size(&self, query: &GridQuery) -> Result<u64, Error> {
        async {
            let plan = self.resolve_count_query(query)?;
            Ok::<_, Error>(self.executor.count(&plan).await?)
        }
        .instrument(info_span!(
            "Grid size",
            holder = %self.metadata.holder.name,
        ))
        .await
        .map_err(|err: Error| {
            log_error("Size error", &err);
            err
        })
    }

    async fn fetch(&self, query: &GridQuery) -> Result<MappedRows<H>, Error> {
        async {
            let plan = self.resolve_fetch_query(query)?;
            let rows = self.executor.fetch(&plan).await?;
            Ok::<_, Error>(MappedRows::new(self.metadata.holder.clone(), rows))
        }
        .instrument(info_span!(
            "Grid fetch",
            holder = %self.metadata.holder.name,
        ))
        .await
        .map_err(|err: Error| {
            log_error("Fetch error", &err);
            err
        })
    }

    fn id(&self, item: &H) -> K {
        (self.id)(item)
    }
}

fn log_error(name: &'static str, err: &Error) {
    tracing::error!(
        meta.signal_type = "log",
        event.domain = "sql-grid",
        event.name = name,
        name = name,
        body = %err,
        error = true,
    );
}
