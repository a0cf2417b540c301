//! An executor that remembers what it was asked to run.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use query_engine_execution::error::Error;
use query_engine_execution::query::Executor;
use query_engine_execution::rows::Row;
use query_engine_sql::sql::execution_plan::{Count, ExecutionPlan, Fetch};

/// Records every statement it receives, then hands it to an inner executor if there is one.
/// Without one, counts are zero and fetches return no rows.
#[derive(Default)]
pub struct RecordingExecutor {
    inner: Option<Arc<dyn Executor>>,
    calls: AtomicUsize,
    statements: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        RecordingExecutor::default()
    }

    pub fn wrapping(inner: Arc<dyn Executor>) -> Self {
        RecordingExecutor {
            inner: Some(inner),
            ..RecordingExecutor::default()
        }
    }

    /// How many times either operation was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The SQL text of every statement received, in order.
    pub fn statements(&self) -> Vec<String> {
        self.statements
            .lock()
            .map(|statements| statements.clone())
            .unwrap_or_default()
    }

    fn record(&self, sql: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut statements) = self.statements.lock() {
            statements.push(sql.to_string());
        }
    }
}

#[async_trait]
impl Executor for RecordingExecutor {
    async fn count(&self, plan: &ExecutionPlan<Count>) -> Result<u64, Error> {
        self.record(&plan.query.sql);
        match &self.inner {
            Some(inner) => inner.count(plan).await,
            None => Ok(0),
        }
    }

    async fn fetch(&self, plan: &ExecutionPlan<Fetch>) -> Result<Vec<Row>, Error> {
        self.record(&plan.query.sql);
        match &self.inner {
            Some(inner) => inner.fetch(plan).await,
            None => Ok(vec![]),
        }
    }
}
