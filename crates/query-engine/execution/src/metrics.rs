//! Metrics setup and update for query execution.

use prometheus::{Histogram, HistogramOpts, HistogramTimer, IntCounter, Registry};

/// The collection of all metrics exposed by query execution.
#[derive(Debug, Clone)]
pub struct Metrics {
    count_queries_total: IntCounter,
    fetch_queries_total: IntCounter,
    query_errors_total: IntCounter,
    rows_fetched_total: IntCounter,
    query_duration_seconds: Histogram,
}

impl Metrics {
    /// Set up counters and gauges used to produce Prometheus metrics
    pub fn initialize(metrics_registry: &mut Registry) -> Result<Self, prometheus::Error> {
        let count_queries_total = add_int_counter_metric(
            metrics_registry,
            "sql_grid_count_queries_total",
            "Total number of row count queries executed.",
        )?;

        let fetch_queries_total = add_int_counter_metric(
            metrics_registry,
            "sql_grid_fetch_queries_total",
            "Total number of row fetch queries executed.",
        )?;

        let query_errors_total = add_int_counter_metric(
            metrics_registry,
            "sql_grid_query_errors_total",
            "Total number of queries that failed to execute.",
        )?;

        let rows_fetched_total = add_int_counter_metric(
            metrics_registry,
            "sql_grid_rows_fetched_total",
            "Total number of rows returned by fetch queries.",
        )?;

        let query_duration_seconds = add_histogram_metric(
            metrics_registry,
            "sql_grid_query_duration_seconds",
            "Time taken to execute a query against the database, in seconds.",
        )?;

        Ok(Self {
            count_queries_total,
            fetch_queries_total,
            query_errors_total,
            rows_fetched_total,
            query_duration_seconds,
        })
    }

    pub fn record_count_query(&self) {
        self.count_queries_total.inc();
    }

    pub fn record_fetch_query(&self, rows: usize) {
        self.fetch_queries_total.inc();
        self.rows_fetched_total.inc_by(rows as u64);
    }

    pub fn record_query_error(&self) {
        self.query_errors_total.inc();
    }

    /// Observes the elapsed time when the returned timer is dropped.
    pub fn time_query(&self) -> HistogramTimer {
        self.query_duration_seconds.start_timer()
    }
}

/// Create a new int counter metric and register it with the provided Prometheus Registry
fn add_int_counter_metric(
    metrics_registry: &mut Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<IntCounter, prometheus::Error> {
    let int_counter =
        IntCounter::with_opts(prometheus::Opts::new(metric_name, metric_description))?;
    register_collector(metrics_registry, int_counter)
}

/// Create a new histogram metric using the default buckets, and register it with the provided
/// Prometheus Registry
fn add_histogram_metric(
    metrics_registry: &mut Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<Histogram, prometheus::Error> {
    let histogram = Histogram::with_opts(HistogramOpts::new(metric_name, metric_description))?;
    register_collector(metrics_registry, histogram)
}

/// Register a new collector with the registry, and returns it for later use.
fn register_collector<Collector: prometheus::core::Collector + std::clone::Clone + 'static>(
    metrics_registry: &mut Registry,
    collector: Collector,
) -> Result<Collector, prometheus::Error> {
    metrics_registry.register(Box::new(collector.clone()))?;
    Ok(collector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_each_metric_once() {
        let mut registry = Registry::new();
        let metrics = Metrics::initialize(&mut registry).unwrap();
        metrics.record_count_query();
        metrics.record_fetch_query(3);

        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"sql_grid_rows_fetched_total".to_string()));
        assert_eq!(metrics.rows_fetched_total.get(), 3);

        // a second registration of the same names is refused.
        assert!(Metrics::initialize(&mut registry).is_err());
    }
}
