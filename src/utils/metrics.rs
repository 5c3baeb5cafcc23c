use prometheus::{Histogram, IntCounter, IntCounterVec, Registry};

/// Prometheus metrics for migration throughput and error rates.
pub struct Metrics {
    pub registry: Registry,
    pub records_processed: IntCounter,
    pub records_migrated: IntCounter,
    pub record_errors: IntCounter,
    pub batch_writes: IntCounterVec,
    pub run_duration: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let records_processed = IntCounter::new(
            "migration_records_processed_total",
            "Preference records examined",
        )
        .expect("Failed to create records_processed metric");

        let records_migrated = IntCounter::new(
            "migration_records_migrated_total",
            "Preference records rewritten to the new scheme",
        )
        .expect("Failed to create records_migrated metric");

        let record_errors = IntCounter::new(
            "migration_record_errors_total",
            "Per-record processing errors",
        )
        .expect("Failed to create record_errors metric");

        let batch_writes = IntCounterVec::new(
            prometheus::Opts::new("migration_batch_writes_total", "Batch write attempts"),
            &["outcome"],
        )
        .expect("Failed to create batch_writes metric");

        let run_duration = Histogram::with_opts(prometheus::HistogramOpts::new(
            "migration_run_duration_seconds",
            "Migration run duration in seconds",
        ))
        .expect("Failed to create run_duration metric");

        registry.register(Box::new(records_processed.clone())).ok();
        registry.register(Box::new(records_migrated.clone())).ok();
        registry.register(Box::new(record_errors.clone())).ok();
        registry.register(Box::new(batch_writes.clone())).ok();
        registry.register(Box::new(run_duration.clone())).ok();

        Self {
            registry,
            records_processed,
            records_migrated,
            record_errors,
            batch_writes,
            run_duration,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
