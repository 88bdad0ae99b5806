use std::sync::OnceLock;

/// Metrics for the wrap/unwrap core.
#[derive(Debug, Clone, prometheus_metric_storage::MetricStorage)]
#[metric(subsystem = "wraptor")]
struct Metrics {
    /// Total number of node connections established.
    connections: prometheus::IntCounter,

    /// Total number of observed block height changes.
    block_updates: prometheus::IntCounter,

    /// Errors that occurred while reading chain state.
    #[metric(labels("read"))]
    chain_read_errors: prometheus::IntCounterVec,

    /// Outcomes of transaction batches handed to the relay.
    #[metric(labels("result"))]
    submissions: prometheus::IntCounterVec,
}

pub fn connection_established() {
    get().connections.inc();
}

pub fn block_update() {
    get().block_updates.inc();
}

pub fn chain_read_error(read: &str) {
    get().chain_read_errors.with_label_values(&[read]).inc();
}

pub fn submission(result: &str) {
    get().submissions.with_label_values(&[result]).inc();
}

/// Get the metrics instance.
fn get() -> &'static Metrics {
    static REGISTRY: OnceLock<prometheus_metric_storage::StorageRegistry> = OnceLock::new();
    let registry = REGISTRY.get_or_init(prometheus_metric_storage::StorageRegistry::default);
    Metrics::instance(registry).expect("unexpected error getting metrics instance")
}
