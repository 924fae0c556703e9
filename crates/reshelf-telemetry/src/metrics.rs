//! Prometheus-backed metrics registry.

use std::sync::Arc;

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use crate::error::{Result, TelemetryError};

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    fsops_operations_total: IntCounterVec,
    fsops_actions_total: IntCounterVec,
    acquire_links_total: IntCounterVec,
}

impl Metrics {
    /// Construct a new registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any collector cannot be built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = counter_vec(
            &registry,
            "http_requests_total",
            "Total HTTP requests received",
            &["route", "code"],
        )?;
        let fsops_operations_total = counter_vec(
            &registry,
            "fsops_operations_total",
            "Filesystem maintenance operations by outcome",
            &["operation", "outcome"],
        )?;
        let fsops_actions_total = counter_vec(
            &registry,
            "fsops_actions_total",
            "Planned filesystem actions by kind and outcome",
            &["kind", "outcome"],
        )?;
        let acquire_links_total = counter_vec(
            &registry,
            "acquire_links_total",
            "Magnet links submitted to the download client",
            &["outcome"],
        )?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                fsops_operations_total,
                fsops_actions_total,
                acquire_links_total,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Increment the operation counter (`operation` is `move`, `rename`, ...).
    pub fn inc_fsops_operation(&self, operation: &str, outcome: &str) {
        self.inner
            .fsops_operations_total
            .with_label_values(&[operation, outcome])
            .inc();
    }

    /// Increment the per-action counter.
    pub fn inc_fsops_action(&self, kind: &str, outcome: &str) {
        self.inner
            .fsops_actions_total
            .with_label_values(&[kind, outcome])
            .inc();
    }

    /// Increment the acquisition link counter.
    pub fn inc_acquire_link(&self, outcome: &str) {
        self.inner
            .acquire_links_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Current value of `http_requests_total` for a label pair.
    #[must_use]
    pub fn http_request_count(&self, route: &str, status: u16) -> u64 {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .get()
    }

    /// Current value of `fsops_operations_total` for a label pair.
    #[must_use]
    pub fn fsops_operation_count(&self, operation: &str, outcome: &str) -> u64 {
        self.inner
            .fsops_operations_total
            .with_label_values(&[operation, outcome])
            .get()
    }

    /// Current value of `fsops_actions_total` for a label pair.
    #[must_use]
    pub fn fsops_action_count(&self, kind: &str, outcome: &str) -> u64 {
        self.inner
            .fsops_actions_total
            .with_label_values(&[kind, outcome])
            .get()
    }

    /// Current value of `acquire_links_total` for an outcome.
    #[must_use]
    pub fn acquire_link_count(&self, outcome: &str) -> u64 {
        self.inner
            .acquire_links_total
            .with_label_values(&[outcome])
            .get()
    }

    /// Render the registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the output is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::MetricsEncode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsUtf8 { source })
    }
}

fn counter_vec(
    registry: &Registry,
    name: &'static str,
    help: &str,
    labels: &[&str],
) -> Result<IntCounterVec> {
    let counter = IntCounterVec::new(Opts::new(name, help), labels)
        .map_err(|source| TelemetryError::MetricsCollector { name, source })?;
    registry
        .register(Box::new(counter.clone()))
        .map_err(|source| TelemetryError::MetricsRegister { name, source })?;
    Ok(counter)
}
