//! Metrics
//!
//! Client metrics collection interface and implementations.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Metric labels.
pub type MetricLabels = HashMap<String, String>;

/// Authenticated client metrics interface.
pub trait ClientMetrics: Send + Sync {
    /// Record a completed HTTP exchange.
    fn record_request(&self, method: &str, status: Option<u16>, duration: Duration);

    /// Record the outcome of a `/refresh_token` call.
    fn record_token_refresh(&self, success: bool);

    /// Record a request parked behind an in-flight refresh.
    fn record_queued_request(&self);

    /// Record a forced sign-out.
    fn record_session_end(&self);
}

/// No-op metrics implementation.
pub struct NoOpMetrics;

impl ClientMetrics for NoOpMetrics {
    fn record_request(&self, _method: &str, _status: Option<u16>, _duration: Duration) {}
    fn record_token_refresh(&self, _success: bool) {}
    fn record_queued_request(&self) {}
    fn record_session_end(&self) {}
}

/// No-op metrics singleton.
pub fn no_op_metrics() -> NoOpMetrics {
    NoOpMetrics
}

/// Metric entry for in-memory storage.
#[derive(Debug, Clone)]
pub struct MetricEntry {
    pub name: String,
    pub value: f64,
    pub labels: MetricLabels,
    pub timestamp: u64,
}

/// In-memory metrics for testing.
#[derive(Default)]
pub struct InMemoryMetrics {
    entries: Mutex<Vec<MetricEntry>>,
}

impl InMemoryMetrics {
    /// Create new in-memory metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded entries.
    pub fn get_entries(&self) -> Vec<MetricEntry> {
        self.entries.lock().clone()
    }

    /// Get entries by name.
    pub fn get_entries_by_name(&self, name: &str) -> Vec<MetricEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.name == name)
            .cloned()
            .collect()
    }

    /// Number of entries recorded under `name`.
    pub fn count(&self, name: &str) -> usize {
        self.entries.lock().iter().filter(|e| e.name == name).count()
    }

    /// Number of refreshes with the given outcome.
    pub fn refreshes(&self, success: bool) -> usize {
        let wanted = success.to_string();
        self.entries
            .lock()
            .iter()
            .filter(|e| {
                e.name == "dealership_token_refreshes_total"
                    && e.labels.get("success") == Some(&wanted)
            })
            .count()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    fn record(&self, name: &str, value: f64, labels: MetricLabels) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        self.entries.lock().push(MetricEntry {
            name: name.to_string(),
            value,
            labels,
            timestamp: now,
        });
    }
}

impl ClientMetrics for InMemoryMetrics {
    fn record_request(&self, method: &str, status: Option<u16>, duration: Duration) {
        let mut labels = MetricLabels::new();
        labels.insert("method".to_string(), method.to_string());
        labels.insert(
            "status".to_string(),
            status.map(|s| s.to_string()).unwrap_or_else(|| "error".to_string()),
        );
        self.record(
            "dealership_request_duration_ms",
            duration.as_secs_f64() * 1000.0,
            labels,
        );
    }

    fn record_token_refresh(&self, success: bool) {
        let mut labels = MetricLabels::new();
        labels.insert("success".to_string(), success.to_string());
        self.record("dealership_token_refreshes_total", 1.0, labels);
    }

    fn record_queued_request(&self) {
        self.record("dealership_queued_requests_total", 1.0, MetricLabels::new());
    }

    fn record_session_end(&self) {
        self.record("dealership_session_ends_total", 1.0, MetricLabels::new());
    }
}

/// Create in-memory metrics for testing.
pub fn create_in_memory_metrics() -> InMemoryMetrics {
    InMemoryMetrics::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_op_metrics() {
        let metrics = no_op_metrics();
        metrics.record_request("GET", Some(200), Duration::from_millis(5));
        metrics.record_token_refresh(true);
        metrics.record_session_end();
    }

    #[test]
    fn test_in_memory_metrics() {
        let metrics = InMemoryMetrics::new();

        metrics.record_request("GET", Some(401), Duration::from_millis(12));
        metrics.record_request("POST", None, Duration::from_millis(3));
        metrics.record_token_refresh(true);
        metrics.record_token_refresh(false);
        metrics.record_queued_request();

        assert_eq!(metrics.get_entries().len(), 5);
        assert_eq!(metrics.refreshes(true), 1);
        assert_eq!(metrics.refreshes(false), 1);
        assert_eq!(metrics.count("dealership_queued_requests_total"), 1);

        let requests = metrics.get_entries_by_name("dealership_request_duration_ms");
        assert_eq!(requests[0].labels.get("status"), Some(&"401".to_string()));
        assert_eq!(requests[1].labels.get("status"), Some(&"error".to_string()));
    }

    #[test]
    fn test_clear_entries() {
        let metrics = InMemoryMetrics::new();
        metrics.record_session_end();

        assert!(!metrics.get_entries().is_empty());
        metrics.clear();
        assert!(metrics.get_entries().is_empty());
    }
}
