//! Execution metrics, feature-gated behind `metrics` (spec.md §9 Ambient
//! Stack). Adapted from the teacher's `MetricsCollector`/`Metric` trait,
//! trimmed to the counters the engine itself produces: rows scanned,
//! partitions shuffled, and barrier operators executed. Custom metrics
//! can still be registered the same way the teacher's pipelines do.

use serde_json::{json, Value};
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub trait Metric: Send + Sync + Any {
    fn name(&self) -> &str;
    fn value(&self) -> Value;
    fn as_any(&self) -> &dyn Any;
}

#[derive(Debug, Clone)]
struct CounterMetric {
    name: String,
    count: u64,
}

impl Metric for CounterMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Value {
        json!(self.count)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Thread-safe counter bag, shared across the rayon-parallel operator
/// closures the engine spawns.
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<HashMap<String, CounterMetric>>>,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn increment(&self, name: &str, by: u64) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .entry(name.to_string())
            .and_modify(|m| m.count += by)
            .or_insert_with(|| CounterMetric {
                name: name.to_string(),
                count: by,
            });
    }

    pub fn get(&self, name: &str) -> u64 {
        self.inner.lock().unwrap().get(name).map_or(0, |m| m.count)
    }

    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.inner
            .lock()
            .unwrap()
            .values()
            .map(|m| (m.name().to_string(), m.value()))
            .collect()
    }
}

pub const ROWS_SCANNED: &str = "rows_scanned";
pub const PARTITIONS_SHUFFLED: &str = "partitions_shuffled";
pub const BARRIERS_EXECUTED: &str = "barriers_executed";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_accumulate() {
        let m = MetricsCollector::new();
        m.increment(ROWS_SCANNED, 10);
        m.increment(ROWS_SCANNED, 5);
        assert_eq!(m.get(ROWS_SCANNED), 15);
    }
}
