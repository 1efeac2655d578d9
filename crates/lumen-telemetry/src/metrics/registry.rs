// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Registry for managing metrics.

use crate::metrics::{Metric, MetricId, MetricType, MetricsError, MetricsResult};
use crate::storage::{InMemoryBackend, MetricsBackend};
use std::sync::Arc;

/// Entry point of the metrics system.
///
/// Registering a metric returns a typed handle that updates it without
/// looking the id up by hand. Cloning the registry shares its backend.
#[derive(Debug, Clone)]
pub struct MetricsRegistry {
    backend: Arc<dyn MetricsBackend>,
}

impl MetricsRegistry {
    /// Creates a registry over a fresh [`InMemoryBackend`].
    pub fn new() -> Self {
        Self {
            backend: Arc::new(InMemoryBackend::new()),
        }
    }

    /// Registers a counter starting at zero. An existing metric with the same
    /// id is replaced.
    pub fn register_counter(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> MetricsResult<CounterHandle> {
        let id = MetricId::new(namespace, name);
        self.backend
            .put_metric(Metric::counter(id.clone(), description, 0))?;
        Ok(CounterHandle {
            id,
            backend: Arc::clone(&self.backend),
        })
    }

    /// Registers a gauge starting at zero. An existing metric with the same
    /// id is replaced.
    pub fn register_gauge(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
    ) -> MetricsResult<GaugeHandle> {
        let id = MetricId::new(namespace, name);
        self.backend
            .put_metric(Metric::gauge(id.clone(), description, unit, 0.0))?;
        Ok(GaugeHandle {
            id,
            backend: Arc::clone(&self.backend),
        })
    }

    /// Returns a copy of a metric.
    pub fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        self.backend.get_metric(id)
    }

    /// Every metric of `namespace`, sorted by name.
    pub fn namespace_metrics(&self, namespace: &str) -> Vec<Metric> {
        let mut metrics = self.backend.metrics_in_namespace(namespace);
        metrics.sort_by(|a, b| a.id.name.cmp(&b.id.name));
        metrics
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Typed access to one registered counter.
#[derive(Debug, Clone)]
pub struct CounterHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl CounterHandle {
    /// Adds one and returns the new total.
    pub fn increment(&self) -> MetricsResult<u64> {
        self.increment_by(1)
    }

    /// Adds `amount` and returns the new total.
    pub fn increment_by(&self, amount: u64) -> MetricsResult<u64> {
        self.backend.increment_counter(&self.id, amount)
    }

    /// The current total.
    pub fn get(&self) -> MetricsResult<u64> {
        let metric = self.backend.get_metric(&self.id)?;
        metric.value.as_counter().ok_or(MetricsError::TypeMismatch {
            expected: MetricType::Counter,
            found: metric.metric_type(),
        })
    }

    /// The counter's id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Typed access to one registered gauge.
#[derive(Debug, Clone)]
pub struct GaugeHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl GaugeHandle {
    /// Overwrites the reading.
    pub fn set(&self, value: f64) -> MetricsResult<()> {
        self.backend.set_gauge(&self.id, value)
    }

    /// The current reading.
    pub fn get(&self) -> MetricsResult<f64> {
        let metric = self.backend.get_metric(&self.id)?;
        metric.value.as_gauge().ok_or(MetricsError::TypeMismatch {
            expected: MetricType::Gauge,
            found: metric.metric_type(),
        })
    }

    /// The gauge's id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_handle() {
        let registry = MetricsRegistry::new();
        let draws = registry
            .register_counter("renderer", "draw_calls", "Indexed draws issued")
            .unwrap();
        assert_eq!(draws.increment().unwrap(), 1);
        assert_eq!(draws.increment_by(4).unwrap(), 5);
        assert_eq!(draws.get().unwrap(), 5);
        assert_eq!(registry.get_metric(draws.id()).unwrap().value.as_counter(), Some(5));
    }

    #[test]
    fn test_gauge_handle() {
        let registry = MetricsRegistry::new();
        let textures = registry
            .register_gauge("io", "texture_bytes", "Uploaded texel bytes", "bytes")
            .unwrap();
        textures.set(1024.0).unwrap();
        textures.set(1536.0).unwrap();
        assert_eq!(textures.get().unwrap(), 1536.0);
    }

    #[test]
    fn test_clones_share_the_backend() {
        let registry = MetricsRegistry::new();
        let clone = registry.clone();
        let counter = clone.register_counter("renderer", "indices", "").unwrap();
        counter.increment_by(36).unwrap();
        let stored = registry.get_metric(counter.id()).unwrap();
        assert_eq!(stored.value.as_counter(), Some(36));
    }

    #[test]
    fn test_reregistering_resets() {
        let registry = MetricsRegistry::new();
        let first = registry.register_counter("renderer", "draw_calls", "").unwrap();
        first.increment_by(3).unwrap();
        let second = registry.register_counter("renderer", "draw_calls", "").unwrap();
        assert_eq!(second.get().unwrap(), 0);
        assert_eq!(registry.namespace_metrics("renderer").len(), 1);
    }

    #[test]
    fn test_namespace_listing_is_sorted() {
        let registry = MetricsRegistry::new();
        registry.register_counter("renderer", "indices", "").unwrap();
        registry.register_counter("renderer", "draw_calls", "").unwrap();
        registry.register_gauge("io", "load_ms", "", "ms").unwrap();
        let names: Vec<String> = registry
            .namespace_metrics("renderer")
            .into_iter()
            .map(|m| m.id.name)
            .collect();
        assert_eq!(names, vec!["draw_calls", "indices"]);
    }

    #[test]
    fn test_handles_shared_across_threads_count_every_increment() {
        let registry = MetricsRegistry::new();
        let draws = registry.register_counter("renderer", "draw_calls", "").unwrap();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let draws = draws.clone();
                scope.spawn(move || {
                    for _ in 0..20_000 {
                        draws.increment().unwrap();
                    }
                });
            }
        });
        assert_eq!(draws.get().unwrap(), 160_000);
    }

    #[test]
    fn test_missing_metric() {
        let registry = MetricsRegistry::new();
        let id = MetricId::new("renderer", "nothing");
        assert_eq!(
            registry.get_metric(&id).unwrap_err(),
            MetricsError::MetricNotFound(id)
        );
    }
}
