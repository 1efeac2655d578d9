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

use crate::metrics::{Metric, MetricId, MetricsError, MetricsResult};
use crate::storage::backend::MetricsBackend;
use std::collections::HashMap;
use std::sync::RwLock;

/// A [`MetricsBackend`] over a `RwLock<HashMap>`.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    storage: RwLock<HashMap<MetricId, Metric>>,
}

impl InMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> MetricsError {
        MetricsError::StorageError("metrics storage lock poisoned".to_string())
    }

    /// Runs `update` on one metric while holding the write lock.
    fn update<R>(
        &self,
        id: &MetricId,
        update: impl FnOnce(&mut Metric) -> MetricsResult<R>,
    ) -> MetricsResult<R> {
        let mut storage = self.storage.write().map_err(|_| Self::poisoned())?;
        let metric = storage
            .get_mut(id)
            .ok_or_else(|| MetricsError::MetricNotFound(id.clone()))?;
        update(metric)
    }
}

impl MetricsBackend for InMemoryBackend {
    fn put_metric(&self, metric: Metric) -> MetricsResult<()> {
        let mut storage = self.storage.write().map_err(|_| Self::poisoned())?;
        storage.insert(metric.id.clone(), metric);
        Ok(())
    }

    fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        let storage = self.storage.read().map_err(|_| Self::poisoned())?;
        storage
            .get(id)
            .cloned()
            .ok_or_else(|| MetricsError::MetricNotFound(id.clone()))
    }

    fn list_all_metrics(&self) -> Vec<Metric> {
        self.storage
            .read()
            .map(|storage| storage.values().cloned().collect())
            .unwrap_or_default()
    }

    fn increment_counter(&self, id: &MetricId, delta: u64) -> MetricsResult<u64> {
        self.update(id, |metric| metric.add_to_counter(delta))
    }

    fn set_gauge(&self, id: &MetricId, value: f64) -> MetricsResult<()> {
        self.update(id, |metric| metric.set_gauge(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricType;
    use std::sync::Arc;

    #[test]
    fn test_put_and_get() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("io", "meshes_loaded");
        backend
            .put_metric(Metric::counter(id.clone(), "Meshes", 4))
            .unwrap();
        assert_eq!(backend.get_metric(&id).unwrap().value.as_counter(), Some(4));
        assert_eq!(
            backend.increment_counter(&MetricId::new("io", "other"), 1),
            Err(MetricsError::MetricNotFound(MetricId::new("io", "other")))
        );
    }

    #[test]
    fn test_counter_saturates() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("renderer", "indices");
        backend
            .put_metric(Metric::counter(id.clone(), "Indices", u64::MAX - 1))
            .unwrap();
        assert_eq!(backend.increment_counter(&id, 5).unwrap(), u64::MAX);
    }

    #[test]
    fn test_type_mismatch() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("renderer", "frame_indices");
        backend
            .put_metric(Metric::gauge(id.clone(), "Frame indices", "indices", 0.0))
            .unwrap();
        assert_eq!(
            backend.increment_counter(&id, 1),
            Err(MetricsError::TypeMismatch {
                expected: MetricType::Counter,
                found: MetricType::Gauge,
            })
        );
        backend.set_gauge(&id, 12.0).unwrap();
        assert_eq!(backend.get_metric(&id).unwrap().value.as_gauge(), Some(12.0));
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let backend = Arc::new(InMemoryBackend::new());
        let id = MetricId::new("renderer", "draw_calls");
        backend.put_metric(Metric::counter(id.clone(), "", 0)).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..5_000 {
                        backend.increment_counter(&id, 1).unwrap();
                    }
                });
            }
        });
        assert_eq!(backend.get_metric(&id).unwrap().value.as_counter(), Some(40_000));
    }

    #[test]
    fn test_namespace_filter() {
        let backend = InMemoryBackend::new();
        backend
            .put_metric(Metric::counter(MetricId::new("renderer", "a"), "", 0))
            .unwrap();
        backend
            .put_metric(Metric::counter(MetricId::new("renderer", "b"), "", 0))
            .unwrap();
        backend
            .put_metric(Metric::gauge(MetricId::new("io", "c"), "", "ms", 0.0))
            .unwrap();
        assert_eq!(backend.metrics_in_namespace("renderer").len(), 2);
        assert_eq!(backend.list_all_metrics().len(), 3);
    }
}
