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

use crate::metrics::{Metric, MetricId, MetricsResult};
use std::fmt::Debug;

/// Storage contract of the metrics registry.
///
/// Handles may be cloned across threads, so each update must be applied
/// atomically with respect to other updates of the same metric.
pub trait MetricsBackend: Send + Sync + Debug + 'static {
    /// Stores `metric`, replacing any metric with the same id.
    fn put_metric(&self, metric: Metric) -> MetricsResult<()>;

    /// Returns a copy of the metric registered under `id`.
    fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric>;

    /// Copies of every stored metric, in no particular order.
    fn list_all_metrics(&self) -> Vec<Metric>;

    /// Adds `delta` to a counter, saturating, and returns the new total.
    fn increment_counter(&self, id: &MetricId, delta: u64) -> MetricsResult<u64>;

    /// Overwrites a gauge.
    fn set_gauge(&self, id: &MetricId, value: f64) -> MetricsResult<()>;

    /// Metrics of one namespace.
    fn metrics_in_namespace(&self, namespace: &str) -> Vec<Metric> {
        self.list_all_metrics()
            .into_iter()
            .filter(|metric| metric.id.namespace == namespace)
            .collect()
    }
}
