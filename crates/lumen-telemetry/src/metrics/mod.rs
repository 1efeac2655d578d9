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

//! Metric identifiers, values and errors.

pub mod registry;

use std::fmt;
use std::time::Instant;
use thiserror::Error;

/// Identifies a metric by namespace and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricId {
    /// Owning subsystem, e.g. `"renderer"`.
    pub namespace: String,
    /// Metric name inside the namespace, e.g. `"draw_calls"`.
    pub name: String,
}

impl MetricId {
    /// Creates an id.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// The kind of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricType {
    /// Monotonic total.
    Counter,
    /// Last written value.
    Gauge,
}

/// Current value of a metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    /// A counter total.
    Counter(u64),
    /// A gauge reading.
    Gauge(f64),
}

impl MetricValue {
    /// The kind matching this value.
    pub fn metric_type(&self) -> MetricType {
        match self {
            MetricValue::Counter(_) => MetricType::Counter,
            MetricValue::Gauge(_) => MetricType::Gauge,
        }
    }

    /// The counter total, if this is a counter.
    pub fn as_counter(&self) -> Option<u64> {
        match self {
            MetricValue::Counter(v) => Some(*v),
            MetricValue::Gauge(_) => None,
        }
    }

    /// The gauge reading, if this is a gauge.
    pub fn as_gauge(&self) -> Option<f64> {
        match self {
            MetricValue::Gauge(v) => Some(*v),
            MetricValue::Counter(_) => None,
        }
    }
}

/// A stored metric with its description.
#[derive(Debug, Clone)]
pub struct Metric {
    /// The metric's identity.
    pub id: MetricId,
    /// What the metric measures.
    pub description: String,
    /// Unit of measurement, `"count"` for counters.
    pub unit: String,
    /// The current value.
    pub value: MetricValue,
    /// Time of the last write.
    pub last_updated: Instant,
}

impl Metric {
    /// A counter starting at `initial`.
    pub fn counter(id: MetricId, description: impl Into<String>, initial: u64) -> Self {
        Self {
            id,
            description: description.into(),
            unit: "count".to_string(),
            value: MetricValue::Counter(initial),
            last_updated: Instant::now(),
        }
    }

    /// A gauge starting at `initial`.
    pub fn gauge(
        id: MetricId,
        description: impl Into<String>,
        unit: impl Into<String>,
        initial: f64,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            unit: unit.into(),
            value: MetricValue::Gauge(initial),
            last_updated: Instant::now(),
        }
    }

    /// The kind of this metric.
    pub fn metric_type(&self) -> MetricType {
        self.value.metric_type()
    }

    /// Stamps the metric as written now.
    pub fn touch(&mut self) {
        self.last_updated = Instant::now();
    }

    /// Adds `delta` to a counter, saturating, and returns the new total.
    pub fn add_to_counter(&mut self, delta: u64) -> MetricsResult<u64> {
        match self.value {
            MetricValue::Counter(ref mut total) => {
                *total = total.saturating_add(delta);
                let total = *total;
                self.touch();
                Ok(total)
            }
            MetricValue::Gauge(_) => Err(MetricsError::TypeMismatch {
                expected: MetricType::Counter,
                found: MetricType::Gauge,
            }),
        }
    }

    /// Overwrites a gauge reading.
    pub fn set_gauge(&mut self, value: f64) -> MetricsResult<()> {
        match self.value {
            MetricValue::Gauge(ref mut reading) => {
                *reading = value;
                self.touch();
                Ok(())
            }
            MetricValue::Counter(_) => Err(MetricsError::TypeMismatch {
                expected: MetricType::Gauge,
                found: MetricType::Counter,
            }),
        }
    }
}

/// Result alias for metric operations.
pub type MetricsResult<T> = Result<T, MetricsError>;

/// Errors of the metrics system.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    /// No metric is registered under this id.
    #[error("metric not found: {0}")]
    MetricNotFound(MetricId),
    /// The operation does not apply to the stored metric's kind.
    #[error("type mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch {
        /// The kind the operation works on.
        expected: MetricType,
        /// The kind actually stored.
        found: MetricType,
    },
    /// The storage layer failed.
    #[error("storage error: {0}")]
    StorageError(String),
}
