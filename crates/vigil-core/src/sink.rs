//! Sink seams for delivering records and metrics to external backends.
//!
//! The monitor treats both sinks as best-effort: a failed delivery is
//! logged by the caller and never rolls back the in-memory record.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::VigilError;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink unavailable: {0}")]
    Unavailable(String),

    #[error("record rejected: {0}")]
    Rejected(String),
}

impl From<SinkError> for VigilError {
    fn from(err: SinkError) -> Self {
        VigilError::SinkUnavailable(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Log records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecordKind {
    SecurityEvent,
    AuditTrail,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SecurityEvent => f.write_str("SecurityEvent"),
            Self::AuditTrail => f.write_str("AuditTrail"),
        }
    }
}

/// Envelope handed to a [`LogSink`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogRecord {
    #[serde(rename = "log_type")]
    pub kind: RecordKind,
    /// Destination log group.
    #[serde(skip)]
    pub group: String,
    #[serde(rename = "data")]
    pub payload: serde_json::Value,
}

pub trait LogSink: Send + Sync {
    fn emit(&self, record: &LogRecord) -> Result<(), SinkError>;
}

impl<T: LogSink + ?Sized> LogSink for Arc<T> {
    fn emit(&self, record: &LogRecord) -> Result<(), SinkError> {
        (**self).emit(record)
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MetricUnit {
    Count,
    Percent,
    None,
}

/// Maximum length of a dimension value after sanitization.
pub const MAX_DIMENSION_LEN: usize = 255;

/// A single metric observation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricDatum {
    pub name: String,
    pub value: f64,
    pub unit: MetricUnit,
    pub dimensions: BTreeMap<String, String>,
    pub timestamp: DateTime<Utc>,
}

impl MetricDatum {
    pub fn new(name: impl Into<String>, value: f64, unit: MetricUnit) -> Self {
        Self {
            name: name.into(),
            value,
            unit,
            dimensions: BTreeMap::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn count(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, value, MetricUnit::Count)
    }

    pub fn percent(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, value, MetricUnit::Percent)
    }

    /// Attach a dimension. The value is passed through
    /// [`sanitize_dimension`].
    pub fn with_dimension(mut self, name: impl Into<String>, value: &str) -> Self {
        self.dimensions.insert(name.into(), sanitize_dimension(value));
        self
    }

    pub fn dimension(&self, name: &str) -> Option<&str> {
        self.dimensions.get(name).map(String::as_str)
    }
}

/// Keep alphanumerics, space, `.`, `_` and `-`; cap the length and trim.
pub fn sanitize_dimension(value: &str) -> String {
    let kept: String = value
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '.' | '_' | '-'))
        .take(MAX_DIMENSION_LEN)
        .collect();
    kept.trim().to_string()
}

pub trait MetricsSink: Send + Sync {
    fn record(&self, datum: MetricDatum) -> Result<(), SinkError>;
}

impl<T: MetricsSink + ?Sized> MetricsSink for Arc<T> {
    fn record(&self, datum: MetricDatum) -> Result<(), SinkError> {
        (**self).record(datum)
    }
}
