//! Log and metrics sink implementations.

use parking_lot::Mutex;
use tracing::{debug, info, warn};
use vigil_core::sink::{LogRecord, LogSink, MetricDatum, MetricsSink, SinkError};

// ---------------------------------------------------------------------------
// Log sinks
// ---------------------------------------------------------------------------

/// Writes each record as a structured `tracing` event on target
/// `vigil::sink`. Pair with a JSON subscriber to ship records to a log
/// collector.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn emit(&self, record: &LogRecord) -> Result<(), SinkError> {
        let body = serde_json::to_string(record)
            .map_err(|e| SinkError::Rejected(format!("serialize record: {e}")))?;
        info!(
            target: "vigil::sink",
            log_type = %record.kind,
            group = %record.group,
            record = %body,
            "security record"
        );
        Ok(())
    }
}

/// Collects records in memory.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl LogSink for MemoryLogSink {
    fn emit(&self, record: &LogRecord) -> Result<(), SinkError> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogSink;

impl LogSink for NoopLogSink {
    fn emit(&self, _record: &LogRecord) -> Result<(), SinkError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Metrics sinks
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryMetricsSink {
    data: Mutex<Vec<MetricDatum>>,
}

impl MemoryMetricsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> Vec<MetricDatum> {
        self.data.lock().clone()
    }

    /// Sum of values recorded under `name`.
    pub fn total(&self, name: &str) -> f64 {
        self.data
            .lock()
            .iter()
            .filter(|d| d.name == name)
            .map(|d| d.value)
            .sum()
    }
}

impl MetricsSink for MemoryMetricsSink {
    fn record(&self, datum: MetricDatum) -> Result<(), SinkError> {
        self.data.lock().push(datum);
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetricsSink;

impl MetricsSink for NoopMetricsSink {
    fn record(&self, _datum: MetricDatum) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Backend that accepts batches of metric data for one namespace.
pub trait MetricsPublisher: Send + Sync {
    fn publish(&self, namespace: &str, batch: &[MetricDatum]) -> Result<(), SinkError>;
}

/// Maximum data points per publish call.
pub const METRICS_BATCH_SIZE: usize = 20;

/// Default buffer capacity before new data is rejected.
pub const DEFAULT_MAX_BUFFER: usize = 1000;

/// Result of a [`BufferedMetricsSink::flush`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlushOutcome {
    pub sent: usize,
    pub failed: usize,
}

impl FlushOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Buffers metric data and publishes it in batches of
/// [`METRICS_BATCH_SIZE`] on [`flush`](Self::flush).
pub struct BufferedMetricsSink<P: MetricsPublisher> {
    namespace: String,
    publisher: P,
    max_buffer: usize,
    buffer: Mutex<Vec<MetricDatum>>,
}

impl<P: MetricsPublisher> BufferedMetricsSink<P> {
    pub fn new(namespace: impl Into<String>, publisher: P) -> Self {
        Self::with_capacity(namespace, publisher, DEFAULT_MAX_BUFFER)
    }

    pub fn with_capacity(namespace: impl Into<String>, publisher: P, max_buffer: usize) -> Self {
        Self {
            namespace: namespace.into(),
            publisher,
            max_buffer,
            buffer: Mutex::new(Vec::new()),
        }
    }

    pub fn buffered(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Drain the buffer and publish it. A failed batch is dropped and
    /// counted; remaining batches are still attempted.
    pub fn flush(&self) -> FlushOutcome {
        let pending = std::mem::take(&mut *self.buffer.lock());
        if pending.is_empty() {
            return FlushOutcome::default();
        }

        let mut outcome = FlushOutcome::default();
        for batch in pending.chunks(METRICS_BATCH_SIZE) {
            match self.publisher.publish(&self.namespace, batch) {
                Ok(()) => outcome.sent += batch.len(),
                Err(e) => {
                    warn!(namespace = %self.namespace, size = batch.len(), error = %e, "Metrics batch failed");
                    outcome.failed += batch.len();
                }
            }
        }

        debug!(
            namespace = %self.namespace,
            sent = outcome.sent,
            failed = outcome.failed,
            "Flushed metrics"
        );
        outcome
    }
}

impl<P: MetricsPublisher> MetricsSink for BufferedMetricsSink<P> {
    fn record(&self, datum: MetricDatum) -> Result<(), SinkError> {
        let mut buffer = self.buffer.lock();
        if buffer.len() >= self.max_buffer {
            return Err(SinkError::Rejected(format!(
                "metrics buffer full ({} data points)",
                self.max_buffer
            )));
        }
        buffer.push(datum);
        Ok(())
    }
}
