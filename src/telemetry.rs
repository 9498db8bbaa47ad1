//! Application telemetry events and sinks.
//!
//! Stockwell is a thin client over the ERP backend, but it still benefits
//! from lightweight telemetry to support debugging and to capture
//! operational signals such as submission outcomes. Nothing here is
//! transmitted anywhere; sinks write locally or drop events.

use std::io;

use serde::{Deserialize, Serialize};

/// A structured telemetry event emitted by Stockwell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// Records the outcome of an approve or reject submission.
    SubmissionRecorded {
        /// Request label (e.g. `MIF #42`).
        request: String,
        /// Decision submitted (`approve` or `reject`).
        decision: String,
        /// Number of line items carried in the submission.
        line_count: usize,
        /// Whether the backend acknowledged the submission.
        accepted: bool,
    },
    /// Records a completed decision-record export.
    ExportCompleted {
        /// Output format (`markdown` or `jsonl`).
        format: String,
        /// Number of line entries written.
        entry_count: usize,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
///
/// This is intended for local debugging and is not transmitted anywhere.
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

#[cfg(test)]
mod tests {
    use super::{TelemetryEvent, TelemetrySink};

    #[derive(Debug, Default)]
    struct RecordingSink {
        events: std::sync::Mutex<Vec<TelemetryEvent>>,
    }

    impl RecordingSink {
        fn take(&self) -> Vec<TelemetryEvent> {
            self.events
                .lock()
                .expect("events mutex should be available")
                .drain(..)
                .collect()
        }
    }

    impl TelemetrySink for RecordingSink {
        fn record(&self, event: TelemetryEvent) {
            self.events
                .lock()
                .expect("events mutex should be available")
                .push(event);
        }
    }

    #[test]
    fn recording_sink_captures_events() {
        let sink = RecordingSink::default();
        sink.record(TelemetryEvent::SubmissionRecorded {
            request: "MIF #42".to_owned(),
            decision: "approve".to_owned(),
            line_count: 2,
            accepted: true,
        });

        assert_eq!(
            sink.take(),
            vec![TelemetryEvent::SubmissionRecorded {
                request: "MIF #42".to_owned(),
                decision: "approve".to_owned(),
                line_count: 2,
                accepted: true,
            }]
        );
    }

    #[test]
    fn events_serialise_with_snake_case_tags() {
        let event = TelemetryEvent::ExportCompleted {
            format: "jsonl".to_owned(),
            entry_count: 3,
        };

        let value = serde_json::to_value(&event).expect("event should serialise");
        assert_eq!(value["type"], "export_completed");
        assert_eq!(value["entry_count"], 3);
    }
}
