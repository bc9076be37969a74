//! Human-readable activity trail.
//!
//! The board engine records one entry per gesture step (drag started, drop
//! committed, gate confirmed or cancelled). Hosts show it verbatim; the CLI
//! prints it under `logs` with `--verbose`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl LogEntry {
    pub fn new(message: String) -> Self {
        Self {
            timestamp: Utc::now(),
            message,
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// Anything that keeps an activity trail.
pub trait Loggable {
    fn add_log(&mut self, message: String);
    /// Oldest first.
    fn get_logs(&self) -> &[LogEntry];
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn display_prefixes_the_time_of_day() {
        let entry = LogEntry {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 5).unwrap(),
            message: "Moved A from TODO to DONE".to_string(),
        };
        assert_eq!(entry.to_string(), "[09:30:05] Moved A from TODO to DONE");
    }

    #[test]
    fn entries_serialize_with_rfc3339_timestamps() {
        let entry = LogEntry {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 5).unwrap(),
            message: "Started dragging A from TODO".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["timestamp"], "2024-05-01T09:30:05Z");
        assert_eq!(json["message"], "Started dragging A from TODO");
    }
}
