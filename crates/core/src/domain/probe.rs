// Probe Domain Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::domain::error::DomainError;
use crate::domain::ProbeDuration;

/// How many times a probe fires
///
/// A positive `iterations` wins over `recurrent`. With `iterations == 0` the
/// probe fires once, or forever when `recurrent` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecurrencePolicy {
    pub recurrent: bool,
    pub iterations: u32,
}

impl RecurrencePolicy {
    pub fn new(recurrent: bool, iterations: u32) -> Self {
        Self {
            recurrent,
            iterations,
        }
    }

    /// Whether the engine is finished after `completed` fire cycles
    pub fn is_exhausted(&self, completed: u32) -> bool {
        if self.iterations > 0 {
            completed >= self.iterations
        } else {
            !self.recurrent
        }
    }
}

impl fmt::Display for RecurrencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.iterations, self.recurrent) {
            (0, true) => write!(f, "recurrent"),
            (0, false) | (1, _) => write!(f, "once"),
            (n, _) => write!(f, "{}x", n),
        }
    }
}

/// Persisted state of one scheduled probe
///
/// Field names on the wire are a contract shared by every command that reads
/// `probe/<name>.json`, hence the renames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRecord {
    #[serde(rename = "probe")]
    pub name: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub script: String,
    pub log_path: PathBuf,
    pub duration: ProbeDuration,
    #[serde(default)]
    pub recurrent: bool,
    #[serde(default)]
    pub iterations: u32,
    pub pid: i32,
    #[serde(rename = "quiescence")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "notify", default)]
    pub notify_only: bool,
}

impl ProbeRecord {
    pub fn policy(&self) -> RecurrencePolicy {
        RecurrencePolicy::new(self.recurrent, self.iterations)
    }
}

/// Check that a probe name can double as a file key under the probe directory
pub fn validate_probe_name(name: &str) -> Result<(), DomainError> {
    let invalid = name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0'])
        || name.chars().any(char::is_control);
    if invalid {
        return Err(DomainError::InvalidProbeName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_record() -> ProbeRecord {
        ProbeRecord {
            name: "focus".to_string(),
            group: "work".to_string(),
            script: "say done".to_string(),
            log_path: PathBuf::from("/home/me/.hypnos/log/focus.log"),
            duration: ProbeDuration::from_secs(90 * 60),
            recurrent: true,
            iterations: 3,
            pid: 4242,
            created_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
            notify_only: false,
        }
    }

    #[test]
    fn test_policy_iterations_take_precedence() {
        let policy = RecurrencePolicy::new(true, 3);
        assert!(!policy.is_exhausted(1));
        assert!(!policy.is_exhausted(2));
        assert!(policy.is_exhausted(3));

        let policy = RecurrencePolicy::new(false, 3);
        assert!(!policy.is_exhausted(2));
        assert!(policy.is_exhausted(3));
    }

    #[test]
    fn test_policy_single_and_unbounded() {
        assert!(RecurrencePolicy::new(false, 0).is_exhausted(1));

        let forever = RecurrencePolicy::new(true, 0);
        assert!(!forever.is_exhausted(1));
        assert!(!forever.is_exhausted(10_000));
    }

    #[test]
    fn test_wire_field_names() {
        let value = serde_json::to_value(sample_record()).unwrap();
        let obj = value.as_object().unwrap();

        for key in [
            "probe",
            "group",
            "script",
            "log_path",
            "duration",
            "recurrent",
            "iterations",
            "pid",
            "quiescence",
            "notify",
        ] {
            assert!(obj.contains_key(key), "missing wire field {}", key);
        }
        assert_eq!(obj["duration"], "1h30m");
        assert_eq!(obj["quiescence"], "2025-03-14T09:26:53Z");
    }

    #[test]
    fn test_record_round_trip() {
        let record = sample_record();
        let json = serde_json::to_string_pretty(&record).unwrap();
        let back: ProbeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{
            "probe": "mail",
            "log_path": "/tmp/mail.log",
            "duration": "5s",
            "pid": 7,
            "quiescence": "2025-01-01T00:00:00Z"
        }"#;
        let record: ProbeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.group, "");
        assert_eq!(record.iterations, 0);
        assert!(!record.notify_only);
        assert_eq!(record.policy(), RecurrencePolicy::new(false, 0));
    }

    #[test]
    fn test_probe_name_rules() {
        assert!(validate_probe_name("focus").is_ok());
        assert!(validate_probe_name("focus-2025_01").is_ok());
        for bad in ["", ".hidden", "..", "a/b", "a\\b", "tab\tname"] {
            assert!(validate_probe_name(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_policy_display() {
        assert_eq!(RecurrencePolicy::new(false, 0).to_string(), "once");
        assert_eq!(RecurrencePolicy::new(true, 0).to_string(), "recurrent");
        assert_eq!(RecurrencePolicy::new(true, 4).to_string(), "4x");
    }
}
