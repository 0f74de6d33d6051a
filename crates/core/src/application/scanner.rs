// Probe Registry Scanner
//
// Lists every stored probe and re-derives its liveness from the OS. A record
// that cannot be read is skipped with a warning instead of failing the scan.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{ProbeDuration, ProbeRecord, RecurrencePolicy};
use crate::error::Result;
use crate::port::{LivenessProber, ProbeStore, ProcessState, TimeProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Running,
    Stopped,
    Unknown,
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Running => write!(f, "running"),
            ProbeStatus::Stopped => write!(f, "stopped"),
            ProbeStatus::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRow {
    pub name: String,
    pub group: String,
    pub pid: i32,
    pub created_at: DateTime<Utc>,
    pub duration: ProbeDuration,
    pub policy: RecurrencePolicy,
    /// Time since the probe was scheduled, whole seconds
    pub elapsed: ProbeDuration,
    pub status: ProbeStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub rows: Vec<StatusRow>,
    pub warnings: Vec<ScanWarning>,
}

impl ScanReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.warnings.is_empty()
    }
}

pub struct ProbeScanner {
    store: Arc<dyn ProbeStore>,
    prober: Arc<dyn LivenessProber>,
    time_provider: Arc<dyn TimeProvider>,
}

impl ProbeScanner {
    pub fn new(
        store: Arc<dyn ProbeStore>,
        prober: Arc<dyn LivenessProber>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            store,
            prober,
            time_provider,
        }
    }

    /// One row per readable record, sorted by probe name
    pub async fn scan(&self) -> Result<ScanReport> {
        let mut names = self.store.list().await?;
        names.sort();

        let now = self.time_provider.now();
        let mut report = ScanReport::default();

        for name in names {
            match self.store.get(&name).await {
                Ok(record) => report.rows.push(self.row(record, now)),
                Err(e) => {
                    warn!(probe = %name, error = %e, "Skipping unreadable probe record");
                    report.warnings.push(ScanWarning {
                        name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    /// Classify a recorded PID
    pub fn classify(&self, pid: i32) -> ProbeStatus {
        match self.prober.is_alive(pid) {
            Err(e) => {
                debug!(pid = %pid, error = %e, "Liveness probe failed");
                ProbeStatus::Unknown
            }
            Ok(false) => ProbeStatus::Stopped,
            Ok(true) => match self.prober.process_state(pid) {
                ProcessState::Defunct | ProcessState::Suspended => ProbeStatus::Stopped,
                ProcessState::Runnable | ProcessState::Unknown => ProbeStatus::Running,
            },
        }
    }

    fn row(&self, record: ProbeRecord, now: DateTime<Utc>) -> StatusRow {
        let elapsed_secs = (now - record.created_at).num_seconds().max(0) as u64;
        StatusRow {
            status: self.classify(record.pid),
            policy: record.policy(),
            elapsed: ProbeDuration::from_secs(elapsed_secs),
            name: record.name,
            group: record.group,
            pid: record.pid,
            created_at: record.created_at,
            duration: record.duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::liveness::mocks::FakeProcessTable;
    use crate::port::probe_store::mocks::InMemoryProbeStore;
    use crate::port::time_provider::mocks::FixedTimeProvider;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn record(name: &str, pid: i32) -> ProbeRecord {
        ProbeRecord {
            name: name.to_string(),
            group: "work".to_string(),
            script: "true".to_string(),
            log_path: PathBuf::from(format!("/logs/{}.log", name)),
            duration: ProbeDuration::from_secs(300),
            recurrent: false,
            iterations: 0,
            pid,
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap(),
            notify_only: false,
        }
    }

    fn scanner(
        store: Arc<InMemoryProbeStore>,
        procs: Arc<FakeProcessTable>,
    ) -> (ProbeScanner, Arc<FixedTimeProvider>) {
        let clock = Arc::new(FixedTimeProvider::new(
            Utc.with_ymd_and_hms(2025, 6, 1, 8, 1, 30).unwrap(),
        ));
        (ProbeScanner::new(store, procs, clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_empty_store_scans_empty() {
        let (scanner, _) = scanner(
            Arc::new(InMemoryProbeStore::new()),
            Arc::new(FakeProcessTable::new()),
        );

        let report = scanner.scan().await.unwrap();
        assert!(report.rows.is_empty());
        assert!(report.warnings.is_empty());
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_record_yields_one_warning() {
        let store = Arc::new(InMemoryProbeStore::new());
        for (i, name) in ["alpha", "beta", "gamma"].iter().enumerate() {
            store.put(&record(name, 100 + i as i32)).await.unwrap();
        }
        store.insert_corrupt("broken", "expected value at line 1 column 1");

        let (scanner, _) = scanner(store, Arc::new(FakeProcessTable::new()));
        let report = scanner.scan().await.unwrap();

        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].name, "broken");
        let names: Vec<_> = report.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    }

    #[tokio::test]
    async fn test_status_classification() {
        let store = Arc::new(InMemoryProbeStore::new());
        store.put(&record("live", 10)).await.unwrap();
        store.put(&record("gone", 11)).await.unwrap();
        store.put(&record("zombie", 12)).await.unwrap();
        store.put(&record("paused", 13)).await.unwrap();
        store.put(&record("denied", 14)).await.unwrap();

        let procs = Arc::new(FakeProcessTable::new());
        procs.spawn(10);
        procs.spawn_with_state(12, ProcessState::Defunct);
        procs.spawn_with_state(13, ProcessState::Suspended);
        procs.fail_probe(14, "EINVAL");

        let (scanner, _) = scanner(store, procs);
        let report = scanner.scan().await.unwrap();
        let status = |name: &str| {
            report
                .rows
                .iter()
                .find(|r| r.name == name)
                .map(|r| r.status)
                .unwrap()
        };

        assert_eq!(status("live"), ProbeStatus::Running);
        assert_eq!(status("gone"), ProbeStatus::Stopped);
        assert_eq!(status("zombie"), ProbeStatus::Stopped);
        assert_eq!(status("paused"), ProbeStatus::Stopped);
        assert_eq!(status("denied"), ProbeStatus::Unknown);
    }

    #[tokio::test]
    async fn test_elapsed_since_creation() {
        let store = Arc::new(InMemoryProbeStore::new());
        store.put(&record("focus", 10)).await.unwrap();

        let (scanner, clock) = scanner(store, Arc::new(FakeProcessTable::new()));
        let report = scanner.scan().await.unwrap();
        assert_eq!(report.rows[0].elapsed.to_string(), "1m30s");

        clock.advance(chrono::Duration::hours(1));
        let report = scanner.scan().await.unwrap();
        assert_eq!(report.rows[0].elapsed.to_string(), "1h1m30s");
    }
}
