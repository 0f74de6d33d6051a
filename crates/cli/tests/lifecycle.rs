//! End-to-end probe lifecycle against the real `hypnos` binary
//!
//! Each test gets its own HYPNOS_HOME and a PATH whose first entry holds a
//! fake `notify-send`, so no desktop notification is ever shown.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::thread::sleep;
use std::time::{Duration, Instant};

struct Sandbox {
    _tmp: tempfile::TempDir,
    home: PathBuf,
    bin: PathBuf,
    notifications: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path().join("hypnos-home");
        let bin = tmp.path().join("bin");
        let notifications = tmp.path().join("notifications.txt");
        fs::create_dir_all(&bin).unwrap();

        let fake = bin.join("notify-send");
        fs::write(
            &fake,
            format!(
                "#!/bin/sh\nprintf '%s|%s\\n' \"$2\" \"$3\" >> '{}'\n",
                notifications.display()
            ),
        )
        .unwrap();
        fs::set_permissions(&fake, fs::Permissions::from_mode(0o755)).unwrap();

        Self {
            _tmp: tmp,
            home,
            bin,
            notifications,
        }
    }

    fn hypnos(&self, args: &[&str]) -> Output {
        self.hypnos_with_filter(args, None)
    }

    fn hypnos_with_filter(&self, args: &[&str], rust_log: Option<&str>) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_hypnos"));
        cmd.args(args)
            .env("HYPNOS_HOME", &self.home)
            .env("PATH", format!("{}:/usr/bin:/bin", self.bin.display()));
        match rust_log {
            Some(filter) => cmd.env("RUST_LOG", filter),
            None => cmd.env_remove("RUST_LOG"),
        };
        cmd.output().unwrap()
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.home.join("probe").join(format!("{}.json", name))
    }

    fn log_path(&self, name: &str) -> PathBuf {
        self.home.join("log").join(format!("{}.log", name))
    }

    fn record(&self, name: &str) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(self.record_path(name)).unwrap()).unwrap()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn wait_for(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        sleep(Duration::from_millis(100));
    }
    check()
}

fn file_contains(path: &Path, needle: &str) -> bool {
    fs::read_to_string(path)
        .map(|s| s.contains(needle))
        .unwrap_or(false)
}

#[test]
fn test_single_shot_probe_fires_then_is_terminated() {
    let sb = Sandbox::new();
    let marker = sb.home.join("fired.txt");
    let script = format!("echo fired > '{}'", marker.display());

    let out = sb.hypnos(&[
        "schedule",
        "--probe",
        "focus",
        "--script",
        &script,
        "--duration",
        "1s",
        "--iterations",
        "1",
    ]);
    assert!(out.status.success(), "{:?}", out);
    assert!(stdout(&out).contains("scheduled"));

    let record = sb.record("focus");
    assert_eq!(record["probe"], "focus");
    assert_eq!(record["duration"], "1s");
    assert_eq!(record["iterations"], 1);
    assert_eq!(record["notify"], false);
    assert_eq!(
        record["log_path"].as_str().unwrap(),
        sb.log_path("focus").to_str().unwrap()
    );

    let log = sb.log_path("focus");
    assert!(
        wait_for(Duration::from_secs(15), || file_contains(
            &log,
            "fully complete (ran 1 times)"
        )),
        "worker never finished: {:?}",
        fs::read_to_string(&log)
    );
    assert!(file_contains(&log, "timer fired, executing script"));
    assert!(file_contains(&log, "script succeeded"));
    assert!(file_contains(&log, "timer fired, sending notification"));
    assert_eq!(fs::read_to_string(&marker).unwrap(), "fired\n");
    #[cfg(target_os = "linux")]
    assert!(file_contains(&sb.notifications, "Hypnos-focus|Downtime complete"));

    // the engine never deletes its own record
    assert!(
        wait_for(Duration::from_secs(5), || {
            let scan = stdout(&sb.hypnos(&["scan"]));
            scan.contains("focus") && scan.contains("stopped")
        }),
        "scan never reported the finished probe as stopped"
    );
    assert!(sb.record_path("focus").exists());

    let out = sb.hypnos(&["terminate", "focus"]);
    assert!(out.status.success(), "{:?}", out);
    assert!(stdout(&out).contains("was not running"));
    assert!(!sb.record_path("focus").exists());
    assert!(!log.exists());

    // a second termination finds nothing, but never a signal error
    let out = sb.hypnos(&["terminate", "focus"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Not found"));
}

#[test]
fn test_running_probe_is_signalled_by_purge() {
    let sb = Sandbox::new();

    let out = sb.hypnos(&[
        "hibernate", "--probe", "long", "--notify", "--duration", "1h", "--recurrent",
    ]);
    assert!(out.status.success(), "{:?}", out);
    let pid = sb.record("long")["pid"].as_i64().unwrap();
    assert!(pid > 0);

    assert!(wait_for(Duration::from_secs(5), || stdout(&sb.hypnos(&["scan"]))
        .contains("running")));

    let out = sb.hypnos(&["purge", "long"]);
    assert!(out.status.success(), "{:?}", out);
    assert!(stdout(&out).contains("terminated"));
    assert!(!sb.record_path("long").exists());
    assert!(!sb.log_path("long").exists());

    let out = sb.hypnos(&["scan"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("No probes registered"));
}

#[test]
fn test_validation_failures_exit_2_without_side_effects() {
    let sb = Sandbox::new();

    let out = sb.hypnos(&["schedule", "--probe", "nothing-to-do", "--duration", "5s"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("--script"));
    assert!(!sb.record_path("nothing-to-do").exists());

    let out = sb.hypnos(&[
        "schedule", "--probe", "bad", "--script", "true", "--duration", "soon",
    ]);
    assert_eq!(out.status.code(), Some(2));
    assert!(!sb.record_path("bad").exists());

    let out = sb.hypnos(&["schedule", "--script", "true"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_scan_on_fresh_home_is_empty() {
    let sb = Sandbox::new();

    let out = sb.hypnos(&["scan"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("No probes registered"));
}

#[test]
fn test_terminate_all_with_nothing_registered_fails() {
    let sb = Sandbox::new();

    let out = sb.hypnos(&["terminate", "--all"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_awaken_preset_then_group_purge() {
    let sb = Sandbox::new();

    let presets = sb.home.join("config").join("hypnos.toml");
    let out = sb.hypnos(&["awaken", "--output", presets.to_str().unwrap()]);
    assert!(out.status.success(), "{:?}", out);
    for dir in ["config", "log", "probe"] {
        assert!(sb.home.join(dir).is_dir());
    }
    assert!(file_contains(&presets, "[workflows.focus]"));

    // flags override the preset's 25m
    let out = sb.hypnos(&["schedule", "focus", "--duration", "1h"]);
    assert!(out.status.success(), "{:?}", out);

    let record = sb.record("focus");
    assert_eq!(record["group"], "work");
    assert_eq!(record["duration"], "1h");
    assert_eq!(record["iterations"], 4);

    let out = sb.hypnos(&["terminate", "--group", "work"]);
    assert!(out.status.success(), "{:?}", out);
    assert!(!sb.record_path("focus").exists());

    let out = sb.hypnos(&["terminate", "--group", "work"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_awaken_prints_presets_to_stdout() {
    let sb = Sandbox::new();

    let out = sb.hypnos(&["awaken"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("[workflows.stretch]"));
}

#[test]
fn test_worker_diagnostics_in_log_are_plain_text() {
    let sb = Sandbox::new();

    let out = sb.hypnos_with_filter(
        &[
            "schedule", "--probe", "plain", "--script", "true", "--duration", "1s",
            "--iterations", "1",
        ],
        Some("debug"),
    );
    assert!(out.status.success(), "{:?}", out);

    let log = sb.log_path("plain");
    assert!(wait_for(Duration::from_secs(15), || file_contains(
        &log,
        "Worker finished"
    )));
    let content = fs::read_to_string(&log).unwrap();
    assert!(content.contains("Worker starting"));
    assert!(!content.contains('\u{1b}'), "escape codes in log: {:?}", content);

    sb.hypnos(&["terminate", "plain"]);
}

#[test]
fn test_stasis_keeps_log_and_drops_record() {
    let sb = Sandbox::new();

    let out = sb.hypnos(&[
        "schedule", "--probe", "nap", "--notify", "--duration", "1h",
    ]);
    assert!(out.status.success(), "{:?}", out);
    assert!(wait_for(Duration::from_secs(5), || file_contains(
        &sb.log_path("nap"),
        "started"
    )));

    let out = sb.hypnos(&["stasis", "nap", "ghost"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).contains("placed in stasis"));
    assert!(String::from_utf8_lossy(&out.stderr).contains("ghost"));

    assert!(!sb.record_path("nap").exists());
    assert!(sb.log_path("nap").exists());
    assert!(stdout(&sb.hypnos(&["scan"])).contains("No probes registered"));
}
