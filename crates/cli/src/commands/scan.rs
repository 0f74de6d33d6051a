use chrono::{Local, SecondsFormat};
use colored::Colorize;
use std::process::ExitCode;
use std::sync::Arc;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use hypnos_core::application::{ProbeScanner, ScanReport, StatusRow};
use hypnos_core::error::Result;
use hypnos_infra_system::UnixProcessTable;

use super::Context;

#[derive(Tabled)]
struct ProbeRow {
    #[tabled(rename = "PROBE")]
    name: String,
    #[tabled(rename = "GROUP")]
    group: String,
    #[tabled(rename = "PID")]
    pid: i32,
    #[tabled(rename = "QUIESCENCE")]
    quiescence: String,
    #[tabled(rename = "DURATION")]
    duration: String,
    #[tabled(rename = "ELAPSED")]
    elapsed: String,
    #[tabled(rename = "POLICY")]
    policy: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

impl From<&StatusRow> for ProbeRow {
    fn from(row: &StatusRow) -> Self {
        Self {
            name: row.name.clone(),
            group: if row.group.is_empty() {
                "-".to_string()
            } else {
                row.group.clone()
            },
            pid: row.pid,
            quiescence: row
                .created_at
                .with_timezone(&Local)
                .to_rfc3339_opts(SecondsFormat::Secs, false),
            duration: row.duration.to_string(),
            elapsed: row.elapsed.to_string(),
            policy: row.policy.to_string(),
            status: row.status.to_string(),
        }
    }
}

pub fn render(report: &ScanReport) -> String {
    let rows: Vec<ProbeRow> = report.rows.iter().map(ProbeRow::from).collect();
    Table::new(rows).with(Style::blank()).to_string()
}

pub async fn run(ctx: &Context) -> Result<ExitCode> {
    let scanner = ProbeScanner::new(
        ctx.store.clone(),
        Arc::new(UnixProcessTable::new()),
        ctx.time_provider.clone(),
    );
    let report = scanner.scan().await?;

    for warning in &report.warnings {
        eprintln!(
            "{} skipped {:?}: {}",
            "!".yellow().bold(),
            warning.name,
            warning.reason
        );
    }

    if report.rows.is_empty() {
        println!("{}", "No probes registered".cyan());
    } else {
        println!("{}", render(&report));
    }
    Ok(ExitCode::SUCCESS)
}
