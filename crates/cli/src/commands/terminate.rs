use colored::Colorize;
use std::process::ExitCode;
use std::sync::Arc;

use hypnos_core::application::{BatchTermination, LogCleanup, ProbeTerminator, TerminationOutcome};
use hypnos_core::error::{AppError, Result};
use hypnos_core::port::SignalDelivery;
use hypnos_infra_system::UnixProcessTable;

use super::Context;

/// Which probes to terminate; exactly one is given
#[derive(Debug, Clone)]
pub enum Target {
    Probe(String),
    All,
    Group(String),
}

fn print_outcome(outcome: &TerminationOutcome) {
    let action = match outcome.log_cleanup {
        LogCleanup::Kept => "placed in stasis",
        _ => "terminated",
    };
    match outcome.delivery {
        SignalDelivery::Delivered => println!(
            "{} Probe {:?} {} (pid {})",
            "✓".green().bold(),
            outcome.name,
            action,
            outcome.pid
        ),
        SignalDelivery::AlreadyGone => println!(
            "{} Probe {:?} was not running (pid {}), record removed",
            "!".yellow().bold(),
            outcome.name,
            outcome.pid
        ),
    }
    match &outcome.log_cleanup {
        LogCleanup::Failed(reason) => eprintln!(
            "{} could not remove {}: {}",
            "!".yellow().bold(),
            outcome.log_path.display(),
            reason
        ),
        LogCleanup::Kept => println!("  log kept at {}", outcome.log_path.display()),
        LogCleanup::Removed | LogCleanup::Missing => {}
    }
}

fn print_failure(name: &str, err: &AppError) {
    eprintln!("{} Probe {:?}: {}", "✗".red().bold(), name, err);
}

pub(super) fn report(batch: &BatchTermination) -> ExitCode {
    for (name, reason) in &batch.skipped {
        eprintln!("{} skipped {:?}: {}", "!".yellow().bold(), name, reason);
    }
    for (name, result) in &batch.results {
        match result {
            Ok(outcome) => print_outcome(outcome),
            Err(e) => print_failure(name, e),
        }
    }

    if batch.results.is_empty() {
        eprintln!("{}", "No probes to terminate".yellow());
    }
    if batch.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

pub async fn run(ctx: &Context, target: Target) -> Result<ExitCode> {
    let terminator = ProbeTerminator::new(
        ctx.store.clone(),
        Arc::new(UnixProcessTable::new()),
        ctx.logs.clone(),
    );

    match target {
        Target::Probe(name) => {
            let outcome = terminator.terminate(&name).await?;
            print_outcome(&outcome);
            Ok(ExitCode::SUCCESS)
        }
        Target::All => Ok(report(&terminator.terminate_all().await?)),
        Target::Group(group) => Ok(report(&terminator.terminate_group(&group).await?)),
    }
}
