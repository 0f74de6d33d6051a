//! Hypnos CLI - schedule, inspect and terminate downtime probes
//!
//! Every invocation is short-lived except the hidden worker subcommand, which
//! the launcher starts detached and which runs one probe's timer loop.

mod commands;
mod config;
mod preset;
mod telemetry;

use clap::{ArgGroup, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use commands::terminate::Target;
use commands::worker::WorkerArgs;
use commands::Context;
use hypnos_core::error::AppError;
use preset::ScheduleArgs;

#[derive(Parser)]
#[command(name = "hypnos")]
#[command(about = "Downtime timers that run a script and notify you when time is up", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug-level diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the ~/.hypnos layout and print example workflow presets
    Awaken {
        /// Write the example presets here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start a detached downtime probe
    #[command(visible_alias = "hibernate")]
    Schedule {
        /// Workflow preset from ~/.hypnos/config/*.toml
        workflow: Option<String>,

        /// Probe name (defaults to the workflow name)
        #[arg(long)]
        probe: Option<String>,

        /// Group label for batch termination
        #[arg(short, long)]
        group: Option<String>,

        /// Shell snippet to run when the timer fires
        #[arg(short, long, allow_hyphen_values = true)]
        script: Option<String>,

        /// Log file name under ~/.hypnos/log (without extension)
        #[arg(short, long)]
        log: Option<String>,

        /// Wait interval, e.g. 25m, 1h30m, 90s
        #[arg(short, long)]
        duration: Option<String>,

        /// Restart the timer after every fire
        #[arg(short, long)]
        recurrent: bool,

        /// Fire exactly this many times (overrides --recurrent)
        #[arg(short, long)]
        iterations: Option<u32>,

        /// Only notify, skip the script
        #[arg(short, long)]
        notify: bool,
    },

    /// Show every registered probe and whether its worker is alive
    Scan,

    /// Stop probes and delete their records and logs
    #[command(visible_alias = "purge")]
    #[command(group(ArgGroup::new("target").required(true).args(["name", "all", "group"])))]
    Terminate {
        /// Probe name
        name: Option<String>,

        /// Every registered probe
        #[arg(long)]
        all: bool,

        /// Every probe in this group
        #[arg(short, long)]
        group: Option<String>,
    },

    /// Stop probes and delete their records, keeping their logs
    Stasis {
        /// Probe names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Worker entrypoint started by `schedule`
    #[command(name = "hibernate-run", hide = true)]
    HibernateRun {
        #[arg(long)]
        probe: String,

        #[arg(long, default_value = "", allow_hyphen_values = true)]
        script: String,

        #[arg(long)]
        duration: String,

        #[arg(long, default_value_t = 0)]
        iterations: u32,

        #[arg(long)]
        log_path: PathBuf,

        #[arg(long)]
        recurrent: bool,

        #[arg(long)]
        notify: bool,
    },
}

async fn dispatch(command: Commands) -> Result<ExitCode, AppError> {
    let dirs = config::resolve_dirs();
    debug!(root = %dirs.root.display(), "Resolved state directory");

    match command {
        Commands::Awaken { output } => commands::awaken::run(&dirs, output.as_deref()).await,
        Commands::Schedule {
            workflow,
            probe,
            group,
            script,
            log,
            duration,
            recurrent,
            iterations,
            notify,
        } => {
            let args = ScheduleArgs {
                workflow,
                probe,
                group,
                script,
                log,
                duration,
                recurrent,
                iterations,
                notify,
            };
            commands::schedule::run(&Context::new(dirs), args).await
        }
        Commands::Scan => commands::scan::run(&Context::new(dirs)).await,
        Commands::Terminate { name, all, group } => {
            let target = match (name, group) {
                (Some(name), _) => Target::Probe(name),
                (None, Some(group)) => Target::Group(group),
                (None, None) if all => Target::All,
                (None, None) => {
                    return Err(AppError::validation("all", "or a probe name is required"))
                }
            };
            commands::terminate::run(&Context::new(dirs), target).await
        }
        Commands::Stasis { names } => commands::stasis::run(&Context::new(dirs), &names).await,
        Commands::HibernateRun {
            probe,
            script,
            duration,
            iterations,
            log_path,
            recurrent,
            notify,
        } => {
            commands::worker::run(WorkerArgs {
                probe,
                script,
                duration,
                iterations,
                recurrent,
                notify,
                log_path,
            })
            .await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init_logging(cli.verbose);

    match dispatch(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
