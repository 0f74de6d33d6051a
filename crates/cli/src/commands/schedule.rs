use colored::Colorize;
use std::process::ExitCode;
use std::sync::Arc;

use hypnos_core::application::ProbeSupervisor;
use hypnos_core::error::Result;
use hypnos_infra_system::DetachedSpawner;

use super::Context;
use crate::preset::{self, ScheduleArgs};

pub async fn run(ctx: &Context, args: ScheduleArgs) -> Result<ExitCode> {
    let request = preset::resolve_from_dir(&ctx.dirs.config, args)?;

    let supervisor = ProbeSupervisor::new(
        ctx.store.clone(),
        Arc::new(DetachedSpawner::current_exe()?),
        ctx.time_provider.clone(),
        &ctx.dirs.log,
    );
    let record = supervisor.schedule(request).await?;

    println!(
        "{} Probe {:?} scheduled (pid {}, every {}, {})",
        "✓".green().bold(),
        record.name,
        record.pid,
        record.duration,
        record.policy()
    );
    Ok(ExitCode::SUCCESS)
}
