use std::process::ExitCode;
use std::sync::Arc;

use hypnos_core::application::ProbeTerminator;
use hypnos_core::error::Result;
use hypnos_infra_system::UnixProcessTable;

use super::terminate::report;
use super::Context;

/// Stop the named probes and drop their records; logs stay for reading
pub async fn run(ctx: &Context, names: &[String]) -> Result<ExitCode> {
    let terminator = ProbeTerminator::new(
        ctx.store.clone(),
        Arc::new(UnixProcessTable::new()),
        ctx.logs.clone(),
    );
    Ok(report(&terminator.stasis_each(names).await))
}
