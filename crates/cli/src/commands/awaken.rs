use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use hypnos_core::error::Result;
use hypnos_infra_fs::HypnosDirs;

use crate::preset::EXAMPLE_PRESETS;

/// Create the state directories and emit an example preset file
pub async fn run(dirs: &HypnosDirs, output: Option<&Path>) -> Result<ExitCode> {
    dirs.ensure().await?;

    for dir in dirs.all() {
        eprintln!("{} {}", "✓".green(), dir.display());
    }

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, EXAMPLE_PRESETS).await?;
            eprintln!("{} example presets written to {}", "✓".green(), path.display());
        }
        None => print!("{}", EXAMPLE_PRESETS),
    }

    Ok(ExitCode::SUCCESS)
}
