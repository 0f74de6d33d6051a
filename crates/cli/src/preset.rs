//! Workflow presets
//!
//! `config/*.toml` files hold `[workflows.<key>]` tables. Presets only supply
//! defaults: explicit flags always win, and the core receives a fully-resolved
//! `ScheduleRequest`.

use config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use hypnos_core::application::constants::DEFAULT_DURATION;
use hypnos_core::application::ScheduleRequest;
use hypnos_core::error::{AppError, Result};

/// One `[workflows.<key>]` table; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorkflowPreset {
    pub probe: Option<String>,
    pub group: Option<String>,
    pub script: Option<String>,
    pub log: Option<String>,
    pub duration: Option<String>,
    pub recurrent: Option<bool>,
    pub iterations: Option<u32>,
    pub notify: Option<bool>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ScheduleArgs {
    pub workflow: Option<String>,
    pub probe: Option<String>,
    pub group: Option<String>,
    pub script: Option<String>,
    pub log: Option<String>,
    pub duration: Option<String>,
    pub recurrent: bool,
    pub iterations: Option<u32>,
    pub notify: bool,
}

/// `*.toml` files in `dir`, sorted by file name; none if `dir` is absent
fn preset_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("toml") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_workflows(path: &Path) -> Result<HashMap<String, WorkflowPreset>> {
    let settings = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml))
        .build()
        .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;

    match settings.get::<HashMap<String, WorkflowPreset>>("workflows") {
        Ok(workflows) => Ok(workflows),
        Err(ConfigError::NotFound(_)) => Ok(HashMap::new()),
        Err(e) => Err(AppError::Config(format!("{}: {}", path.display(), e))),
    }
}

/// Find workflow `name`; the first file (by name) defining it wins
///
/// Workflow keys match case-insensitively: the config loader folds table keys
/// to lowercase.
pub fn load_preset(config_dir: &Path, name: &str) -> Result<Option<WorkflowPreset>> {
    let wanted = name.to_lowercase();
    for path in preset_files(config_dir)? {
        let mut workflows = read_workflows(&path)?;
        let key = workflows
            .keys()
            .find(|k| k.to_lowercase() == wanted)
            .cloned();
        if let Some(preset) = key.and_then(|k| workflows.remove(&k)) {
            debug!(workflow = %name, file = %path.display(), "Workflow preset loaded");
            return Ok(Some(preset));
        }
    }
    Ok(None)
}

/// Merge flags over an optional preset over built-in defaults
///
/// In preset mode the probe name and log basename default to the workflow key.
pub fn resolve(args: ScheduleArgs, preset: Option<WorkflowPreset>) -> ScheduleRequest {
    let preset = preset.unwrap_or_default();
    let workflow = args.workflow;

    let name = args
        .probe
        .or(preset.probe)
        .or_else(|| workflow.clone())
        .unwrap_or_default();

    ScheduleRequest {
        name,
        group: args.group.or(preset.group).unwrap_or_default(),
        script: args.script.or(preset.script).unwrap_or_default(),
        duration: args
            .duration
            .or(preset.duration)
            .unwrap_or_else(|| DEFAULT_DURATION.to_string()),
        recurrent: args.recurrent || preset.recurrent.unwrap_or(false),
        iterations: args.iterations.or(preset.iterations).unwrap_or(0),
        notify_only: args.notify || preset.notify.unwrap_or(false),
        log_basename: args.log.or(preset.log).or(workflow),
    }
}

/// Resolve a schedule invocation, loading the named workflow if any
///
/// # Errors
/// - AppError::Validation if a workflow was named but no preset defines it
pub fn resolve_from_dir(config_dir: &Path, args: ScheduleArgs) -> Result<ScheduleRequest> {
    let preset = match args.workflow.as_deref() {
        Some(workflow) => Some(load_preset(config_dir, workflow)?.ok_or_else(|| {
            AppError::validation(
                "workflow",
                format!("{:?} is not defined in {}", workflow, config_dir.display()),
            )
        })?),
        None => None,
    };
    Ok(resolve(args, preset))
}

/// Example preset file printed by `awaken`
pub const EXAMPLE_PRESETS: &str = r#"# Hypnos workflow presets
#
# Schedule one with `hypnos schedule <workflow>`; command-line flags override
# any value set here.

[workflows.focus]
group = "work"
script = "echo 'focus block over'"
duration = "25m"
iterations = 4

[workflows.stretch]
probe = "stretch"
duration = "1h"
recurrent = true
notify = true
"#;
