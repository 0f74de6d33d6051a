//! Per-invocation context: where Hypnos keeps its state

use hypnos_infra_fs::HypnosDirs;

pub const HOME_ENV: &str = "HYPNOS_HOME";
pub const DEFAULT_HOME: &str = "~/.hypnos";

/// Resolve the state directory from `HYPNOS_HOME`, falling back to `~/.hypnos`
pub fn resolve_dirs() -> HypnosDirs {
    let root = std::env::var(HOME_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_HOME.to_string());
    HypnosDirs::new(shellexpand::tilde(&root).into_owned())
}
