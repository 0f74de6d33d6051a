// Shell script executor
// reason: tokio::process so the worker's timer loop stays async

use async_trait::async_trait;
use std::collections::HashMap;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use hypnos_core::error::{AppError, Result};
use hypnos_core::port::ScriptExecutor;

/// Variables a script sees from the worker's environment
pub const DEFAULT_ENV_ALLOWLIST: &[&str] = &["PATH", "HOME", "USER", "SHELL", "LANG"];

/// Runs snippets with `sh -c`, output inherited from the worker
pub struct ShellScriptExecutor {
    shell: String,
    env_allowlist: Vec<String>,
}

impl ShellScriptExecutor {
    /// # Arguments
    /// * `env_allowlist` - Names of environment variables passed through
    pub fn new(env_allowlist: Vec<String>) -> Self {
        Self {
            shell: "sh".to_string(),
            env_allowlist,
        }
    }

    /// Keep only allowlisted variables
    fn filter_env<I>(&self, env: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        env.into_iter()
            .filter(|(k, _)| self.env_allowlist.contains(k))
            .collect()
    }
}

impl Default for ShellScriptExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_ENV_ALLOWLIST.iter().map(|s| s.to_string()).collect())
    }
}

#[async_trait]
impl ScriptExecutor for ShellScriptExecutor {
    async fn exec(&self, script: &str) -> Result<()> {
        let env = self.filter_env(std::env::vars());
        debug!(vars = ?env.keys().collect::<Vec<_>>(), "Script environment");

        let status = Command::new(&self.shell)
            .arg("-c")
            .arg(script)
            .env_clear()
            .envs(&env)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| AppError::Script(format!("failed to start {}: {}", self.shell, e)))?;

        info!(exit_code = ?status.code(), "Script finished");
        if status.success() {
            Ok(())
        } else {
            Err(AppError::Script(match status.code() {
                Some(code) => format!("exit status {}", code),
                None => "terminated by signal".to_string(),
            }))
        }
    }
}
