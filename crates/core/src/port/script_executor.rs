// Script Executor Port
//
// Runs a probe's shell snippet opaquely. No timeout: a hung script stalls the
// probe's later cycles.

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait ScriptExecutor: Send + Sync {
    /// Run `script` to completion
    ///
    /// # Errors
    /// - AppError::Script if the script could not start or exited non-zero
    async fn exec(&self, script: &str) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::Mutex;

    /// Executor that records calls and succeeds or fails on demand
    #[derive(Default)]
    pub struct MockScriptExecutor {
        fail_with: Mutex<Option<String>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockScriptExecutor {
        pub fn new_success() -> Self {
            Self::default()
        }

        pub fn new_fail(message: impl Into<String>) -> Self {
            let executor = Self::default();
            *executor.fail_with.lock().unwrap() = Some(message.into());
            executor
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ScriptExecutor for MockScriptExecutor {
        async fn exec(&self, script: &str) -> Result<()> {
            self.calls.lock().unwrap().push(script.to_string());
            match self.fail_with.lock().unwrap().clone() {
                Some(msg) => Err(AppError::Script(msg)),
                None => Ok(()),
            }
        }
    }
}
