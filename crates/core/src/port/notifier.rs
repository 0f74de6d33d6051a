// Notifier Port
//
// Best-effort desktop notification. "No notifier available" is an error value,
// never a panic.

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Show a notification
    ///
    /// # Errors
    /// - AppError::Notifier if no backend is available or delivery failed
    async fn notify(&self, title: &str, message: &str) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingNotifier {
        fail_with: Mutex<Option<String>>,
        sent: Mutex<Vec<(String, String)>>,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn new_unavailable() -> Self {
            let notifier = Self::default();
            *notifier.fail_with.lock().unwrap() = Some("no notifier available".to_string());
            notifier
        }

        /// Every (title, message) attempted, including failed ones
        pub fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, title: &str, message: &str) -> Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((title.to_string(), message.to_string()));
            match self.fail_with.lock().unwrap().clone() {
                Some(msg) => Err(AppError::Notifier(msg)),
                None => Ok(()),
            }
        }
    }
}
