//! Login Navigation
//!
//! Where the user is sent when the session ends.

use parking_lot::Mutex;
use tracing::warn;

/// Sends the user to the login screen.
pub trait LoginNavigator: Send + Sync {
    /// Navigate to `path`.
    fn redirect_to_login(&self, path: &str);
}

impl<F> LoginNavigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn redirect_to_login(&self, path: &str) {
        self(path)
    }
}

/// Navigator for headless use: logs the redirect.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNavigator;

impl LoginNavigator for LoggingNavigator {
    fn redirect_to_login(&self, path: &str) {
        warn!(path, "Session ended, sign-in required");
    }
}

/// Navigator that records every redirect, for tests.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths redirected to, in order.
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().clone()
    }
}

impl LoginNavigator for RecordingNavigator {
    fn redirect_to_login(&self, path: &str) {
        self.redirects.lock().push(path.to_string());
    }
}
