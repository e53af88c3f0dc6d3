//! Bounded-retry acquisition of the host canvas at startup.

use tracing::{debug, warn};

use crate::constants::discovery::MAX_ATTEMPTS;
use crate::host::HostApp;

/// Outcome of a single discovery poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// The host canvas exists; the shell can attach.
    Ready,
    /// Not there yet; poll again after the retry interval.
    Retry,
    /// Retry budget exhausted; the shell stays idle.
    GaveUp,
}

/// Startup poll state.
///
/// The host may take a while to construct its canvas, so the shell re-probes
/// on a fixed interval and gives up after a fixed budget instead of waiting
/// forever.
#[derive(Debug, Default)]
pub struct Discovery {
    attempts: u32,
}

impl Discovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&mut self, host: &mut dyn HostApp) -> Probe {
        if host.canvas().is_some() {
            debug!(attempts = self.attempts, "host canvas ready");
            return Probe::Ready;
        }
        self.attempts += 1;
        if self.attempts >= MAX_ATTEMPTS {
            warn!(attempts = self.attempts, "timed out waiting for host canvas");
            Probe::GaveUp
        } else {
            debug!(attempt = self.attempts, "host canvas not ready");
            Probe::Retry
        }
    }
}
