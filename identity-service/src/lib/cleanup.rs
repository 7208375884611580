use std::sync::Arc;
use std::time::Duration;

use crate::domain::auth::ports::ResetRepository;
use crate::domain::auth::ports::SessionRepository;

/// Rows removed by one cleanup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub sessions: u64,
    pub resets: u64,
}

/// Periodically deletes expired or revoked sessions and expired or used reset tokens.
pub struct CleanupTask<SR, RR>
where
    SR: SessionRepository,
    RR: ResetRepository,
{
    sessions: Arc<SR>,
    resets: Arc<RR>,
    interval: Duration,
}

impl<SR, RR> CleanupTask<SR, RR>
where
    SR: SessionRepository,
    RR: ResetRepository,
{
    pub fn new(sessions: Arc<SR>, resets: Arc<RR>, interval: Duration) -> Self {
        Self {
            sessions,
            resets,
            interval,
        }
    }

    /// Run a single pass. Failures are logged and counted as zero.
    pub async fn run_once(&self) -> CleanupReport {
        let sessions = match self.sessions.cleanup_expired().await {
            Ok(count) => count,
            Err(e) => {
                tracing::error!(error = %e, "Failed to clean up expired sessions");
                0
            }
        };

        let resets = match self.resets.cleanup_expired().await {
            Ok(count) => count,
            Err(e) => {
                tracing::error!(error = %e, "Failed to clean up expired reset tokens");
                0
            }
        };

        tracing::info!(sessions, resets, "Token cleanup completed");
        CleanupReport { sessions, resets }
    }

    /// Run forever, one pass per interval. The first pass runs immediately.
    pub async fn start(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.run_once().await;
        }
    }
}
