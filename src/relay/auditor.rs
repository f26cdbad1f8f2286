//! Periodic diagnostic tap over the presence tracker

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::presence::PresenceTracker;

/// Default audit period
pub const DEFAULT_AUDIT_INTERVAL: Duration = Duration::from_secs(10);

/// Shortest accepted period; `tokio::time::interval` rejects zero
pub const MIN_AUDIT_INTERVAL: Duration = Duration::from_millis(1);

/// Logs the current typing users on a fixed interval.
///
/// Read-only: it never mutates presence or broadcasts to clients.
pub struct IdleAuditor {
    presence: Arc<PresenceTracker>,
    period: Duration,
    reports: Option<mpsc::UnboundedSender<Vec<String>>>,
}

impl IdleAuditor {
    /// `period` is clamped to at least `MIN_AUDIT_INTERVAL`
    pub fn new(presence: Arc<PresenceTracker>, period: Duration) -> Self {
        Self {
            presence,
            period: period.max(MIN_AUDIT_INTERVAL),
            reports: None,
        }
    }

    /// Also forward every periodic report to `tx`
    pub fn with_reports(mut self, tx: mpsc::UnboundedSender<Vec<String>>) -> Self {
        self.reports = Some(tx);
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run one audit. Returns the users that were reported, if any.
    pub fn audit(&self) -> Option<Vec<String>> {
        if self.presence.is_empty() {
            return None;
        }

        let users = self.presence.all_typing_users();
        tracing::info!(
            count = users.len(),
            users = %users.join(", "),
            "Currently typing"
        );
        Some(users)
    }

    /// Audit forever on `period`
    pub async fn run(self) {
        let mut timer = interval(self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Skip the immediate first tick
        timer.tick().await;

        loop {
            timer.tick().await;
            if let (Some(users), Some(tx)) = (self.audit(), &self.reports) {
                let _ = tx.send(users);
            }
        }
    }

    /// Run on a background task; abort the handle to stop it
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
