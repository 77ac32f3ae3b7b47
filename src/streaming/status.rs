use serde::Serialize;

use crate::classifier::Classification;

use super::history::{RecentHistory, TrendPoint};

/// Whether the classifier has been answering during this session.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Connectivity {
    /// No classifier call has resolved yet
    #[default]
    Unknown,
    Connected,
    /// The most recent call failed; polling continues
    Degraded,
}

/// Live view of a running session, published after every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveStatus {
    pub session_id: String,
    pub connectivity: Connectivity,
    pub ticks: u64,
    pub skipped_ticks: u64,
    pub failed_ticks: u64,
    pub events_logged: u64,
    pub latest: Option<Classification>,
    pub recent: RecentHistory,
}

impl LiveStatus {
    pub fn new(session_id: impl Into<String>, history_capacity: usize) -> Self {
        Self {
            session_id: session_id.into(),
            connectivity: Connectivity::Unknown,
            ticks: 0,
            skipped_ticks: 0,
            failed_ticks: 0,
            events_logged: 0,
            latest: None,
            recent: RecentHistory::new(history_capacity),
        }
    }

    pub fn trend(&self) -> Vec<TrendPoint> {
        self.recent.trend()
    }

    pub fn is_degraded(&self) -> bool {
        self.connectivity == Connectivity::Degraded
    }
}
