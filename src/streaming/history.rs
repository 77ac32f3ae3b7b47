use std::collections::VecDeque;

use serde::Serialize;

use crate::models::FrameEvent;

/// One point of the live trend line.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub score: u8,
    pub issue_count: usize,
}

/// Bounded ring of the latest events, most recent first. Display only;
/// never read by synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentHistory {
    capacity: usize,
    events: VecDeque<FrameEvent>,
}

impl RecentHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            events: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, event: FrameEvent) {
        if self.capacity == 0 {
            return;
        }
        self.events.push_front(event);
        self.events.truncate(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&FrameEvent> {
        self.events.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameEvent> {
        self.events.iter()
    }

    pub fn trend(&self) -> Vec<TrendPoint> {
        self.events
            .iter()
            .map(|event| TrendPoint {
                score: event.effective_score(),
                issue_count: event.issues.len(),
            })
            .collect()
    }
}

impl Default for RecentHistory {
    fn default() -> Self {
        Self::new(10)
    }
}
