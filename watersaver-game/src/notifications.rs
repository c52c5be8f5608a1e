//! Short-lived feedback messages
//!
//! The queue only stores messages. Expiry is driven by the host: after
//! enqueueing, it schedules [`NotificationQueue::dequeue`] for the
//! configured time-to-live. Removal tolerates ids that are already gone, so
//! timers outliving a reset are harmless.
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "note-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    live: Vec<Notification>,
    // Never reset, so ids stay unique across replays.
    next_id: u64,
}

impl NotificationQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, text: impl Into<String>) -> NotificationId {
        self.next_id += 1;
        let id = NotificationId(self.next_id);
        self.live.push(Notification {
            id,
            text: text.into(),
        });
        id
    }

    /// Remove a notification, returning whether it was still live.
    pub fn dequeue(&mut self, id: NotificationId) -> bool {
        let before = self.live.len();
        self.live.retain(|n| n.id != id);
        self.live.len() != before
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }

    /// Live notifications in insertion order.
    pub fn live(&self) -> impl Iterator<Item = &Notification> {
        self.live.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: NotificationId) -> bool {
        self.live.iter().any(|n| n.id == id)
    }
}
