//! Transient success/error messages.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: Instant,
    pub expires_at: Instant,
}

impl Notification {
    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

/// Active notifications in display order, each with its own deadline.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    timeout: Duration,
    next_id: u64,
    active: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            next_id: 1,
            active: Vec::new(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        let created_at = Instant::now();
        let message = message.into();
        match kind {
            NotificationKind::Success => tracing::info!("{}", message),
            NotificationKind::Error => tracing::warn!("{}", message),
        }

        self.active.push(Notification {
            id,
            kind,
            message,
            created_at,
            expires_at: created_at + self.timeout,
        });
        id
    }

    /// Drop notifications whose deadline has passed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.active.len();
        self.active.retain(|n| n.expires_at > now);
        before - self.active.len()
    }

    /// Remove a notification early. Unknown or expired ids are ignored.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.active.len();
        self.active.retain(|n| n.id != id);
        before != self.active.len()
    }

    pub fn active(&self) -> &[Notification] {
        &self.active
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.active.iter().map(|n| n.expires_at).min()
    }
}
