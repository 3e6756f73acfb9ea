//! Notification list with read/unread tracking.
//!
//! DESIGN
//! ======
//! Insertion-ordered, newest first, so synthetic notifications land ahead of
//! anything already present. The list is only ever mutated as a whole under
//! the watch sender, which keeps every update atomic for observers. The
//! shape also fits server-sourced notifications, though none are produced
//! here.

#[cfg(test)]
#[path = "notifications_test.rs"]
mod notifications_test;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Id of the synthetic notification for an unapproved patient account.
pub const ACCOUNT_PENDING_ID: &str = "account-pending";

/// Severity/styling category, mirroring the portal's inline notification
/// kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// A single dashboard notification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    pub unread: bool,
    pub kind: NotificationKind,
}

impl Notification {
    /// The synthetic notification shown while a patient account has no
    /// linked profile record.
    #[must_use]
    pub fn account_pending() -> Self {
        Self {
            id: ACCOUNT_PENDING_ID.to_owned(),
            title: "Account pending approval".to_owned(),
            message: "Your profile has not been linked yet. An administrator will review your account shortly."
                .to_owned(),
            timestamp_ms: now_ms(),
            unread: true,
            kind: NotificationKind::Info,
        }
    }

    /// A locally-generated transient error notice.
    #[must_use]
    pub fn transient_error(title: &str, message: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_owned(),
            message: message.to_owned(),
            timestamp_ms: now_ms(),
            unread: true,
            kind: NotificationKind::Error,
        }
    }
}

pub(crate) fn now_ms() -> i64 {
    let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(duration.as_millis()).unwrap_or(0)
}

/// Ordered notification list with read/unread state, scoped to one session.
pub struct NotificationCenter {
    list: watch::Sender<Vec<Notification>>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            list: watch::Sender::new(Vec::new()),
        }
    }

    /// Insert at the head, always unread.
    pub fn add(&self, mut notification: Notification) {
        notification.unread = true;
        self.list.send_modify(|list| list.insert(0, notification));
    }

    /// Flip every currently-held notification to read in one replacement.
    /// Notifications added afterwards stay unread until the next call.
    pub fn mark_all_read(&self) {
        self.list.send_modify(|list| {
            for notification in list.iter_mut() {
                notification.unread = false;
            }
        });
    }

    /// True iff any held notification is unread.
    #[must_use]
    pub fn has_unread(&self) -> bool {
        self.list.borrow().iter().any(|n| n.unread)
    }

    /// True iff a notification with this id is held.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.list.borrow().iter().any(|n| n.id == id)
    }

    /// Drop every notification; used when the session clears.
    pub fn clear(&self) {
        self.list.send_modify(Vec::clear);
    }

    /// Current list snapshot, newest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notification> {
        self.list.borrow().clone()
    }

    /// Change feed over list snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.list.subscribe()
    }
}
