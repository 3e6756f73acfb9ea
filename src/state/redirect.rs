//! Delayed navigation after session transitions.
//!
//! DESIGN
//! ======
//! One cancellable single-shot slot per [`RedirectKind`]. Re-scheduling a
//! kind cancels and replaces its pending timer; firing delivers exactly one
//! [`Navigation`] on the scheduler's channel and empties the slot. Dropping
//! the scheduler aborts anything still pending, so an unmounted UI scope can
//! never be navigated by a stale timer.

#[cfg(test)]
#[path = "redirect_test.rs"]
mod redirect_test;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Delay before navigating away after a successful login.
pub const LOGIN_REDIRECT_DELAY: Duration = Duration::from_millis(4000);

/// Delay before navigating away after logout.
pub const LOGOUT_REDIRECT_DELAY: Duration = Duration::from_millis(4000);

/// Which session transition a redirect belongs to. Each kind owns one slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedirectKind {
    Login,
    Logout,
}

impl RedirectKind {
    fn index(self) -> usize {
        match self {
            Self::Login => 0,
            Self::Logout => 1,
        }
    }
}

/// A fired redirect, delivered to the embedding UI's navigation handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub kind: RedirectKind,
    pub target: String,
}

#[derive(Default)]
struct Slot {
    /// Bumped on every schedule/cancel so a firing timer only empties the
    /// slot it was armed in.
    seq: u64,
    handle: Option<JoinHandle<()>>,
}

/// Schedules and cancels delayed navigation, one pending timer per kind.
pub struct RedirectScheduler {
    slots: Arc<Mutex<[Slot; 2]>>,
    tx: mpsc::UnboundedSender<Navigation>,
}

impl RedirectScheduler {
    /// Create a scheduler and the receiver the UI drains navigations from.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Navigation>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            slots: Arc::new(Mutex::new([Slot::default(), Slot::default()])),
            tx,
        };
        (scheduler, rx)
    }

    /// Arm a single-shot redirect. A timer of the same kind already armed is
    /// cancelled and replaced; the other kind's slot is untouched.
    pub fn schedule(&self, kind: RedirectKind, delay: Duration, target: &str) {
        let mut slots = self.slots.lock().unwrap();
        let slot = &mut slots[kind.index()];
        slot.seq += 1;
        if let Some(handle) = slot.handle.take() {
            handle.abort();
            tracing::debug!(?kind, "pending redirect replaced");
        }

        let seq = slot.seq;
        let slots_ref = self.slots.clone();
        let tx = self.tx.clone();
        let navigation = Navigation {
            kind,
            target: target.to_owned(),
        };
        slot.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(navigation);
            let mut slots = slots_ref.lock().unwrap();
            let slot = &mut slots[kind.index()];
            if slot.seq == seq {
                slot.handle = None;
            }
        }));
    }

    /// Cancel the pending redirect of this kind, if armed; no-op otherwise.
    pub fn cancel(&self, kind: RedirectKind) {
        let mut slots = self.slots.lock().unwrap();
        let slot = &mut slots[kind.index()];
        slot.seq += 1;
        if let Some(handle) = slot.handle.take() {
            handle.abort();
            tracing::debug!(?kind, "pending redirect cancelled");
        }
    }

    /// Whether a redirect of this kind is currently armed.
    #[must_use]
    pub fn is_armed(&self, kind: RedirectKind) -> bool {
        self.slots.lock().unwrap()[kind.index()].handle.is_some()
    }
}

impl Drop for RedirectScheduler {
    fn drop(&mut self) {
        let mut slots = self.slots.lock().unwrap();
        for slot in slots.iter_mut() {
            slot.seq += 1;
            if let Some(handle) = slot.handle.take() {
                handle.abort();
            }
        }
    }
}
