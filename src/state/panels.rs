//! Header panel coordination.
//!
//! Exactly one of the user-info panel and the notification panel may be open
//! at a time; opening one force-closes the other, and re-invoking the open
//! action for the panel already open toggles it closed. Side-navigation
//! expansion is an orthogonal flag, conventionally collapsed together with
//! panel-closing navigation actions.

#[cfg(test)]
#[path = "panels_test.rs"]
mod panels_test;

use tokio::sync::watch;

/// Which header panel is open, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PanelState {
    #[default]
    Closed,
    UserPanelOpen,
    NotificationPanelOpen,
}

/// Snapshot of the panel chrome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelView {
    pub panel: PanelState,
    pub side_nav_expanded: bool,
}

/// State machine enforcing mutual exclusivity between header panels.
pub struct PanelCoordinator {
    view: watch::Sender<PanelView>,
}

impl Default for PanelCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            view: watch::Sender::new(PanelView::default()),
        }
    }

    /// Toggle the user-info panel. Returns true when the call opened it.
    pub fn toggle_user_panel(&self) -> bool {
        let mut opened = false;
        self.view.send_modify(|v| {
            v.panel = match v.panel {
                PanelState::UserPanelOpen => PanelState::Closed,
                PanelState::Closed | PanelState::NotificationPanelOpen => {
                    opened = true;
                    PanelState::UserPanelOpen
                }
            };
        });
        opened
    }

    /// Toggle the notification panel. Returns true when the call opened it,
    /// which is the coordinator-above's cue to mark notifications read
    /// exactly once per open transition.
    pub fn toggle_notification_panel(&self) -> bool {
        let mut opened = false;
        self.view.send_modify(|v| {
            v.panel = match v.panel {
                PanelState::NotificationPanelOpen => PanelState::Closed,
                PanelState::Closed | PanelState::UserPanelOpen => {
                    opened = true;
                    PanelState::NotificationPanelOpen
                }
            };
        });
        opened
    }

    /// Close whichever panel is open.
    pub fn close(&self) {
        self.view.send_modify(|v| v.panel = PanelState::Closed);
    }

    /// Expand or collapse the side navigation.
    pub fn set_side_nav(&self, expanded: bool) {
        self.view.send_modify(|v| v.side_nav_expanded = expanded);
    }

    /// Navigation action: close the open panel and collapse the side nav in
    /// one transition.
    pub fn close_for_navigation(&self) {
        self.view.send_modify(|v| {
            v.panel = PanelState::Closed;
            v.side_nav_expanded = false;
        });
    }

    /// Current chrome snapshot.
    #[must_use]
    pub fn snapshot(&self) -> PanelView {
        *self.view.borrow()
    }

    /// Change feed over chrome snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PanelView> {
        self.view.subscribe()
    }
}
