//! Dashboard coordinator: profile resolution, pending-approval synthesis,
//! badge indicator, and panel wiring.
//!
//! SYSTEM CONTEXT
//! ==============
//! Sits between [`ProfileResolver`]'s outcomes and [`NotificationCenter`]:
//! the resolver stays ignorant of notifications, and the decision that an
//! empty patient result means "pending approval" lives here. Also the place
//! where opening the notification panel marks everything read exactly once
//! per open transition.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::net::api::PortalApi;
use crate::net::types::Role;
use crate::state::notifications::{ACCOUNT_PENDING_ID, Notification, NotificationCenter};
use crate::state::panels::PanelCoordinator;
use crate::state::profile::{ProfileError, ProfileRecord, ProfileResolver};
use crate::state::session::User;

/// Identity a profile resolution belongs to. A resolution applies only if
/// the dashboard still tracks the identity it started for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct IdentityKey {
    user_id: i64,
    role: Role,
}

/// Snapshot of the dashboard's derived state.
#[derive(Clone, Debug, Default)]
pub struct DashboardView {
    /// Resolved role-specific profile, if any.
    pub profile: Option<ProfileRecord>,
    /// True for a patient whose profile collection holds no linked record.
    pub pending_approval: bool,
    /// Notification badge indicator, recomputed on identity, resolution,
    /// and notification transitions rather than on every read.
    pub badge: bool,
}

/// Owner of the session-scoped dashboard state.
pub struct Dashboard {
    resolver: ProfileResolver,
    pub notifications: NotificationCenter,
    pub panels: PanelCoordinator,
    identity: Mutex<Option<IdentityKey>>,
    view: watch::Sender<DashboardView>,
}

impl Dashboard {
    #[must_use]
    pub fn new(api: Arc<dyn PortalApi>) -> Self {
        Self {
            resolver: ProfileResolver::new(api),
            notifications: NotificationCenter::new(),
            panels: PanelCoordinator::new(),
            identity: Mutex::new(None),
            view: watch::Sender::new(DashboardView::default()),
        }
    }

    /// Current dashboard snapshot.
    #[must_use]
    pub fn snapshot(&self) -> DashboardView {
        self.view.borrow().clone()
    }

    /// Change feed over dashboard snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.view.subscribe()
    }

    /// React to a (re)authenticated identity: resolve the role-specific
    /// profile and derive pending-approval and the badge from the outcome.
    ///
    /// The identity key is recorded before suspending; a resolution whose
    /// identity has been superseded meanwhile is discarded, so the last
    /// identity always wins. Resolver failures reset the profile and
    /// propagate for the caller to surface.
    pub async fn identity_changed(&self, user: &User) -> Result<(), ProfileError> {
        let key = IdentityKey {
            user_id: user.id,
            role: user.role,
        };
        *self.identity.lock().unwrap() = Some(key);

        let resolved = self.resolver.resolve(user).await;

        if *self.identity.lock().unwrap() != Some(key) {
            tracing::debug!("stale profile resolution discarded");
            return Ok(());
        }

        match resolved {
            Ok(profile) => {
                let pending = user.role == Role::Patient && profile.is_none();
                if pending && !self.notifications.contains(ACCOUNT_PENDING_ID) {
                    tracing::info!("patient profile not linked yet; raising pending-approval notice");
                    self.notifications.add(Notification::account_pending());
                }
                let badge = self.notifications.has_unread()
                    || (pending && !self.notifications.contains(ACCOUNT_PENDING_ID));
                self.view.send_modify(|v| {
                    v.profile = profile;
                    v.pending_approval = pending;
                    v.badge = badge;
                });
                Ok(())
            }
            Err(e) => {
                self.view.send_modify(|v| {
                    v.profile = None;
                    v.pending_approval = false;
                });
                self.refresh_badge();
                Err(e)
            }
        }
    }

    /// React to the session clearing: drop the profile, the notifications,
    /// and close the chrome.
    pub fn session_cleared(&self) {
        *self.identity.lock().unwrap() = None;
        self.notifications.clear();
        self.panels.close_for_navigation();
        self.view.send_modify(|v| *v = DashboardView::default());
    }

    /// Toggle the user-info panel.
    pub fn toggle_user_panel(&self) -> bool {
        self.panels.toggle_user_panel()
    }

    /// Toggle the notification panel; the opening transition marks every
    /// current notification read, exactly once.
    pub fn toggle_notification_panel(&self) -> bool {
        let opened = self.panels.toggle_notification_panel();
        if opened {
            self.notifications.mark_all_read();
            self.refresh_badge();
        }
        opened
    }

    /// Add a notification and refresh the badge.
    pub fn push_notification(&self, notification: Notification) {
        self.notifications.add(notification);
        self.refresh_badge();
    }

    /// Display name for the user panel: profile full name when linked,
    /// "Super User" for admins, "Pending Approval" otherwise.
    #[must_use]
    pub fn display_name(&self, user: &User) -> String {
        if user.role == Role::Admin {
            return "Super User".to_owned();
        }
        match self.view.borrow().profile.as_ref() {
            Some(profile) => profile.full_name(),
            None => "Pending Approval".to_owned(),
        }
    }

    fn refresh_badge(&self) {
        let pending = self.view.borrow().pending_approval;
        let badge = self.notifications.has_unread()
            || (pending && !self.notifications.contains(ACCOUNT_PENDING_ID));
        self.view.send_modify(|v| v.badge = badge);
    }
}
