//! Application façade wiring the session, dashboard, and redirects together.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`Portal`] is the composition root the embedding UI talks to: session
//! transitions flow into the dashboard coordinator and arm or cancel the
//! delayed redirects. Profile-resolution faults never escape; they become
//! transient error notifications, matching the propagation policy for
//! unexpected faults behind an otherwise successful login.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::net::api::PortalApi;
use crate::net::types::Role;
use crate::state::dashboard::Dashboard;
use crate::state::notifications::Notification;
use crate::state::redirect::{
    LOGIN_REDIRECT_DELAY, LOGOUT_REDIRECT_DELAY, Navigation, RedirectKind, RedirectScheduler,
};
use crate::state::session::{AuthFailure, SessionStore, User};
use crate::store::TokenStore;

/// Navigation target for post-login and post-logout redirects.
pub const HOME_TARGET: &str = "/";

/// Composition root for the client engine.
pub struct Portal {
    pub session: SessionStore,
    pub dashboard: Dashboard,
    pub redirects: RedirectScheduler,
}

impl Portal {
    /// Build the engine and return the navigation receiver the embedding UI
    /// drains.
    #[must_use]
    pub fn new(
        api: Arc<dyn PortalApi>,
        tokens: TokenStore,
    ) -> (Self, mpsc::UnboundedReceiver<Navigation>) {
        let (redirects, navigations) = RedirectScheduler::new();
        let portal = Self {
            session: SessionStore::new(api.clone(), tokens),
            dashboard: Dashboard::new(api),
            redirects,
        };
        (portal, navigations)
    }

    /// Startup entry point: restore the persisted session, if any, and
    /// resolve the dashboard for the restored identity. Never schedules a
    /// redirect and never surfaces a restore failure.
    pub async fn restore(&self) {
        self.session.restore().await;
        if let Some(user) = self.session.snapshot().user {
            self.resolve_dashboard(&user).await;
        }
    }

    /// Log in and, on success, resolve the dashboard and arm the delayed
    /// login redirect.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthFailure> {
        self.session.login(username, password).await?;
        self.after_authentication().await;
        Ok(())
    }

    /// Register and, on success, log in with the same credentials.
    pub async fn register(&self, email: &str, password: &str, role: Role) -> Result<(), AuthFailure> {
        self.session.register(email, password, role).await?;
        self.after_authentication().await;
        Ok(())
    }

    /// Log out: clear the session and dashboard, cancel any pending login
    /// redirect, and arm the logout redirect instead. Always succeeds.
    pub fn logout(&self) {
        self.session.logout();
        self.dashboard.session_cleared();
        self.redirects.cancel(RedirectKind::Login);
        self.redirects
            .schedule(RedirectKind::Logout, LOGOUT_REDIRECT_DELAY, HOME_TARGET);
    }

    async fn after_authentication(&self) {
        if let Some(user) = self.session.snapshot().user {
            self.resolve_dashboard(&user).await;
        }
        self.redirects
            .schedule(RedirectKind::Login, LOGIN_REDIRECT_DELAY, HOME_TARGET);
    }

    async fn resolve_dashboard(&self, user: &User) {
        if let Err(e) = self.dashboard.identity_changed(user).await {
            tracing::warn!(error = %e, "profile resolution failed");
            self.dashboard.push_notification(Notification::transient_error(
                "Profile unavailable",
                "We could not load your profile. Please try again later.",
            ));
        }
    }
}
