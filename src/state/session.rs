//! Session lifecycle: token persistence, identity resolution, login/logout.
//!
//! ARCHITECTURE
//! ============
//! [`SessionStore`] is the only owner of the persisted token slot and the
//! in-memory [`Session`]. Everything else observes derived snapshots through
//! `subscribe`/`snapshot`. Asynchronous operations capture a supersession
//! sequence before suspending and discard their result if a logout bumped it
//! meanwhile; interleaved logins resolve to whichever identity fetch
//! completes last, applied as one consistent `(token, user)` pairing.
//!
//! ERROR HANDLING
//! ==============
//! Credential and registration rejections come back as [`AuthFailure`]
//! results carrying a user-facing message. A rejected restore is not an
//! error at all: the persisted token is cleared and the session stays empty.
//! No path leaves a token in place without a confirmed identity.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::net::api::{ApiError, PortalApi};
use crate::net::types::{RegisterRequest, Role};
use crate::store::TokenStore;

/// Fallback shown when a login rejection carries no server-provided detail.
pub const LOGIN_FALLBACK_MESSAGE: &str = "Login failed. Please try again.";

/// Fallback shown when a registration rejection carries no usable message.
pub const REGISTER_FALLBACK_MESSAGE: &str = "Registration failed. Please try again.";

/// The authenticated account for the current session.
///
/// Immutable once fetched; replaced wholesale on re-login.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    /// The bearer token this identity was fetched with; passed explicitly to
    /// every subsequent authenticated call.
    pub token: String,
}

/// Point-in-time session snapshot.
///
/// `user` is only ever present together with `token`. The reverse does not
/// hold: between token persistence and identity-fetch completion the token is
/// present and `user` is still absent.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
    /// True while a restore or login identity fetch is in flight. Callers
    /// use this to serialize the two entry points (disable the login control
    /// until restore settles).
    pub loading: bool,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Expected authentication failure with a user-facing message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthFailure {
    pub message: String,
}

impl AuthFailure {
    fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Owner of the authentication token lifecycle and current user identity.
pub struct SessionStore {
    api: Arc<dyn PortalApi>,
    tokens: TokenStore,
    session: watch::Sender<Session>,
    /// Bumped on every logout. In-flight operations capture it before
    /// suspending and discard their result if it has moved.
    clear_seq: AtomicU64,
}

impl SessionStore {
    #[must_use]
    pub fn new(api: Arc<dyn PortalApi>, tokens: TokenStore) -> Self {
        Self {
            api,
            tokens,
            session: watch::Sender::new(Session::default()),
            clear_seq: AtomicU64::new(0),
        }
    }

    /// Current session snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.session.borrow().clone()
    }

    /// Change feed over session snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    fn seq(&self) -> u64 {
        self.clear_seq.load(Ordering::SeqCst)
    }

    fn still_current(&self, seq: u64) -> bool {
        self.seq() == seq
    }

    /// Restore the session from the persisted token, if any.
    ///
    /// No token is a terminal no-op. A token the identity endpoint rejects is
    /// treated as an expired session: the persisted token is cleared and the
    /// session stays empty, with nothing surfaced to the caller. Idempotent.
    pub async fn restore(&self) {
        let Some(token) = self.tokens.load() else {
            return;
        };

        let seq = self.seq();
        self.session.send_modify(|s| {
            s.token = Some(token.clone());
            s.user = None;
            s.loading = true;
        });

        match self.fetch_user_info(&token).await {
            Ok(user) if self.still_current(seq) => {
                self.session.send_modify(|s| {
                    s.token = Some(token.clone());
                    s.user = Some(user);
                    s.loading = false;
                });
                tracing::info!("session restored from persisted token");
            }
            Ok(_) => {
                tracing::debug!("restore superseded by logout; identity discarded");
                self.session.send_modify(|s| s.loading = false);
            }
            Err(e) => {
                tracing::debug!(error = %e, "persisted token rejected; clearing session");
                self.tokens.clear();
                if self.still_current(seq) {
                    self.session.send_modify(|s| *s = Session::default());
                } else {
                    self.session.send_modify(|s| s.loading = false);
                }
            }
        }
    }

    /// Authenticate with the given credentials.
    ///
    /// On success the token is persisted and `(token, user)` applied
    /// together. On rejection the failure message comes from the server's
    /// `detail` field, falling back to [`LOGIN_FALLBACK_MESSAGE`]; the
    /// session is left unauthenticated. The operation never rejects
    /// re-entry itself; `Session::loading` is the caller's serialization
    /// signal.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthFailure> {
        let seq = self.seq();
        self.session.send_modify(|s| s.loading = true);

        let token = match self.api.issue_token(username, password).await {
            Ok(issued) => issued.access_token,
            Err(e) => {
                self.session.send_modify(|s| s.loading = false);
                return Err(AuthFailure::new(
                    e.detail().unwrap_or(LOGIN_FALLBACK_MESSAGE),
                ));
            }
        };

        if !self.still_current(seq) {
            // Logged out while the token call was in flight.
            self.session.send_modify(|s| s.loading = false);
            return Err(AuthFailure::new(LOGIN_FALLBACK_MESSAGE));
        }

        if let Err(e) = self.tokens.save(&token) {
            tracing::warn!(error = %e, "failed to persist access token");
        }
        self.session.send_modify(|s| {
            s.token = Some(token.clone());
            s.user = None;
        });

        match self.fetch_user_info(&token).await {
            Ok(user) if self.still_current(seq) => {
                // Re-persist so an interleaved login that finished earlier
                // cannot leave the disk slot paired with a different
                // in-memory identity.
                if let Err(e) = self.tokens.save(&token) {
                    tracing::warn!(error = %e, "failed to persist access token");
                }
                self.session.send_modify(|s| {
                    s.token = Some(token.clone());
                    s.user = Some(user);
                    s.loading = false;
                });
                tracing::info!("login succeeded");
                Ok(())
            }
            Ok(_) => {
                tracing::debug!("login superseded by logout; identity discarded");
                self.session.send_modify(|s| s.loading = false);
                Err(AuthFailure::new(LOGIN_FALLBACK_MESSAGE))
            }
            Err(e) => {
                // A token without a confirmed identity resolves to fully
                // cleared, never half-logged-in.
                self.tokens.clear();
                if self.still_current(seq) {
                    self.session.send_modify(|s| *s = Session::default());
                } else {
                    self.session.send_modify(|s| s.loading = false);
                }
                Err(AuthFailure::new(
                    e.detail().unwrap_or(LOGIN_FALLBACK_MESSAGE),
                ))
            }
        }
    }

    /// Register a new account, then log in with the same credentials.
    ///
    /// Registration rejection extracts `detail`, then `message`, then falls
    /// back to [`REGISTER_FALLBACK_MESSAGE`], and does not attempt login.
    pub async fn register(&self, email: &str, password: &str, role: Role) -> Result<(), AuthFailure> {
        let request = RegisterRequest {
            email: email.to_owned(),
            password: password.to_owned(),
            is_active: true,
            role,
        };

        match self.api.register(&request).await {
            Ok(_) => self.login(email, password).await,
            Err(e) => Err(AuthFailure::new(
                e.detail()
                    .or_else(|| e.message())
                    .unwrap_or(REGISTER_FALLBACK_MESSAGE),
            )),
        }
    }

    /// Clear the session unconditionally. Purely local, no network call, and
    /// infallible regardless of prior state.
    pub fn logout(&self) {
        self.clear_seq.fetch_add(1, Ordering::SeqCst);
        self.tokens.clear();
        self.session.send_modify(|s| *s = Session::default());
        tracing::info!("logged out");
    }

    /// Fetch the identity behind `token` and compose the session [`User`]
    /// from the record plus the token itself.
    async fn fetch_user_info(&self, token: &str) -> Result<User, ApiError> {
        let record = self.api.fetch_me(token).await?;
        Ok(User {
            id: record.id,
            email: record.email,
            role: record.role,
            is_active: record.is_active,
            token: token.to_owned(),
        })
    }
}
