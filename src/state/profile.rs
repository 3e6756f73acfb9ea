//! Role-specific profile resolution.
//!
//! The backend has no "profile for user" endpoint, so resolution fetches the
//! role's collection and filters on the `user_id` foreign key. An empty
//! filter result is a valid terminal state (the account has no linked
//! profile yet), wholly distinct from a failed collection fetch.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use std::sync::Arc;

use crate::net::api::{ApiError, PortalApi};
use crate::net::types::{Doctor, Patient, Role};
use crate::state::session::User;

/// Role-specific profile record for the current session.
#[derive(Clone, Debug, PartialEq)]
pub enum ProfileRecord {
    Patient(Patient),
    Doctor(Doctor),
}

impl ProfileRecord {
    /// Full name as shown in the user panel.
    #[must_use]
    pub fn full_name(&self) -> String {
        match self {
            Self::Patient(p) => format!("{} {}", p.first_name, p.last_name),
            Self::Doctor(d) => format!("{} {}", d.first_name, d.last_name),
        }
    }
}

/// Failure to fetch a profile collection. Not produced for empty results.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("profile fetch failed: {0}")]
    Fetch(#[from] ApiError),
}

/// Fetches and filters the role-specific profile for an authenticated user.
pub struct ProfileResolver {
    api: Arc<dyn PortalApi>,
}

impl ProfileResolver {
    #[must_use]
    pub fn new(api: Arc<dyn PortalApi>) -> Self {
        Self { api }
    }

    /// Resolve the profile for `user`.
    ///
    /// Patients and doctors filter their collection down to the single record
    /// whose `user_id` matches; admins have no profile concept and resolve to
    /// `None` without a request. Stateless and idempotent; callers re-invoke
    /// on identity change and enforce last-identity-wins at apply time.
    pub async fn resolve(&self, user: &User) -> Result<Option<ProfileRecord>, ProfileError> {
        match user.role {
            Role::Patient => {
                let patients = self.api.list_patients(&user.token).await?;
                Ok(patients
                    .into_iter()
                    .find(|p| p.user_id == user.id)
                    .map(ProfileRecord::Patient))
            }
            Role::Doctor => {
                let doctors = self.api.list_doctors(&user.token).await?;
                Ok(doctors
                    .into_iter()
                    .find(|d| d.user_id == user.id)
                    .map(ProfileRecord::Doctor))
            }
            Role::Admin => Ok(None),
        }
    }
}
