//! Wire DTOs for the portal REST boundary.
//!
//! DESIGN
//! ======
//! These types intentionally mirror the backend's response schemas so serde
//! round-trips stay lossless and the state layer never touches raw JSON.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Account role. Unknown role strings are a deserialization error rather than
/// a silent fallthrough.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

/// An account as returned by `GET /auth/me` and `POST /auth/register`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique account identifier.
    pub id: i64,
    /// Login email address.
    pub email: String,
    /// Account role.
    pub role: Role,
    /// Whether the account is active.
    pub is_active: bool,
}

/// Bearer credential issued by `POST /auth/token`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Opaque bearer token.
    pub access_token: String,
    /// Token scheme, `"bearer"` in practice.
    pub token_type: String,
}

/// Request body for `POST /auth/register`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub is_active: bool,
    pub role: Role,
}

/// A patient profile row from `GET /patients/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub first_name: String,
    pub last_name: String,
    /// ISO 8601 date string.
    pub date_of_birth: String,
    pub gender: String,
    pub phone_number: String,
    pub address: Option<String>,
    pub insurance_number: Option<String>,
    pub insurance_provider: Option<String>,
    /// Profile row identifier.
    pub id: i64,
    /// Foreign key to the owning account.
    pub user_id: i64,
}

/// A doctor profile row from `GET /doctors/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub phone_number: String,
    #[serde(default)]
    pub bio: Option<String>,
    /// Profile row identifier.
    pub id: i64,
    /// Foreign key to the owning account.
    pub user_id: i64,
}
