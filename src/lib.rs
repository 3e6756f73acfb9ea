//! Client engine for the Tupange healthcare scheduling portal.
//!
//! Owns the authentication token lifecycle, resolves a role-specific profile
//! after authentication, synthesizes and tracks dashboard notifications,
//! coordinates mutually-exclusive header panels, and schedules delayed
//! navigation after session transitions. Rendering, routing, and the remote
//! service are the embedding application's concern; this crate exposes
//! snapshots and change feeds for them to consume.

pub mod net;
pub mod state;
pub mod store;
