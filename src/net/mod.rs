//! Networking modules for the portal REST boundary.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles the REST calls with explicit credential injection, and
//! `types` defines the shared wire schema.

pub mod api;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;
