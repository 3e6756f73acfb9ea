//! Session and dashboard state engine.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` owns the credential lifecycle, `profile` resolves role-specific
//! records, `notifications`/`panels` hold dashboard chrome state, `redirect`
//! schedules delayed navigation, `dashboard` coordinates between them, and
//! `app` is the composition root the embedding UI talks to.

pub mod app;
pub mod dashboard;
pub mod notifications;
pub mod panels;
pub mod profile;
pub mod redirect;
pub mod session;
