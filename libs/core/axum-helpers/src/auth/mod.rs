//! Admin session gate for write routes.

pub mod admin;

pub use admin::{AdminGate, require_admin_session};
