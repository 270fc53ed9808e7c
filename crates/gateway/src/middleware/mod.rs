//! Access control applied before every store operation.

mod auth;

pub use auth::{require_permission, AccessGate, Operation};
