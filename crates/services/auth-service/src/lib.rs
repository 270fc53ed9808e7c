//! Auth Service Library
//!
//! This crate provides the session manager and the login flow that checks
//! credentials against the user service.

pub mod service;
pub mod session;

pub use crate::service::{AuthService, Authenticator};
pub use crate::session::{LoginTicket, SessionManager, SessionState};
