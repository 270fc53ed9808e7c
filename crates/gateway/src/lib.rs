//! Archive Gateway Library
//!
//! This crate is the single entry point presentation layers call into. It
//! wires the identity store, session manager and record store together and
//! puts the access control gate in front of every operation.

pub mod handlers;
pub mod middleware;
pub mod state;

pub use crate::middleware::{AccessGate, Operation};
pub use crate::state::AppState;
