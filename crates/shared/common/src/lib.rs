//! Common utilities shared across all archive services.
//!
//! This crate provides:
//! - Unified error handling
//! - Configuration loading
//! - Durable key/value storage backends
//! - Tracing bootstrap

pub mod config;
pub mod error;
pub mod logging;
pub mod storage;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
pub use storage::{FileStorage, JsonStore, MemoryStorage, Storage};

#[cfg(any(test, feature = "test-utils"))]
pub use storage::MockStorage;
