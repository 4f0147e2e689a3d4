#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for storage backends.
///
/// Use this target for logging reads, writes, and persistence failures.
pub const TRACING_TARGET_STORAGE: &str = "gopark_session::storage";

/// Tracing target for credential store operations.
pub const TRACING_TARGET_CREDENTIAL: &str = "gopark_session::credential";

/// Tracing target for session event broadcast.
pub const TRACING_TARGET_CHANNEL: &str = "gopark_session::channel";

/// Tracing target for role guard evaluation.
pub const TRACING_TARGET_GUARD: &str = "gopark_session::guard";

/// Tracing target for logout and the session-expired modal.
pub const TRACING_TARGET_LOGOUT: &str = "gopark_session::logout";

mod error;

pub mod channel;
pub mod credential;
pub mod guard;
pub mod logout;
pub mod modal;
pub mod navigation;
pub mod storage;

pub use error::{Error, Result};
