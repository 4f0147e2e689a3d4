#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for credential sealing operations.
pub const TRACING_TARGET_CRYPTO: &str = "gopark_core::crypto";

/// Tracing target for toast queue operations.
pub const TRACING_TARGET_TOAST: &str = "gopark_core::toast";

pub mod crypto;
mod role;
mod routes;
pub mod toast;

pub mod prelude;

pub use role::Role;
pub use routes::Routes;
pub use toast::{Severity, Toast, ToastId, ToastQueue};
