//! Role-based rendering guards.
//!
//! Both the role guard and the public-only guard are the same [`RoleGuard`]
//! state machine driven by a different [`GuardPolicy`].

mod policy;
mod role_guard;

pub use policy::{GuardDecision, GuardPolicy};
pub use role_guard::{GuardState, RoleGuard};
