//! User preference module
//!
//! Looks up per-user adult-content preferences and turns them, together with
//! the caller's explicit intent, into a per-request filter policy.

mod policy;
mod store;

pub use policy::{FilterPolicy, FilterPolicyResolver};
pub use store::{MemoryPreferenceStore, PreferenceError, PreferenceStore};
