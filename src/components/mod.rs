//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render auth-aware chrome while reading shared state from the
//! Leptos context providers in `app`.

pub mod protected_route;
pub mod session_history;
