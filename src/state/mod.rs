//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State lives in plain structs held by `RwSignal`s provided via context,
//! so transition logic stays pure and unit-testable outside the browser.

pub mod auth;
