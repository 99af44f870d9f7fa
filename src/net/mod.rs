//! Networking modules for the hosted auth + row-storage backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `supabase` owns the client handle and its auth/REST calls, `postgrest`
//! renders row-filter query strings, `tracking` implements the
//! session-history bookkeeping, and `types` defines the wire schema.

pub mod postgrest;
pub mod supabase;
pub mod tracking;
pub mod types;
