//! # sessiondash
//!
//! Leptos + WASM single-page app providing OAuth login, a protected
//! dashboard, and a per-user session history log backed by a hosted
//! Supabase project (auth + row storage).
//!
//! This crate contains pages, components, application state, the backend
//! client, and the session-tracking layer. Browser-only code is gated
//! behind the `csr` cargo feature with native stub branches, so the full
//! test suite runs under plain `cargo test`.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: mounts the app into `<body>`.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(app::App);
}
