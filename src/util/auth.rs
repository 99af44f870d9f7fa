//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical unauthenticated redirect
//! behavior against whichever login route is configured.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::auth::AuthState;

/// True once auth has resolved with no user present.
pub fn redirect_needed(state: &AuthState) -> bool {
    !state.loading && state.user.is_none()
}

/// Redirect to `login_route` whenever auth has resolved and no user is
/// present. While still resolving, nothing happens.
pub fn install_unauth_redirect<F>(auth: RwSignal<AuthState>, login_route: String, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let state = auth.get();
        if redirect_needed(&state) {
            navigate(&login_route, NavigateOptions::default());
        }
    });
}
